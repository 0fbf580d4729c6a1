use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

// Date-range fixture pages with the full include set are slow to
// assemble server-side; keep the timeout generous.
const REQUEST_TIMEOUT_SECS: u64 = 30;

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("sportmonk_etl/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build http client")
    })
}
