use std::path::PathBuf;

use anyhow::Result;

use sportmonk_etl::config::ApiConfig;
use sportmonk_etl::lookup::{LookupStore, Namespace};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();
    env_logger::init();

    let dir = std::env::args()
        .skip(1)
        .find_map(|arg| arg.strip_prefix("--lookup-dir=").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("lookup_files"));

    let config = ApiConfig::from_env()?;
    let mut store = LookupStore::open(&dir)?;
    for ns in Namespace::ALL {
        store.refresh(&config, ns)?;
        println!("{}: {} entries", ns.as_str(), store.len(ns));
    }
    println!("Lookup files refreshed under {}", dir.display());

    Ok(())
}
