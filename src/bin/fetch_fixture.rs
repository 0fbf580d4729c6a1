use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use sportmonk_etl::api::{self, FixtureQuery};
use sportmonk_etl::config::ApiConfig;
use sportmonk_etl::export::{ExportOptions, export_fixture};
use sportmonk_etl::fixture::Fixture;
use sportmonk_etl::lookup::LookupStore;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();
    env_logger::init();

    let fixture_id = parse_fixture_id_arg()
        .ok_or_else(|| anyhow!("usage: fetch_fixture --fixture-id <id> [--output <dir>]"))?;
    let options = ExportOptions {
        out_dir: parse_output_arg().unwrap_or_else(|| PathBuf::from("sample_data")),
        dedupe: true,
    };

    let config = ApiConfig::from_env()?;
    let lookups = LookupStore::load_or_refresh("lookup_files", &config)?;

    let pages = api::fetch_fixtures(&config, &FixtureQuery::by_id(fixture_id))?;
    let mut fixture: Fixture = serde_json::from_value(pages.record()?.clone())
        .with_context(|| format!("decode fixture {fixture_id}"))?;

    let report = export_fixture(&mut fixture, &lookups, &options)?;
    println!(
        "Fixture {fixture_id}: {} rows across {} tables under {}",
        report.rows_written,
        report.tables_written,
        options.out_dir.display()
    );

    Ok(())
}

fn parse_fixture_id_arg() -> Option<i64> {
    parse_value_arg("--fixture-id").and_then(|raw| raw.parse::<i64>().ok())
}

fn parse_output_arg() -> Option<PathBuf> {
    parse_value_arg("--output").map(PathBuf::from)
}

fn parse_value_arg(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}
