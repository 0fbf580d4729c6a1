use std::path::PathBuf;

use anyhow::{Result, anyhow};

use sportmonk_etl::backfill::run_backfill;
use sportmonk_etl::config::ApiConfig;
use sportmonk_etl::export::ExportOptions;
use sportmonk_etl::lookup::LookupStore;

const DEFAULT_OUTPUT_DIR: &str = "database";
const DEFAULT_LOOKUP_DIR: &str = "lookup_files";
const DEFAULT_YEARS: &[i32] = &[2022, 2023, 2024, 2025];

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();
    env_logger::init();

    let years = parse_years_arg().unwrap_or_else(|| DEFAULT_YEARS.to_vec());
    if years.is_empty() {
        return Err(anyhow!("no years resolved for backfill"));
    }
    let options = ExportOptions {
        out_dir: parse_path_arg("--output").unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        dedupe: !has_flag("--no-dedupe"),
    };
    let lookup_dir =
        parse_path_arg("--lookup-dir").unwrap_or_else(|| PathBuf::from(DEFAULT_LOOKUP_DIR));

    let config = ApiConfig::from_env()?;
    let lookups = LookupStore::load_or_refresh(&lookup_dir, &config)?;

    let summary = run_backfill(&config, &lookups, &years, &options)?;

    println!("Backfill complete");
    println!("Output: {}", options.out_dir.display());
    println!("Years: {years:?}");
    println!("Quarters fetched: {}", summary.quarters);
    println!(
        "Fixtures exported: {}/{}",
        summary.fixtures_exported, summary.fixtures_seen
    );
    if summary.truncated_ranges > 0 {
        println!(
            "Ranges truncated by rate limit: {} (incomplete, rerun later)",
            summary.truncated_ranges
        );
    }
    if !summary.errors.is_empty() {
        println!("Errors: {}", summary.errors.len());
        for err in summary.errors.iter().take(10) {
            println!(" - {err}");
        }
    }

    Ok(())
}

fn parse_years_arg() -> Option<Vec<i32>> {
    let raw = parse_value_arg("--years")?;
    let years = raw
        .split([',', ';', ' '])
        .filter_map(|part| part.trim().parse::<i32>().ok())
        .collect::<Vec<_>>();
    if years.is_empty() { None } else { Some(years) }
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    parse_value_arg(flag).map(PathBuf::from)
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

fn has_flag(flag: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == flag)
}
