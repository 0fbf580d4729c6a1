use std::path::PathBuf;

use anyhow::Result;

use crate::fixture::Fixture;
use crate::lookup::LookupStore;
use crate::{enrich, flatten, writer};

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub out_dir: PathBuf,
    pub dedupe: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub tables_written: usize,
    pub rows_written: usize,
}

/// Enrich one fixture and fan it out into every output table. Tables
/// whose builders produced no rows are skipped entirely; their files are
/// not created or touched.
pub fn export_fixture(
    fixture: &mut Fixture,
    lookups: &LookupStore,
    options: &ExportOptions,
) -> Result<ExportReport> {
    enrich::enrich_fixture(fixture, lookups)?;

    let mut tables = Vec::new();
    tables.extend(flatten::fixture_tables(fixture)?);
    tables.extend(flatten::event_tables(fixture));
    tables.extend(flatten::player_performance_tables(fixture));
    tables.extend(flatten::players_tables(fixture, lookups)?);

    let mut report = ExportReport::default();
    for (name, rows) in tables {
        if rows.is_empty() {
            continue;
        }
        writer::append_rows(&options.out_dir, name, &rows, options.dedupe)?;
        report.tables_written += 1;
        report.rows_written += rows.len();
    }
    log::debug!(
        "fixture {}: wrote {} rows across {} tables",
        fixture.id,
        report.rows_written,
        report.tables_written
    );
    Ok(report)
}
