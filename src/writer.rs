use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::flatten::Row;

const SEPARATOR: char = ',';

/// Append `rows` to `<dir>/<table>.csv`, creating the directory as
/// needed, one delimited line per row. With `dedupe` the whole file is
/// rewritten afterwards keeping only the first occurrence of each exact
/// line.
///
/// One call is one writer pass, so interleaved calls from different
/// builders never corrupt a file; concurrent processes appending the
/// same file are not defended against.
pub fn append_rows(dir: &Path, table: &str, rows: &[Row], dedupe: bool) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("create output directory {}", dir.display()))?;
    let path = dir.join(format!("{table}.csv"));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open table file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for row in rows {
        write_row(&mut out, row).with_context(|| format!("write row to {}", path.display()))?;
    }
    out.flush()
        .with_context(|| format!("flush table file {}", path.display()))?;
    drop(out);

    if dedupe {
        dedupe_file(&path)?;
    }
    Ok(path)
}

fn write_row<W: Write>(mut out: W, row: &Row) -> std::io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(out, "{SEPARATOR}")?;
        } else {
            first = false;
        }
        let rendered = cell.to_string();
        if needs_quotes(&rendered) {
            write!(out, "\"{}\"", rendered.replace('"', "\"\""))?;
        } else {
            write!(out, "{rendered}")?;
        }
    }
    writeln!(out)
}

fn needs_quotes(field: &str) -> bool {
    field.contains(SEPARATOR) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Rewrite `path` keeping the first occurrence of every exact line, in
/// original order. Scans the whole file, so the cost is proportional to
/// the file size regardless of how few rows were just appended.
/// Idempotent: a second pass over deduped content is a no-op.
pub fn dedupe_file(path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read table file {}", path.display()))?;

    let mut seen = HashSet::new();
    let mut kept = String::with_capacity(raw.len());
    for line in raw.lines() {
        if seen.insert(line) {
            kept.push_str(line);
            kept.push('\n');
        }
    }

    let tmp = path.with_extension("csv.tmp");
    fs::write(&tmp, kept).with_context(|| format!("write deduped file {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap deduped file {}", path.display()))?;
    Ok(())
}
