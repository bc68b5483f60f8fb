//! Tabular output helpers.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

/// Writes a Polars DataFrame to a CSV file at `path`.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[table::io] Failed to create {}", path.display()))?;
    CsvWriter::new(file)
        .finish(df)
        .with_context(|| format!("[table::io] Failed to write {}", path.display()))?;
    Ok(())
}
