//! CSV export of the comparison tables
//!
//! Layout: one block per table. Each block is a title line, an
//! `Age,<scenario>...` header and one row per year with values to two
//! decimals. Blocks are separated by a blank line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use thiserror::Error;

use crate::projection::{Comparison, ComparisonTable};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode export: {0}")]
    Csv(#[from] csv::Error),
}

fn write_table<W: Write>(out: &mut W, table: &ComparisonTable) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(out);

    writer.write_record([table.title.as_str()])?;

    let mut header = vec!["Age".to_string()];
    header.extend(table.scenarios.iter().map(|s| s.label().to_string()));
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![row.age.to_string()];
        record.extend(row.values.iter().map(|v| format!("{:.2}", v)));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write every comparison table to `out`
pub fn write_comparison<W: Write>(mut out: W, comparison: &Comparison) -> Result<(), ExportError> {
    for (i, table) in comparison.tables().into_iter().enumerate() {
        if i > 0 {
            out.write_all(b"\n")?;
        }
        write_table(&mut out, table)?;
    }
    out.flush()?;
    Ok(())
}

/// Write the comparison tables to a file
pub fn export_comparison<P: AsRef<Path>>(path: P, comparison: &Comparison) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_comparison(BufWriter::new(file), comparison)?;
    info!("exported comparison tables to {}", path.display());
    Ok(())
}
