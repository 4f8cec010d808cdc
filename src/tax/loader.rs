//! CSV-based bracket table loader
//!
//! File layout: `filing_status,upper_bound,rate`, one row per bracket, with
//! `inf` as the upper bound of the open-ended top bracket.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use super::{BracketTable, FilingStatus, TaxBracket, TaxTables};

/// Default location of the bracket tables
pub const DEFAULT_TAX_TABLE_PATH: &str = "data/tax_brackets.csv";

#[derive(Debug, Error)]
pub enum TaxTableError {
    #[error("failed to open tax table: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed tax table: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown filing status `{0}`")]
    UnknownStatus(String),

    #[error("invalid upper bound `{0}`")]
    InvalidBound(String),

    #[error("no brackets for {0:?} filers")]
    MissingTable(FilingStatus),

    #[error("{0:?} brackets must be strictly ascending and end with an `inf` bound")]
    Unordered(FilingStatus),
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    filing_status: String,
    upper_bound: String,
    rate: f64,
}

fn parse_status(raw: &str) -> Result<FilingStatus, TaxTableError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "single" => Ok(FilingStatus::Single),
        "joint" => Ok(FilingStatus::Joint),
        _ => Err(TaxTableError::UnknownStatus(raw.to_string())),
    }
}

fn parse_bound(raw: &str) -> Result<f64, TaxTableError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "inf" | "infinity" => Ok(f64::INFINITY),
        other => other
            .parse::<f64>()
            .map_err(|_| TaxTableError::InvalidBound(raw.to_string())),
    }
}

fn check_order(status: FilingStatus, brackets: &[TaxBracket]) -> Result<(), TaxTableError> {
    if brackets.is_empty() {
        return Err(TaxTableError::MissingTable(status));
    }
    let ascending = brackets.windows(2).all(|w| w[0].upper_bound < w[1].upper_bound);
    let open_ended = brackets.last().map(|b| b.upper_bound.is_infinite()).unwrap_or(false);
    if ascending && open_ended {
        Ok(())
    } else {
        Err(TaxTableError::Unordered(status))
    }
}

/// Load bracket tables from any reader; non-bracket constants keep their
/// built-in values
pub fn load_tax_tables_from_reader<R: Read>(reader: R) -> Result<TaxTables, TaxTableError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut single = Vec::new();
    let mut joint = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        let bracket = TaxBracket {
            upper_bound: parse_bound(&row.upper_bound)?,
            rate: row.rate,
        };
        match parse_status(&row.filing_status)? {
            FilingStatus::Single => single.push(bracket),
            FilingStatus::Joint => joint.push(bracket),
        }
    }

    check_order(FilingStatus::Single, &single)?;
    check_order(FilingStatus::Joint, &joint)?;

    Ok(TaxTables {
        single: BracketTable::new(single),
        joint: BracketTable::new(joint),
        ..TaxTables::default()
    })
}

/// Load bracket tables from a CSV file
pub fn load_tax_tables<P: AsRef<Path>>(path: P) -> Result<TaxTables, TaxTableError> {
    let path = path.as_ref();
    debug!("loading tax brackets from {}", path.display());
    load_tax_tables_from_reader(File::open(path)?)
}
