//! Year-indexed output series shared by every model

use serde::{Deserialize, Serialize};

/// A single year of one projection track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    /// Attained age during the year
    pub age: u32,

    /// Amount attributed to this year alone
    pub period_value: f64,

    /// Running total of `period_value` up to and including this year
    pub cumulative_value: f64,

    /// Market value of owned property (housing tracks only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equity: Option<f64>,
}

/// Append-only sequence of year records
///
/// Cumulative values are maintained by the series itself so models only
/// supply the per-year amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    records: Vec<YearRecord>,
}

impl Series {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    pub fn with_capacity(years: usize) -> Self {
        Self {
            records: Vec::with_capacity(years),
        }
    }

    /// Append a year without an equity figure
    pub fn push(&mut self, age: u32, period_value: f64) {
        self.push_record(age, period_value, None);
    }

    /// Append a year carrying an equity figure
    pub fn push_with_equity(&mut self, age: u32, period_value: f64, equity: f64) {
        self.push_record(age, period_value, Some(equity));
    }

    fn push_record(&mut self, age: u32, period_value: f64, equity: Option<f64>) {
        let prior = self.records.last().map(|r| r.cumulative_value).unwrap_or(0.0);
        self.records.push(YearRecord {
            age,
            period_value,
            cumulative_value: prior + period_value,
            equity,
        });
    }

    pub fn records(&self) -> &[YearRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, year: usize) -> Option<&YearRecord> {
        self.records.get(year)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, YearRecord> {
        self.records.iter()
    }

    /// Period value for a year, 0 if the year is outside the series
    pub fn period(&self, year: usize) -> f64 {
        self.records.get(year).map(|r| r.period_value).unwrap_or(0.0)
    }

    /// Cumulative value for a year, 0 if the year is outside the series
    pub fn cumulative(&self, year: usize) -> f64 {
        self.records.get(year).map(|r| r.cumulative_value).unwrap_or(0.0)
    }

    /// Equity for a year, 0 when absent
    pub fn equity(&self, year: usize) -> f64 {
        self.records.get(year).and_then(|r| r.equity).unwrap_or(0.0)
    }

    /// Final cumulative value
    pub fn total(&self) -> f64 {
        self.records.last().map(|r| r.cumulative_value).unwrap_or(0.0)
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a YearRecord;
    type IntoIter = std::slice::Iter<'a, YearRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
