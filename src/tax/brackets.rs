//! Reference tax tables: federal brackets, standard deductions, SALT cap and
//! Social Security thresholds

use serde::{Deserialize, Serialize};

use super::FilingStatus;

/// A marginal bracket: income up to `upper_bound` (from the previous bound)
/// is taxed at `rate`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper_bound: f64,
    pub rate: f64,
}

/// Sorted list of brackets; the last bound is infinite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Build a table from `(upper_bound, rate)` pairs already in ascending order
    pub fn new(brackets: Vec<TaxBracket>) -> Self {
        Self { brackets }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Progressive tax: each bracket only taxes the income inside its band
    pub fn tax_on(&self, taxable_income: f64) -> f64 {
        let mut tax = 0.0;
        let mut lower = 0.0;

        for bracket in &self.brackets {
            if taxable_income <= lower {
                break;
            }
            let in_band = taxable_income.min(bracket.upper_bound) - lower;
            tax += in_band * bracket.rate;
            lower = bracket.upper_bound;
        }

        tax
    }

    /// Rate applied to the next dollar above `taxable_income`
    pub fn marginal_rate(&self, taxable_income: f64) -> f64 {
        self.brackets
            .iter()
            .find(|b| taxable_income < b.upper_bound)
            .or_else(|| self.brackets.last())
            .map(|b| b.rate)
            .unwrap_or(0.0)
    }

    fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|&(upper_bound, rate)| TaxBracket { upper_bound, rate })
                .collect(),
        )
    }

    /// 2024 single filer brackets
    pub fn single_2024() -> Self {
        Self::from_pairs(&[
            (11_600.0, 0.10),
            (47_150.0, 0.12),
            (100_525.0, 0.22),
            (191_950.0, 0.24),
            (243_725.0, 0.32),
            (609_350.0, 0.35),
            (f64::INFINITY, 0.37),
        ])
    }

    /// 2024 married-filing-jointly brackets
    pub fn joint_2024() -> Self {
        Self::from_pairs(&[
            (23_200.0, 0.10),
            (94_300.0, 0.12),
            (201_050.0, 0.22),
            (383_900.0, 0.24),
            (487_450.0, 0.32),
            (731_200.0, 0.35),
            (f64::INFINITY, 0.37),
        ])
    }
}

/// Combined-income thresholds for taxing Social Security benefits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SocialSecurityThresholds {
    pub lower: f64,
    pub upper: f64,
}

/// Every constant the tax functions read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxTables {
    pub single: BracketTable,
    pub joint: BracketTable,
    pub standard_deduction_single: f64,
    pub standard_deduction_joint: f64,
    /// Ceiling on the state-and-local-tax itemized deduction
    pub salt_cap: f64,
    pub ss_thresholds_single: SocialSecurityThresholds,
    pub ss_thresholds_joint: SocialSecurityThresholds,
}

impl Default for TaxTables {
    fn default() -> Self {
        Self {
            single: BracketTable::single_2024(),
            joint: BracketTable::joint_2024(),
            standard_deduction_single: 14_600.0,
            standard_deduction_joint: 29_200.0,
            salt_cap: 10_000.0,
            ss_thresholds_single: SocialSecurityThresholds {
                lower: 25_000.0,
                upper: 34_000.0,
            },
            ss_thresholds_joint: SocialSecurityThresholds {
                lower: 32_000.0,
                upper: 44_000.0,
            },
        }
    }
}

impl TaxTables {
    pub fn brackets(&self, status: FilingStatus) -> &BracketTable {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::Joint => &self.joint,
        }
    }

    pub fn standard_deduction(&self, status: FilingStatus) -> f64 {
        match status {
            FilingStatus::Single => self.standard_deduction_single,
            FilingStatus::Joint => self.standard_deduction_joint,
        }
    }

    pub fn ss_thresholds(&self, status: FilingStatus) -> SocialSecurityThresholds {
        match status {
            FilingStatus::Single => self.ss_thresholds_single,
            FilingStatus::Joint => self.ss_thresholds_joint,
        }
    }
}
