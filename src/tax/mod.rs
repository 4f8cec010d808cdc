//! Simplified federal + flat state income tax
//!
//! Everything here is a pure function of its arguments. The free functions
//! use the built-in 2024 tables; `TaxTables` exposes the same calculations
//! over tables loaded from CSV.

mod brackets;
pub mod loader;

pub use brackets::{BracketTable, SocialSecurityThresholds, TaxBracket, TaxTables};
pub use loader::{load_tax_tables, TaxTableError, DEFAULT_TAX_TABLE_PATH};

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingStatus {
    Single,
    Joint,
}

/// Household tax settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxConfig {
    pub filing_status: FilingStatus,

    /// Flat state income tax rate
    pub state_rate: f64,

    /// Itemize instead of taking the standard deduction
    #[serde(default)]
    pub itemize: bool,

    /// Itemized deductions other than mortgage interest and property tax
    #[serde(default)]
    pub other_deductions: f64,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            filing_status: FilingStatus::Single,
            state_rate: 0.05,
            itemize: false,
            other_deductions: 0.0,
        }
    }
}

/// Full breakdown of one year's liability
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub gross_income: f64,
    pub taxable_social_security: f64,
    pub deductions: f64,
    pub taxable_income: f64,
    pub federal_tax: f64,
    pub state_tax: f64,
    pub total_tax: f64,
    /// Federal rate on the next dollar of taxable income
    #[serde(default)]
    pub marginal_rate: f64,
}

impl TaxBreakdown {
    /// Total tax over gross income
    pub fn effective_rate(&self) -> f64 {
        if self.gross_income > 0.0 {
            self.total_tax / self.gross_income
        } else {
            0.0
        }
    }
}

fn builtin_tables() -> &'static TaxTables {
    static TABLES: OnceLock<TaxTables> = OnceLock::new();
    TABLES.get_or_init(TaxTables::default)
}

impl TaxTables {
    pub fn federal_tax(&self, taxable_income: f64, status: FilingStatus) -> f64 {
        self.brackets(status).tax_on(taxable_income)
    }

    /// Standard deduction, or itemized deductions floored at the standard
    /// deduction when itemizing
    pub fn deductions(
        &self,
        itemize: bool,
        mortgage_interest: f64,
        property_tax: f64,
        other_deductions: f64,
        status: FilingStatus,
    ) -> f64 {
        let standard = self.standard_deduction(status);
        if !itemize {
            return standard;
        }

        let itemized = mortgage_interest + property_tax.min(self.salt_cap) + other_deductions;
        standard.max(itemized)
    }

    /// Portion of Social Security benefits subject to income tax
    pub fn taxable_social_security(
        &self,
        ss_income: f64,
        other_income: f64,
        status: FilingStatus,
    ) -> f64 {
        let SocialSecurityThresholds { lower, upper } = self.ss_thresholds(status);
        let combined = other_income + 0.5 * ss_income;

        if combined <= lower {
            0.0
        } else if combined <= upper {
            (0.5 * ss_income).min(0.5 * (combined - lower))
        } else {
            (0.85 * ss_income).min(0.5 * (upper - lower) + 0.85 * (combined - upper))
        }
    }

    /// Compose a year's liability from annual income figures
    ///
    /// Investment withdrawals count as ordinary income, and as other income
    /// when testing how much Social Security is taxable.
    pub fn annual_tax(
        &self,
        ss_income: f64,
        other_income: f64,
        investment_withdrawals: f64,
        mortgage_interest: f64,
        property_tax: f64,
        config: &TaxConfig,
    ) -> TaxBreakdown {
        let status = config.filing_status;
        let ordinary = other_income + investment_withdrawals;

        let taxable_social_security = self.taxable_social_security(ss_income, ordinary, status);
        let deductions = self.deductions(
            config.itemize,
            mortgage_interest,
            property_tax,
            config.other_deductions,
            status,
        );
        let taxable_income = (ordinary + taxable_social_security - deductions).max(0.0);

        let federal_tax = self.federal_tax(taxable_income, status);
        let state_tax = state_tax(taxable_income, config.state_rate);

        TaxBreakdown {
            gross_income: ss_income + ordinary,
            taxable_social_security,
            deductions,
            taxable_income,
            federal_tax,
            state_tax,
            total_tax: federal_tax + state_tax,
            marginal_rate: self.brackets(status).marginal_rate(taxable_income),
        }
    }
}

/// Federal tax on taxable income using the built-in bracket tables
pub fn federal_tax(taxable_income: f64, status: FilingStatus) -> f64 {
    builtin_tables().federal_tax(taxable_income, status)
}

/// Flat state tax
pub fn state_tax(taxable_income: f64, rate: f64) -> f64 {
    taxable_income * rate
}

pub fn deductions(
    itemize: bool,
    mortgage_interest: f64,
    property_tax: f64,
    other_deductions: f64,
    status: FilingStatus,
) -> f64 {
    builtin_tables().deductions(itemize, mortgage_interest, property_tax, other_deductions, status)
}

pub fn taxable_social_security(ss_income: f64, other_income: f64, status: FilingStatus) -> f64 {
    builtin_tables().taxable_social_security(ss_income, other_income, status)
}

pub fn annual_tax(
    ss_income: f64,
    other_income: f64,
    investment_withdrawals: f64,
    mortgage_interest: f64,
    property_tax: f64,
    config: &TaxConfig,
) -> TaxBreakdown {
    builtin_tables().annual_tax(
        ss_income,
        other_income,
        investment_withdrawals,
        mortgage_interest,
        property_tax,
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_federal_tax_boundary() {
        assert_abs_diff_eq!(federal_tax(11_600.0, FilingStatus::Single), 1_160.00, epsilon = 1e-9);
        assert_abs_diff_eq!(federal_tax(23_200.0, FilingStatus::Joint), 2_320.00, epsilon = 1e-9);
        // Halfway into the 12% band
        assert_abs_diff_eq!(
            federal_tax(20_000.0, FilingStatus::Single),
            1_160.0 + 8_400.0 * 0.12,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_state_tax_is_flat() {
        assert_abs_diff_eq!(state_tax(50_000.0, 0.05), 2_500.0, epsilon = 1e-9);
        assert_eq!(state_tax(50_000.0, 0.0), 0.0);
    }

    #[test]
    fn test_standard_deduction_when_not_itemizing() {
        let d = deductions(false, 50_000.0, 9_000.0, 5_000.0, FilingStatus::Single);
        assert_eq!(d, 14_600.0);
        assert_eq!(deductions(false, 0.0, 0.0, 0.0, FilingStatus::Joint), 29_200.0);
    }

    #[test]
    fn test_itemized_floor_is_standard_deduction() {
        let d = deductions(true, 3_000.0, 2_000.0, 1_000.0, FilingStatus::Single);
        assert_eq!(d, 14_600.0);
    }

    #[test]
    fn test_itemized_caps_property_tax() {
        let d = deductions(true, 12_000.0, 15_000.0, 500.0, FilingStatus::Single);
        assert_abs_diff_eq!(d, 12_000.0 + 10_000.0 + 500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_social_security_below_lower_threshold() {
        assert_eq!(taxable_social_security(24_000.0, 10_000.0, FilingStatus::Single), 0.0);
    }

    #[test]
    fn test_social_security_between_thresholds() {
        // combined = 18000 + 12000 = 30000; half of the excess over 25000
        let taxable = taxable_social_security(24_000.0, 18_000.0, FilingStatus::Single);
        assert_abs_diff_eq!(taxable, 2_500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_social_security_above_upper_threshold() {
        // combined = 40000 + 12000 = 52000
        // 0.5 * 9000 + 0.85 * 18000 = 19800, capped at 0.85 * 24000 = 20400
        let taxable = taxable_social_security(24_000.0, 40_000.0, FilingStatus::Single);
        assert_abs_diff_eq!(taxable, 19_800.0, epsilon = 1e-9);

        let capped = taxable_social_security(24_000.0, 100_000.0, FilingStatus::Single);
        assert_abs_diff_eq!(capped, 20_400.0, epsilon = 1e-9);
    }

    #[test]
    fn test_annual_tax_composition() {
        let config = TaxConfig {
            filing_status: FilingStatus::Single,
            state_rate: 0.05,
            itemize: false,
            other_deductions: 0.0,
        };
        let breakdown = annual_tax(24_000.0, 0.0, 40_000.0, 0.0, 0.0, &config);

        assert_abs_diff_eq!(breakdown.gross_income, 64_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(breakdown.taxable_social_security, 19_800.0, epsilon = 1e-9);
        assert_abs_diff_eq!(breakdown.deductions, 14_600.0, epsilon = 1e-9);
        assert_abs_diff_eq!(breakdown.taxable_income, 45_200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            breakdown.federal_tax,
            1_160.0 + (45_200.0 - 11_600.0) * 0.12,
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(breakdown.state_tax, 45_200.0 * 0.05, epsilon = 1e-6);
        assert_abs_diff_eq!(
            breakdown.total_tax,
            breakdown.federal_tax + breakdown.state_tax,
            epsilon = 1e-9
        );
        assert!(breakdown.effective_rate() > 0.0 && breakdown.effective_rate() < 0.2);
        assert_eq!(breakdown.marginal_rate, 0.12);
    }

    #[test]
    fn test_income_below_deduction_owes_nothing() {
        let breakdown = annual_tax(20_000.0, 0.0, 5_000.0, 0.0, 0.0, &TaxConfig::default());
        assert_eq!(breakdown.taxable_income, 0.0);
        assert_eq!(breakdown.total_tax, 0.0);
        assert_eq!(TaxBreakdown::default().effective_rate(), 0.0);
    }
}
