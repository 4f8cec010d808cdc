//! Load and validate parameter bundles from JSON
//!
//! This is the input boundary: the projection engine assumes anything it
//! receives has passed `ProjectionInputs::validate`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;
use thiserror::Error;

use super::{AccountType, ProjectionInputs};

/// Tolerance for the shortfall shares summing to one
const SHARE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read inputs: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse inputs: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "ages must satisfy start < retirement < life expectancy (got {start_age}, {retirement_age}, {life_expectancy})"
    )]
    AgeOrdering {
        start_age: u32,
        retirement_age: u32,
        life_expectancy: u32,
    },

    #[error("{field} must be a non-negative number (got {value})")]
    InvalidAmount { field: String, value: f64 },

    #[error("state tax rate must be non-negative (got {0})")]
    NegativeStateRate(f64),

    #[error("at least one investment account is required")]
    NoInvestmentAccounts,

    #[error("investment shortfall shares must sum to 1 (got {0})")]
    ShortfallShares(f64),
}

fn non_negative(field: &str, value: f64) -> Result<(), InputError> {
    // NaN fails this comparison as well
    if value >= 0.0 {
        Ok(())
    } else {
        Err(InputError::InvalidAmount {
            field: field.to_string(),
            value,
        })
    }
}

impl ProjectionInputs {
    /// Check every invariant the models rely on
    pub fn validate(&self) -> Result<(), InputError> {
        let p = &self.profile;
        if !(p.start_age < p.retirement_age && p.retirement_age < p.life_expectancy) {
            return Err(InputError::AgeOrdering {
                start_age: p.start_age,
                retirement_age: p.retirement_age,
                life_expectancy: p.life_expectancy,
            });
        }

        non_negative("profile.inflation_rate", p.inflation_rate)?;
        non_negative("profile.social_security_monthly", p.social_security_monthly)?;
        non_negative("profile.other_income_monthly", p.other_income_monthly)?;
        non_negative("profile.pre_retirement_monthly_spend", p.pre_retirement_monthly_spend)?;
        non_negative("profile.post_retirement_monthly_spend", p.post_retirement_monthly_spend)?;

        non_negative("rent.monthly_rent", self.rent.monthly_rent)?;
        non_negative("rent.monthly_insurance", self.rent.monthly_insurance)?;

        let m = &self.mortgage;
        non_negative("mortgage.principal", m.principal)?;
        non_negative("mortgage.down_payment", m.down_payment)?;
        non_negative("mortgage.annual_rate", m.annual_rate)?;
        if let Some(rate) = m.fifteen_year_rate {
            non_negative("mortgage.fifteen_year_rate", rate)?;
        }
        non_negative("mortgage.monthly_insurance", m.monthly_insurance)?;
        non_negative("mortgage.monthly_hoa", m.monthly_hoa)?;
        non_negative("mortgage.annual_property_tax", m.annual_property_tax)?;
        non_negative("mortgage.one_time_repair", m.one_time_repair)?;
        non_negative("mortgage.annual_maintenance", m.annual_maintenance)?;

        if self.investments.is_empty() {
            return Err(InputError::NoInvestmentAccounts);
        }
        for account in &self.investments {
            non_negative(&format!("{}.starting_balance", account.name), account.starting_balance)?;
            non_negative(&format!("{}.monthly_contribution", account.name), account.monthly_contribution)?;
            non_negative(&format!("{}.shortfall_share", account.name), account.shortfall_share)?;
            if let AccountType::Taxable { tax_rate } = account.account_type {
                non_negative(&format!("{}.tax_rate", account.name), tax_rate)?;
            }
        }
        let shares: f64 = self.investments.iter().map(|a| a.shortfall_share).sum();
        if (shares - 1.0).abs() > SHARE_TOLERANCE {
            return Err(InputError::ShortfallShares(shares));
        }

        if let Some(tax) = &self.tax {
            if !(tax.state_rate >= 0.0) {
                return Err(InputError::NegativeStateRate(tax.state_rate));
            }
            non_negative("tax.other_deductions", tax.other_deductions)?;
        }

        if let Some(health) = &self.healthcare {
            let pre = &health.pre_medicare;
            non_negative("healthcare.pre_medicare.monthly_premium", pre.monthly_premium)?;
            non_negative("healthcare.pre_medicare.annual_deductible", pre.annual_deductible)?;
            non_negative("healthcare.pre_medicare.annual_out_of_pocket", pre.annual_out_of_pocket)?;

            let medicare = &health.medicare;
            non_negative("healthcare.medicare.part_b", medicare.part_b)?;
            non_negative("healthcare.medicare.part_d", medicare.part_d)?;
            non_negative("healthcare.medicare.medigap", medicare.medigap)?;
            non_negative("healthcare.medicare.annual_out_of_pocket", medicare.annual_out_of_pocket)?;

            if let Some(ltc) = &health.long_term_care {
                non_negative("healthcare.long_term_care.monthly_premium", ltc.monthly_premium)?;
            }
        }

        Ok(())
    }
}

/// Parse and validate a bundle from any reader
pub fn load_inputs_from_reader<R: Read>(reader: R) -> Result<ProjectionInputs, InputError> {
    let inputs: ProjectionInputs = serde_json::from_reader(reader)?;
    inputs.validate()?;
    Ok(inputs)
}

/// Parse and validate a bundle from a JSON file
pub fn load_inputs<P: AsRef<Path>>(path: P) -> Result<ProjectionInputs, InputError> {
    let path = path.as_ref();
    debug!("loading projection inputs from {}", path.display());
    let file = File::open(path)?;
    load_inputs_from_reader(BufReader::new(file))
}
