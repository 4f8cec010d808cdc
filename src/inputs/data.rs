//! Profile and per-scenario parameter bundles

use serde::{Deserialize, Serialize};

use crate::healthcare::HealthcareConfig;
use crate::tax::TaxConfig;

/// General profile shared by every model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Age at the first simulated year
    pub start_age: u32,

    /// First age of the drawdown phase
    pub retirement_age: u32,

    /// Age at which the projection ends (exclusive)
    pub life_expectancy: u32,

    /// Annual inflation as a decimal (0.03 = 3%)
    pub inflation_rate: f64,

    pub social_security_monthly: f64,

    #[serde(default)]
    pub other_income_monthly: f64,

    pub pre_retirement_monthly_spend: f64,

    pub post_retirement_monthly_spend: f64,
}

impl Profile {
    /// Number of simulated years
    pub fn horizon_years(&self) -> usize {
        self.life_expectancy.saturating_sub(self.start_age) as usize
    }

    /// Attained age in a 0-indexed projection year
    pub fn age_at(&self, year: usize) -> u32 {
        self.start_age + year as u32
    }

    pub fn is_retired(&self, age: u32) -> bool {
        age >= self.retirement_age
    }

    /// Annual income that offsets drawdown shortfalls
    pub fn annual_fixed_income(&self) -> f64 {
        (self.social_security_monthly + self.other_income_monthly) * 12.0
    }

    /// Compounding factor for a number of years since the projection start
    pub fn inflation_multiplier(&self, years_since_start: usize) -> f64 {
        (1.0 + self.inflation_rate).powi(years_since_start as i32)
    }
}

/// Rental terms for the rent scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentTerms {
    pub monthly_rent: f64,

    /// Renter's insurance per month
    #[serde(default)]
    pub monthly_insurance: f64,

    /// Annual rent escalation as a decimal
    pub rent_increase_rate: f64,
}

/// Purchase and carrying terms shared by both mortgage scenarios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageTerms {
    /// Amount borrowed
    pub principal: f64,

    pub down_payment: f64,

    /// Annual note rate for the 30-year loan (and the 15-year loan unless overridden)
    pub annual_rate: f64,

    /// Annual note rate for the 15-year loan, when it differs
    #[serde(default)]
    pub fifteen_year_rate: Option<f64>,

    #[serde(default)]
    pub monthly_insurance: f64,

    #[serde(default)]
    pub monthly_hoa: f64,

    pub annual_property_tax: f64,

    /// Annual home price appreciation as a decimal
    pub appreciation_rate: f64,

    /// Repair cost paid in the first year instead of maintenance
    #[serde(default)]
    pub one_time_repair: f64,

    #[serde(default)]
    pub annual_maintenance: f64,
}

impl MortgageTerms {
    /// Note rate for a loan term
    pub fn rate_for_term(&self, term_years: u32) -> f64 {
        match (term_years, self.fifteen_year_rate) {
            (15, Some(rate)) => rate,
            _ => self.annual_rate,
        }
    }
}

/// How withdrawals from an account are taxed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountType {
    /// Withdrawals are grossed up by `1 + tax_rate`
    Taxable { tax_rate: f64 },
    /// Withdrawals cover exactly the shortfall
    NonTaxable,
}

fn default_shortfall_share() -> f64 {
    1.0
}

/// A single investment account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentAccount {
    pub name: String,

    pub starting_balance: f64,

    #[serde(default)]
    pub monthly_contribution: f64,

    pub annual_return_rate: f64,

    pub account_type: AccountType,

    /// Fraction of every drawdown shortfall this account covers
    #[serde(default = "default_shortfall_share")]
    pub shortfall_share: f64,
}

/// Everything a projection run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInputs {
    pub profile: Profile,
    pub rent: RentTerms,
    pub mortgage: MortgageTerms,
    pub investments: Vec<InvestmentAccount>,

    #[serde(default)]
    pub tax: Option<TaxConfig>,

    #[serde(default)]
    pub healthcare: Option<HealthcareConfig>,
}

impl ProjectionInputs {
    /// Reference household: age 40, retiring at 65, planning to 90
    pub fn default_example() -> Self {
        Self {
            profile: Profile {
                start_age: 40,
                retirement_age: 65,
                life_expectancy: 90,
                inflation_rate: 0.03,
                social_security_monthly: 2_000.0,
                other_income_monthly: 0.0,
                pre_retirement_monthly_spend: 4_000.0,
                post_retirement_monthly_spend: 5_000.0,
            },
            rent: RentTerms {
                monthly_rent: 1_800.0,
                monthly_insurance: 0.0,
                rent_increase_rate: 0.03,
            },
            mortgage: MortgageTerms {
                principal: 320_000.0,
                down_payment: 80_000.0,
                annual_rate: 0.06,
                fifteen_year_rate: None,
                monthly_insurance: 0.0,
                monthly_hoa: 0.0,
                annual_property_tax: 4_000.0,
                appreciation_rate: 0.03,
                one_time_repair: 0.0,
                annual_maintenance: 0.0,
            },
            investments: vec![InvestmentAccount {
                name: "Brokerage".to_string(),
                starting_balance: 50_000.0,
                monthly_contribution: 500.0,
                annual_return_rate: 0.07,
                account_type: AccountType::NonTaxable,
                shortfall_share: 1.0,
            }],
            tax: None,
            healthcare: None,
        }
    }

    /// Reference household with the tax and healthcare overlays switched on
    pub fn default_with_overlays() -> Self {
        Self {
            tax: Some(TaxConfig::default()),
            healthcare: Some(HealthcareConfig::default()),
            ..Self::default_example()
        }
    }
}
