//! Investment growth and drawdown
//!
//! Every scenario gets its own running balance per account, all seeded from
//! the same starting balances. Before retirement contributions compound;
//! from retirement on, each year's expense shortfall is withdrawn before
//! growth is applied. Balances may go negative.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::healthcare::HealthcareProjection;
use crate::housing::HousingProjection;
use crate::inputs::{AccountType, InvestmentAccount, Profile};
use crate::living::LivingProjection;
use crate::projection::Series;
use crate::tax::{TaxBreakdown, TaxConfig, TaxTables};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Accumulation,
    Drawdown,
}

/// One account-year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentYear {
    pub age: u32,
    pub phase: Phase,
    pub contribution: f64,
    /// This account's share of the year's shortfall, before gross-up
    pub shortfall: f64,
    /// Multiplier applied to the shortfall (1 + tax rate for taxable accounts)
    pub gross_up: f64,
    /// Signed flow: negative when money leaves the account
    pub withdrawal: f64,
    pub growth: f64,
    pub balance: f64,
}

/// Balance history of one account in one scenario
///
/// The series' period value is the year's net change in balance (year 0
/// includes the opening balance), so its cumulative value is the balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountProjection {
    pub name: String,
    pub series: Series,
    pub details: Vec<InvestmentYear>,
}

impl AccountProjection {
    pub fn balance(&self, year: usize) -> f64 {
        self.details.get(year).map(|d| d.balance).unwrap_or(0.0)
    }
}

/// Tax owed in a drawdown year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxYear {
    pub age: u32,
    /// Incremental tax per dollar withdrawn, used to gross up taxable accounts
    pub flat_equivalent_rate: f64,
    pub breakdown: TaxBreakdown,
}

/// All accounts of one scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInvestments {
    pub accounts: Vec<AccountProjection>,
    /// Present only when a tax configuration is engaged
    pub taxes: Vec<TaxYear>,
    /// First age at which the combined balance is negative
    pub depleted_at: Option<u32>,
}

impl ScenarioInvestments {
    /// Sum of every account's end-of-year balance
    pub fn total_balance(&self, year: usize) -> f64 {
        self.accounts.iter().map(|a| a.balance(year)).sum()
    }

    pub fn tax_for_age(&self, age: u32) -> Option<&TaxYear> {
        self.taxes.iter().find(|t| t.age == age)
    }
}

/// Tax tables and household settings engaged for drawdown gross-up
#[derive(Debug, Clone, Copy)]
pub struct TaxOverlay<'a> {
    pub tables: &'a TaxTables,
    pub config: &'a TaxConfig,
}

/// Per-scenario investment projection
#[derive(Debug, Clone)]
pub struct InvestmentModel<'a> {
    accounts: &'a [InvestmentAccount],
    tax: Option<TaxOverlay<'a>>,
}

impl<'a> InvestmentModel<'a> {
    pub fn new(accounts: &'a [InvestmentAccount]) -> Self {
        Self { accounts, tax: None }
    }

    /// Derive taxable-account gross-up from the tax model instead of each
    /// account's flat rate
    pub fn with_tax(mut self, tables: &'a TaxTables, config: &'a TaxConfig) -> Self {
        self.tax = Some(TaxOverlay { tables, config });
        self
    }

    /// Project every scenario independently
    pub fn calculate(
        &self,
        profile: &Profile,
        scenarios: &[&HousingProjection],
        living: &LivingProjection,
        healthcare: Option<&HealthcareProjection>,
    ) -> Vec<ScenarioInvestments> {
        scenarios
            .iter()
            .map(|housing| self.project_scenario(profile, housing, living, healthcare))
            .collect()
    }

    /// Project one scenario from fresh starting balances
    pub fn project_scenario(
        &self,
        profile: &Profile,
        housing: &HousingProjection,
        living: &LivingProjection,
        healthcare: Option<&HealthcareProjection>,
    ) -> ScenarioInvestments {
        let years = profile.horizon_years();
        let mut balances: Vec<f64> = self.accounts.iter().map(|a| a.starting_balance).collect();
        let mut result = ScenarioInvestments {
            accounts: self
                .accounts
                .iter()
                .map(|a| AccountProjection {
                    name: a.name.clone(),
                    series: Series::with_capacity(years),
                    details: Vec::with_capacity(years),
                })
                .collect(),
            ..Default::default()
        };

        for year in 0..years {
            let age = profile.age_at(year);

            if profile.is_retired(age) {
                let shortfall = housing.series.period(year)
                    + living.series.period(year)
                    + healthcare.map(|h| h.annual_cost(year)).unwrap_or(0.0)
                    - profile.annual_fixed_income();
                self.draw_down(profile, housing, year, shortfall, &mut balances, &mut result);
            } else {
                self.accumulate(age, year, &mut balances, &mut result);
            }

            let total: f64 = balances.iter().sum();
            if total < 0.0 && result.depleted_at.is_none() {
                debug!("investments depleted at age {}", age);
                result.depleted_at = Some(age);
            }
        }

        result
    }

    fn accumulate(
        &self,
        age: u32,
        year: usize,
        balances: &mut [f64],
        result: &mut ScenarioInvestments,
    ) {
        for (i, account) in self.accounts.iter().enumerate() {
            let prev = balances[i];
            let contribution = account.monthly_contribution * 12.0;
            let balance = (prev + contribution) * (1.0 + account.annual_return_rate);
            balances[i] = balance;

            record(
                &mut result.accounts[i],
                year,
                prev,
                InvestmentYear {
                    age,
                    phase: Phase::Accumulation,
                    contribution,
                    shortfall: 0.0,
                    gross_up: 1.0,
                    withdrawal: 0.0,
                    growth: balance - prev - contribution,
                    balance,
                },
            );
        }
    }

    fn draw_down(
        &self,
        profile: &Profile,
        housing: &HousingProjection,
        year: usize,
        shortfall: f64,
        balances: &mut [f64],
        result: &mut ScenarioInvestments,
    ) {
        let age = profile.age_at(year);
        let need = shortfall.max(0.0);

        let taxable_share: f64 = self
            .accounts
            .iter()
            .filter(|a| matches!(a.account_type, AccountType::Taxable { .. }))
            .map(|a| a.shortfall_share)
            .sum();
        let overlay_rate = self
            .tax
            .map(|overlay| self.flat_equivalent_rate(profile, housing, year, need * taxable_share, overlay));

        let mut taxable_withdrawals = 0.0;
        for (i, account) in self.accounts.iter().enumerate() {
            let prev = balances[i];
            let share = need * account.shortfall_share;
            let gross_up = match account.account_type {
                AccountType::Taxable { tax_rate } => 1.0 + overlay_rate.unwrap_or(tax_rate),
                AccountType::NonTaxable => 1.0,
            };
            let withdrawal = if shortfall > 0.0 { -(share * gross_up) } else { 0.0 };
            if let AccountType::Taxable { .. } = account.account_type {
                taxable_withdrawals -= withdrawal;
            }

            let balance = (prev + withdrawal) * (1.0 + account.annual_return_rate);
            balances[i] = balance;

            record(
                &mut result.accounts[i],
                year,
                prev,
                InvestmentYear {
                    age,
                    phase: Phase::Drawdown,
                    contribution: 0.0,
                    shortfall: share,
                    gross_up,
                    withdrawal,
                    growth: balance - prev - withdrawal,
                    balance,
                },
            );
        }

        if let Some(overlay) = self.tax {
            result.taxes.push(TaxYear {
                age,
                flat_equivalent_rate: overlay_rate.unwrap_or(0.0),
                breakdown: self.tax_breakdown(profile, housing, year, taxable_withdrawals, overlay),
            });
        }
    }

    fn tax_breakdown(
        &self,
        profile: &Profile,
        housing: &HousingProjection,
        year: usize,
        withdrawals: f64,
        overlay: TaxOverlay<'_>,
    ) -> TaxBreakdown {
        overlay.tables.annual_tax(
            profile.social_security_monthly * 12.0,
            profile.other_income_monthly * 12.0,
            withdrawals,
            housing.mortgage_interest(year),
            housing.property_tax(year),
            overlay.config,
        )
    }

    /// Tax caused by withdrawing `amount`, per dollar withdrawn
    fn flat_equivalent_rate(
        &self,
        profile: &Profile,
        housing: &HousingProjection,
        year: usize,
        amount: f64,
        overlay: TaxOverlay<'_>,
    ) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }
        let without = self.tax_breakdown(profile, housing, year, 0.0, overlay);
        let with = self.tax_breakdown(profile, housing, year, amount, overlay);
        (with.total_tax - without.total_tax) / amount
    }
}

fn record(account: &mut AccountProjection, year: usize, prev: f64, entry: InvestmentYear) {
    let opening = if year == 0 { 0.0 } else { prev };
    account.series.push(entry.age, entry.balance - opening);
    account.details.push(entry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::housing::{Apartment, HousingModel, HousingYear};
    use crate::inputs::ProjectionInputs;
    use crate::living;
    use crate::tax::FilingStatus;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn inputs() -> ProjectionInputs {
        ProjectionInputs::default_example()
    }

    fn rent(monthly_rent: f64) -> Apartment {
        Apartment {
            monthly_rent,
            monthly_insurance: 0.0,
            rent_increase_rate: 0.03,
        }
    }

    #[test]
    fn test_accumulation_formula() {
        let inputs = inputs();
        let profile = &inputs.profile;
        let housing = rent(1_800.0).calculate(profile);
        let living = living::calculate(profile);

        let result = InvestmentModel::new(&inputs.investments)
            .project_scenario(profile, &housing, &living, None);

        let first = &result.accounts[0].details[0];
        assert_eq!(first.phase, Phase::Accumulation);
        assert_relative_eq!(first.balance, (50_000.0 + 6_000.0) * 1.07, max_relative = 1e-12);
        assert_relative_eq!(first.growth, 56_000.0 * 0.07, max_relative = 1e-9);
    }

    #[test]
    fn test_series_cumulative_tracks_balance() {
        let inputs = inputs();
        let profile = &inputs.profile;
        let housing = rent(1_800.0).calculate(profile);
        let living = living::calculate(profile);

        let result = InvestmentModel::new(&inputs.investments)
            .project_scenario(profile, &housing, &living, None);
        let account = &result.accounts[0];

        for (year, detail) in account.details.iter().enumerate() {
            assert_abs_diff_eq!(account.series.cumulative(year), detail.balance, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_drawdown_withdraws_shortfall() {
        let inputs = inputs();
        let profile = &inputs.profile;
        let housing = rent(1_800.0).calculate(profile);
        let living = living::calculate(profile);

        let result = InvestmentModel::new(&inputs.investments)
            .project_scenario(profile, &housing, &living, None);
        let details = &result.accounts[0].details;

        let year = 25;
        let expected_shortfall =
            housing.series.period(year) + living.series.period(year) - 24_000.0;
        let entry = &details[year];
        assert_eq!(entry.phase, Phase::Drawdown);
        assert_relative_eq!(entry.shortfall, expected_shortfall, max_relative = 1e-12);
        assert_relative_eq!(entry.withdrawal, -expected_shortfall, max_relative = 1e-12);
        assert_relative_eq!(
            entry.balance,
            (details[year - 1].balance - expected_shortfall) * 1.07,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_no_withdrawal_when_income_covers_costs() {
        let mut inputs = inputs();
        inputs.profile.social_security_monthly = 50_000.0;
        let profile = &inputs.profile;
        let housing = rent(1_800.0).calculate(profile);
        let living = living::calculate(profile);

        let result = InvestmentModel::new(&inputs.investments)
            .project_scenario(profile, &housing, &living, None);

        for entry in result.accounts[0].details.iter().filter(|d| d.phase == Phase::Drawdown) {
            assert_eq!(entry.withdrawal, 0.0);
            assert_eq!(entry.shortfall, 0.0);
        }
    }

    #[test]
    fn test_taxable_account_grosses_up() {
        let mut inputs = inputs();
        inputs.investments[0].account_type = AccountType::Taxable { tax_rate: 0.2 };
        let profile = &inputs.profile;
        let housing = rent(1_800.0).calculate(profile);
        let living = living::calculate(profile);

        let result = InvestmentModel::new(&inputs.investments)
            .project_scenario(profile, &housing, &living, None);
        let entry = &result.accounts[0].details[25];

        assert_relative_eq!(entry.gross_up, 1.2);
        assert_relative_eq!(entry.withdrawal, -entry.shortfall * 1.2, max_relative = 1e-12);
        assert!(result.taxes.is_empty());
    }

    #[test]
    fn test_shortfall_split_across_accounts() {
        let mut inputs = inputs();
        inputs.investments[0].shortfall_share = 0.25;
        inputs.investments.push(InvestmentAccount {
            name: "IRA".to_string(),
            starting_balance: 100_000.0,
            monthly_contribution: 0.0,
            annual_return_rate: 0.05,
            account_type: AccountType::NonTaxable,
            shortfall_share: 0.75,
        });
        let profile = &inputs.profile;
        let housing = rent(1_800.0).calculate(profile);
        let living = living::calculate(profile);

        let result = InvestmentModel::new(&inputs.investments)
            .project_scenario(profile, &housing, &living, None);
        let brokerage = &result.accounts[0].details[30];
        let ira = &result.accounts[1].details[30];

        assert_relative_eq!(ira.shortfall, brokerage.shortfall * 3.0, max_relative = 1e-12);
        assert_relative_eq!(
            result.total_balance(30),
            brokerage.balance + ira.balance,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_tax_overlay_derives_rate_from_brackets() {
        let mut inputs = inputs();
        inputs.investments[0].account_type = AccountType::Taxable { tax_rate: 0.5 };
        let profile = &inputs.profile;
        let housing = rent(1_800.0).calculate(profile);
        let living = living::calculate(profile);
        let tables = TaxTables::default();
        let config = TaxConfig {
            filing_status: FilingStatus::Single,
            state_rate: 0.0,
            itemize: false,
            other_deductions: 0.0,
        };

        let result = InvestmentModel::new(&inputs.investments)
            .with_tax(&tables, &config)
            .project_scenario(profile, &housing, &living, None);

        let retirement_years = profile.horizon_years() - 25;
        assert_eq!(result.taxes.len(), retirement_years);

        let tax_year = result.tax_for_age(65).unwrap();
        let entry = &result.accounts[0].details[25];
        // The account's own 50% is replaced by the bracket-derived rate
        assert!(tax_year.flat_equivalent_rate > 0.0 && tax_year.flat_equivalent_rate < 0.37);
        assert_relative_eq!(entry.gross_up, 1.0 + tax_year.flat_equivalent_rate);
        assert_relative_eq!(
            tax_year.breakdown.gross_income,
            24_000.0 + entry.shortfall * entry.gross_up,
            max_relative = 1e-12
        );
    }

    /// Flat housing cost, optionally raised from `from_year` on
    fn housing_track(profile: &Profile, from_year: Option<usize>) -> HousingProjection {
        let mut projection = HousingProjection::default();
        for year in 0..profile.horizon_years() {
            let raised = from_year.map_or(false, |from| year >= from);
            projection.add_year(HousingYear {
                age: profile.age_at(year),
                total_cost: if raised { 30_000.0 } else { 20_000.0 },
                ..Default::default()
            });
        }
        projection
    }

    #[test]
    fn test_scenarios_diverge_only_when_housing_differs() {
        let inputs = inputs();
        let profile = &inputs.profile;
        let living = living::calculate(profile);

        // Identical costs until age 70, where the second track gets dearer
        let base = housing_track(profile, None);
        let dearer = housing_track(profile, Some(30));
        let twin = housing_track(profile, None);

        let results = InvestmentModel::new(&inputs.investments).calculate(
            profile,
            &[&base, &dearer, &twin],
            &living,
            None,
        );
        assert_eq!(results.len(), 3);

        for year in 0..30 {
            let balance = results[0].total_balance(year);
            assert_eq!(results[1].total_balance(year), balance);
            assert_eq!(results[2].total_balance(year), balance);
        }
        assert_eq!(profile.age_at(30), 70);
        assert!(results[1].total_balance(30) < results[0].total_balance(30));
        for year in 30..profile.horizon_years() {
            assert_eq!(results[2].total_balance(year), results[0].total_balance(year));
        }
    }

    #[test]
    fn test_depletion_age_recorded() {
        let mut inputs = inputs();
        inputs.investments[0].starting_balance = 0.0;
        inputs.investments[0].monthly_contribution = 0.0;
        let profile = &inputs.profile;
        let housing = rent(1_800.0).calculate(profile);
        let living = living::calculate(profile);

        let result = InvestmentModel::new(&inputs.investments)
            .project_scenario(profile, &housing, &living, None);

        assert_eq!(result.depleted_at, Some(65));
        assert!(result.total_balance(profile.horizon_years() - 1) < 0.0);
    }
}
