//! Owned housing financed with a fixed-rate mortgage

use serde::{Deserialize, Serialize};

use super::amortization::LoanState;
use super::{HousingModel, HousingProjection, HousingYear};
use crate::inputs::{MortgageTerms, Profile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub principal: f64,
    pub down_payment: f64,
    pub annual_rate: f64,
    pub term_years: u32,
    pub monthly_insurance: f64,
    pub monthly_hoa: f64,
    pub annual_property_tax: f64,
    pub appreciation_rate: f64,
    pub one_time_repair: f64,
    pub annual_maintenance: f64,
}

impl House {
    pub fn from_terms(terms: &MortgageTerms, term_years: u32) -> Self {
        Self {
            principal: terms.principal,
            down_payment: terms.down_payment,
            annual_rate: terms.rate_for_term(term_years),
            term_years,
            monthly_insurance: terms.monthly_insurance,
            monthly_hoa: terms.monthly_hoa,
            annual_property_tax: terms.annual_property_tax,
            appreciation_rate: terms.appreciation_rate,
            one_time_repair: terms.one_time_repair,
            annual_maintenance: terms.annual_maintenance,
        }
    }
}

impl HousingModel for House {
    fn calculate(&self, profile: &Profile) -> HousingProjection {
        let years = profile.horizon_years();
        let mut projection = HousingProjection::with_capacity(years);

        let mut loan = LoanState::new(self.principal, self.annual_rate, self.term_years);
        let mut home_value = self.principal + self.down_payment;
        let mut insurance = self.monthly_insurance;
        let mut hoa = self.monthly_hoa;
        let mut property_tax = self.annual_property_tax;
        let mut maintenance = self.annual_maintenance;

        for year in 0..years {
            // Loop bound truncates terms longer than the horizon
            let loan_year = loan.advance_year();
            let upkeep = if year == 0 { self.one_time_repair } else { maintenance };

            let annual_insurance = insurance * 12.0;
            let annual_hoa = hoa * 12.0;
            let total_cost =
                annual_insurance + annual_hoa + property_tax + loan_year.payments + upkeep;

            projection.add_year(HousingYear {
                age: profile.age_at(year),
                rent: 0.0,
                insurance: annual_insurance,
                hoa: annual_hoa,
                property_tax,
                mortgage_payment: loan_year.payments,
                mortgage_interest: loan_year.interest,
                principal_paid: loan_year.principal,
                remaining_principal: loan_year.remaining,
                upkeep,
                total_cost,
                home_value,
            });

            let escalation = 1.0 + profile.inflation_rate;
            insurance *= escalation;
            hoa *= escalation;
            property_tax *= escalation;
            maintenance *= escalation;
            home_value *= 1.0 + self.appreciation_rate;
        }

        projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::housing::monthly_payment;
    use crate::inputs::ProjectionInputs;
    use approx::assert_relative_eq;

    fn house(term_years: u32) -> House {
        House {
            principal: 320_000.0,
            down_payment: 80_000.0,
            annual_rate: 0.06,
            term_years,
            monthly_insurance: 150.0,
            monthly_hoa: 100.0,
            annual_property_tax: 4_000.0,
            appreciation_rate: 0.03,
            one_time_repair: 10_000.0,
            annual_maintenance: 2_000.0,
        }
    }

    #[test]
    fn test_first_year_uses_repair_cost() {
        let profile = ProjectionInputs::default_example().profile;
        let projection = house(30).calculate(&profile);

        let first = &projection.details[0];
        let payment = monthly_payment(320_000.0, 0.06, 30);
        assert_relative_eq!(first.upkeep, 10_000.0);
        assert_relative_eq!(
            first.total_cost,
            150.0 * 12.0 + 100.0 * 12.0 + 4_000.0 + payment * 12.0 + 10_000.0,
            max_relative = 1e-12
        );

        // Maintenance takes over after the first year, already inflated once
        assert_relative_eq!(projection.details[1].upkeep, 2_000.0 * 1.03, max_relative = 1e-12);
    }

    #[test]
    fn test_carrying_costs_increase_with_inflation() {
        let profile = ProjectionInputs::default_example().profile;
        let projection = house(30).calculate(&profile);

        for pair in projection.details.windows(2).skip(1) {
            assert!(pair[1].insurance > pair[0].insurance);
            assert!(pair[1].hoa > pair[0].hoa);
            assert!(pair[1].property_tax > pair[0].property_tax);
            assert!(pair[1].upkeep > pair[0].upkeep);
        }
    }

    #[test]
    fn test_equity_is_appreciating_market_value() {
        let profile = ProjectionInputs::default_example().profile;
        let projection = house(15).calculate(&profile);

        assert_relative_eq!(projection.series.equity(0), 400_000.0);
        assert_relative_eq!(projection.series.equity(1), 412_000.0, max_relative = 1e-12);
        for pair in projection.series.records().windows(2) {
            assert!(pair[1].equity > pair[0].equity);
        }
    }

    #[test]
    fn test_fifteen_year_loan_stops_after_term() {
        let profile = ProjectionInputs::default_example().profile;
        let projection = house(15).calculate(&profile);

        let last_paying = &projection.details[14];
        let first_free = &projection.details[15];
        assert_eq!(last_paying.age, 54);
        assert!(last_paying.mortgage_payment > 0.0);
        assert_eq!(last_paying.remaining_principal, 0.0);
        assert_eq!(first_free.age, 55);
        assert_eq!(first_free.mortgage_payment, 0.0);
        assert!(first_free.total_cost < last_paying.total_cost);
    }

    #[test]
    fn test_term_longer_than_horizon_truncates() {
        let mut profile = ProjectionInputs::default_example().profile;
        profile.retirement_age = 50;
        profile.life_expectancy = 60;
        let projection = house(30).calculate(&profile);

        assert_eq!(projection.details.len(), 20);
        assert!(projection.details.iter().all(|d| d.mortgage_payment > 0.0));
        assert!(projection.details.last().unwrap().remaining_principal > 0.0);
    }

    #[test]
    fn test_cash_purchase_has_no_mortgage() {
        let profile = ProjectionInputs::default_example().profile;
        let cash = House {
            principal: 0.0,
            down_payment: 400_000.0,
            ..house(30)
        };
        let projection = cash.calculate(&profile);

        assert!(projection.details.iter().all(|d| d.mortgage_payment == 0.0));
        assert_relative_eq!(projection.series.equity(0), 400_000.0);
    }
}
