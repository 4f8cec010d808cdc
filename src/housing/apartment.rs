//! Rental housing

use serde::{Deserialize, Serialize};

use super::{HousingModel, HousingProjection, HousingYear};
use crate::inputs::{Profile, RentTerms};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Apartment {
    pub monthly_rent: f64,
    pub monthly_insurance: f64,
    /// Annual rent escalation; insurance follows general inflation instead
    pub rent_increase_rate: f64,
}

impl Apartment {
    pub fn from_terms(terms: &RentTerms) -> Self {
        Self {
            monthly_rent: terms.monthly_rent,
            monthly_insurance: terms.monthly_insurance,
            rent_increase_rate: terms.rent_increase_rate,
        }
    }
}

impl HousingModel for Apartment {
    fn calculate(&self, profile: &Profile) -> HousingProjection {
        let years = profile.horizon_years();
        let mut projection = HousingProjection::with_capacity(years);

        let mut rent = self.monthly_rent;
        let mut insurance = self.monthly_insurance;

        for year in 0..years {
            let annual_rent = rent * 12.0;
            let annual_insurance = insurance * 12.0;

            projection.add_year(HousingYear {
                age: profile.age_at(year),
                rent: annual_rent,
                insurance: annual_insurance,
                total_cost: annual_rent + annual_insurance,
                ..Default::default()
            });

            rent *= 1.0 + self.rent_increase_rate;
            insurance *= 1.0 + profile.inflation_rate;
        }

        projection
    }
}
