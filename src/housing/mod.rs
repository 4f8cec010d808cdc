//! Housing cost models
//!
//! Both models share one contract: given the profile, produce a yearly cost
//! series whose records carry an equity figure (always 0 when renting),
//! plus a detail row per year for tax and presentation use.

mod amortization;
mod apartment;
mod house;

pub use amortization::{monthly_payment, LoanState, LoanYear};
pub use apartment::Apartment;
pub use house::House;

use serde::{Deserialize, Serialize};

use crate::inputs::Profile;
use crate::projection::Series;

/// Shared computation contract for housing strategies
pub trait HousingModel {
    /// Project yearly housing costs and equity over the profile's horizon
    fn calculate(&self, profile: &Profile) -> HousingProjection;
}

/// Line items of one housing year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HousingYear {
    pub age: u32,
    pub rent: f64,
    pub insurance: f64,
    pub hoa: f64,
    pub property_tax: f64,
    pub mortgage_payment: f64,
    pub mortgage_interest: f64,
    pub principal_paid: f64,
    pub remaining_principal: f64,
    /// One-time repair in the first year, maintenance afterwards
    pub upkeep: f64,
    pub total_cost: f64,
    pub home_value: f64,
}

/// Output of a housing model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HousingProjection {
    pub series: Series,
    pub details: Vec<HousingYear>,
}

impl HousingProjection {
    pub fn with_capacity(years: usize) -> Self {
        Self {
            series: Series::with_capacity(years),
            details: Vec::with_capacity(years),
        }
    }

    /// Record a year; the series entry takes the year's total and home value
    pub fn add_year(&mut self, year: HousingYear) {
        self.series.push_with_equity(year.age, year.total_cost, year.home_value);
        self.details.push(year);
    }

    pub fn mortgage_interest(&self, year: usize) -> f64 {
        self.details.get(year).map(|d| d.mortgage_interest).unwrap_or(0.0)
    }

    pub fn property_tax(&self, year: usize) -> f64 {
        self.details.get(year).map(|d| d.property_tax).unwrap_or(0.0)
    }
}

/// Tagged housing strategy carrying its own parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HousingPlan {
    Apartment(Apartment),
    House(House),
}

impl HousingModel for HousingPlan {
    fn calculate(&self, profile: &Profile) -> HousingProjection {
        match self {
            HousingPlan::Apartment(apartment) => apartment.calculate(profile),
            HousingPlan::House(house) => house.calculate(profile),
        }
    }
}
