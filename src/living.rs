//! Non-housing living expenses

use serde::{Deserialize, Serialize};

use crate::inputs::Profile;
use crate::projection::Series;

/// One year of living expenses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LivingYear {
    pub age: u32,
    pub retired: bool,
    /// Inflated pre-retirement monthly base for this year
    pub pre_retirement_monthly: f64,
    /// Inflated post-retirement monthly base for this year
    pub post_retirement_monthly: f64,
    pub annual_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LivingProjection {
    pub series: Series,
    pub details: Vec<LivingYear>,
}

/// Yearly spending: the pre-retirement base before `retirement_age`, the
/// post-retirement base from then on.
///
/// Both bases inflate every year whichever is active, so the switch at
/// retirement lands on an already-inflated post-retirement figure.
pub fn calculate(profile: &Profile) -> LivingProjection {
    let years = profile.horizon_years();
    let mut projection = LivingProjection {
        series: Series::with_capacity(years),
        details: Vec::with_capacity(years),
    };

    let mut pre = profile.pre_retirement_monthly_spend;
    let mut post = profile.post_retirement_monthly_spend;

    for year in 0..years {
        let age = profile.age_at(year);
        let retired = profile.is_retired(age);
        let annual_cost = if retired { post * 12.0 } else { pre * 12.0 };

        projection.series.push(age, annual_cost);
        projection.details.push(LivingYear {
            age,
            retired,
            pre_retirement_monthly: pre,
            post_retirement_monthly: post,
            annual_cost,
        });

        pre *= 1.0 + profile.inflation_rate;
        post *= 1.0 + profile.inflation_rate;
    }

    projection
}
