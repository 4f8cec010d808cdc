//! Healthcare premiums and out-of-pocket costs, switching to Medicare at 65

use serde::{Deserialize, Serialize};

use crate::inputs::Profile;
use crate::projection::Series;

/// Medicare eligibility age
pub const MEDICARE_AGE: u32 = 65;

/// Coverage before Medicare eligibility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreMedicareCoverage {
    pub monthly_premium: f64,
    pub annual_deductible: f64,
    pub annual_out_of_pocket: f64,
}

/// Medicare coverage (monthly premiums per part)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicareCoverage {
    pub part_b: f64,
    pub part_d: f64,
    pub medigap: f64,
    pub annual_out_of_pocket: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongTermCare {
    pub monthly_premium: f64,
    pub start_age: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthcareConfig {
    pub pre_medicare: PreMedicareCoverage,
    pub medicare: MedicareCoverage,
    #[serde(default)]
    pub long_term_care: Option<LongTermCare>,
}

impl Default for HealthcareConfig {
    /// Marketplace silver plan before 65, Part B/D plus Medigap G after
    fn default() -> Self {
        Self {
            pre_medicare: PreMedicareCoverage {
                monthly_premium: 650.0,
                annual_deductible: 4_000.0,
                annual_out_of_pocket: 2_000.0,
            },
            medicare: MedicareCoverage {
                part_b: 174.70,
                part_d: 40.0,
                medigap: 180.0,
                annual_out_of_pocket: 1_500.0,
            },
            long_term_care: None,
        }
    }
}

/// One year of healthcare costs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthcareYear {
    pub age: u32,
    pub medicare: bool,
    /// Total monthly premium including any long-term care premium
    pub monthly_premium: f64,
    pub long_term_care_monthly: f64,
    pub out_of_pocket: f64,
    pub annual_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthcareProjection {
    pub series: Series,
    pub details: Vec<HealthcareYear>,
}

impl HealthcareProjection {
    pub fn annual_cost(&self, year: usize) -> f64 {
        self.series.period(year)
    }
}

/// Project healthcare costs over the profile's horizon
///
/// All amounts inflate by years since the projection start, not years since
/// a coverage began, so every component shares one compounding base.
pub fn calculate(profile: &Profile, config: &HealthcareConfig) -> HealthcareProjection {
    let years = profile.horizon_years();
    let mut projection = HealthcareProjection {
        series: Series::with_capacity(years),
        details: Vec::with_capacity(years),
    };

    for year in 0..years {
        let age = profile.age_at(year);
        let multiplier = profile.inflation_multiplier(year);
        let medicare = age >= MEDICARE_AGE;

        let (mut monthly_premium, out_of_pocket) = if medicare {
            let m = &config.medicare;
            (
                (m.part_b + m.part_d + m.medigap) * multiplier,
                m.annual_out_of_pocket * multiplier,
            )
        } else {
            let p = &config.pre_medicare;
            (
                p.monthly_premium * multiplier,
                (p.annual_deductible + p.annual_out_of_pocket) * multiplier,
            )
        };

        let long_term_care_monthly = match &config.long_term_care {
            Some(ltc) if age >= ltc.start_age => ltc.monthly_premium * multiplier,
            _ => 0.0,
        };
        monthly_premium += long_term_care_monthly;

        let annual_cost = monthly_premium * 12.0 + out_of_pocket;
        projection.series.push(age, annual_cost);
        projection.details.push(HealthcareYear {
            age,
            medicare,
            monthly_premium,
            long_term_care_monthly,
            out_of_pocket,
            annual_cost,
        });
    }

    projection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::ProjectionInputs;
    use approx::assert_relative_eq;

    fn config() -> HealthcareConfig {
        HealthcareConfig {
            pre_medicare: PreMedicareCoverage {
                monthly_premium: 500.0,
                annual_deductible: 2_000.0,
                annual_out_of_pocket: 1_000.0,
            },
            medicare: MedicareCoverage {
                part_b: 175.0,
                part_d: 25.0,
                medigap: 150.0,
                annual_out_of_pocket: 800.0,
            },
            long_term_care: None,
        }
    }

    #[test]
    fn test_pre_medicare_first_year() {
        let profile = ProjectionInputs::default_example().profile;
        let projection = calculate(&profile, &config());

        let first = &projection.details[0];
        assert!(!first.medicare);
        assert_relative_eq!(first.annual_cost, 500.0 * 12.0 + 3_000.0);
    }

    #[test]
    fn test_medicare_from_sixty_five_uses_start_inflation_base() {
        let profile = ProjectionInputs::default_example().profile;
        let projection = calculate(&profile, &config());

        let year = (MEDICARE_AGE - profile.start_age) as usize;
        let at_65 = &projection.details[year];
        let multiplier = 1.03_f64.powi(year as i32);

        assert!(at_65.medicare);
        assert!(!projection.details[year - 1].medicare);
        assert_relative_eq!(at_65.monthly_premium, 350.0 * multiplier, max_relative = 1e-12);
        assert_relative_eq!(
            projection.annual_cost(year),
            350.0 * multiplier * 12.0 + 800.0 * multiplier,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_long_term_care_added_from_start_age() {
        let profile = ProjectionInputs::default_example().profile;
        let mut with_ltc = config();
        with_ltc.long_term_care = Some(LongTermCare {
            monthly_premium: 200.0,
            start_age: 60,
        });

        let base = calculate(&profile, &config());
        let ltc = calculate(&profile, &with_ltc);

        // Age 59 unaffected
        assert_relative_eq!(ltc.annual_cost(19), base.annual_cost(19));

        // Age 60 and age 70 (pre- and post-Medicare) both carry the inflated premium
        for year in [20usize, 30] {
            let multiplier = 1.03_f64.powi(year as i32);
            assert_relative_eq!(
                ltc.annual_cost(year) - base.annual_cost(year),
                200.0 * multiplier * 12.0,
                max_relative = 1e-9
            );
        }
    }
}
