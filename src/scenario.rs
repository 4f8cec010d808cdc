//! Housing scenarios and a batch runner for many input variations
//!
//! A single projection is cheap and sequential; the runner parallelizes
//! across independent input bundles instead.

use std::fmt;

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::housing::{Apartment, House, HousingPlan};
use crate::inputs::ProjectionInputs;
use crate::projection::{ProjectionEngine, ProjectionResult};
use crate::tax::TaxTables;

/// Housing strategy compared by every projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    Rent,
    Mortgage15,
    Mortgage30,
}

impl Scenario {
    /// Every scenario, in table column order
    pub const ALL: [Scenario; 3] = [Scenario::Rent, Scenario::Mortgage15, Scenario::Mortgage30];

    pub fn label(&self) -> &'static str {
        match self {
            Scenario::Rent => "Rent",
            Scenario::Mortgage15 => "15-Year Mortgage",
            Scenario::Mortgage30 => "30-Year Mortgage",
        }
    }

    /// Loan term, `None` when renting
    pub fn term_years(&self) -> Option<u32> {
        match self {
            Scenario::Rent => None,
            Scenario::Mortgage15 => Some(15),
            Scenario::Mortgage30 => Some(30),
        }
    }

    /// Housing model for this scenario built from a parameter bundle
    pub fn housing_plan(&self, inputs: &ProjectionInputs) -> HousingPlan {
        match self.term_years() {
            None => HousingPlan::Apartment(Apartment::from_terms(&inputs.rent)),
            Some(term) => HousingPlan::House(House::from_terms(&inputs.mortgage, term)),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Runs projections for many input bundles sharing one set of tax tables
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let variations: Vec<_> = [0.05, 0.07, 0.09]
///     .iter()
///     .map(|&rate| {
///         let mut inputs = ProjectionInputs::default_example();
///         inputs.investments[0].annual_return_rate = rate;
///         inputs
///     })
///     .collect();
/// let results = runner.run_batch(&variations);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    tax_tables: TaxTables,
}

impl ScenarioRunner {
    /// Runner using the built-in tax tables
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tax_tables(tax_tables: TaxTables) -> Self {
        Self { tax_tables }
    }

    /// Run a single projection
    pub fn run(&self, inputs: &ProjectionInputs) -> ProjectionResult {
        ProjectionEngine::new(inputs.clone())
            .with_tax_tables(self.tax_tables.clone())
            .run()
    }

    /// Run every bundle in parallel; results keep the input order
    pub fn run_batch(&self, variations: &[ProjectionInputs]) -> Vec<ProjectionResult> {
        info!("running {} projection variations", variations.len());
        variations.par_iter().map(|inputs| self.run(inputs)).collect()
    }
}
