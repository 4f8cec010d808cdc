//! Core projection engine for yearly rent vs. buy projections

use log::{debug, info};

use super::aggregate;
use super::result::{ProjectionResult, ScenarioProjection};
use crate::healthcare;
use crate::housing::{HousingModel, HousingProjection};
use crate::inputs::ProjectionInputs;
use crate::investment::InvestmentModel;
use crate::living;
use crate::scenario::Scenario;
use crate::tax::TaxTables;

/// Main projection engine
pub struct ProjectionEngine {
    inputs: ProjectionInputs,
    tax_tables: TaxTables,
}

impl ProjectionEngine {
    /// Create an engine over validated inputs, using the built-in tax tables
    pub fn new(inputs: ProjectionInputs) -> Self {
        Self {
            inputs,
            tax_tables: TaxTables::default(),
        }
    }

    /// Replace the bracket tables used when a tax configuration is present
    pub fn with_tax_tables(mut self, tax_tables: TaxTables) -> Self {
        self.tax_tables = tax_tables;
        self
    }

    pub fn inputs(&self) -> &ProjectionInputs {
        &self.inputs
    }

    /// Run every scenario over the full horizon
    pub fn run(&self) -> ProjectionResult {
        let inputs = &self.inputs;
        let profile = &inputs.profile;
        info!(
            "projecting ages {}..{} (retirement at {})",
            profile.start_age, profile.life_expectancy, profile.retirement_age
        );

        let living = living::calculate(profile);
        let healthcare = inputs
            .healthcare
            .as_ref()
            .map(|config| healthcare::calculate(profile, config));

        let housing: Vec<(Scenario, HousingProjection)> = Scenario::ALL
            .iter()
            .map(|&scenario| {
                let projection = scenario.housing_plan(inputs).calculate(profile);
                debug!(
                    "{}: cumulative housing cost {:.2}",
                    scenario,
                    projection.series.total()
                );
                (scenario, projection)
            })
            .collect();

        let model = InvestmentModel::new(&inputs.investments);
        let model = match &inputs.tax {
            Some(config) => model.with_tax(&self.tax_tables, config),
            None => model,
        };
        let tracks: Vec<&HousingProjection> = housing.iter().map(|(_, p)| p).collect();
        let investments = model.calculate(profile, &tracks, &living, healthcare.as_ref());

        let scenarios: Vec<ScenarioProjection> = housing
            .into_iter()
            .zip(investments)
            .map(|((scenario, housing), investments)| {
                if let Some(age) = investments.depleted_at {
                    info!("{}: investments depleted at age {}", scenario, age);
                }
                ScenarioProjection {
                    scenario,
                    housing,
                    investments,
                }
            })
            .collect();

        let comparison = aggregate::compare(&scenarios, &living);

        ProjectionResult {
            profile: profile.clone(),
            scenarios,
            living,
            healthcare,
            comparison,
        }
    }
}
