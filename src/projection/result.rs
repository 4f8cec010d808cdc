//! Projection output and summary statistics

use serde::{Deserialize, Serialize};

use super::aggregate::{Comparison, ComparisonTable};
use crate::healthcare::HealthcareProjection;
use crate::housing::HousingProjection;
use crate::inputs::Profile;
use crate::investment::ScenarioInvestments;
use crate::living::LivingProjection;
use crate::scenario::Scenario;

/// Housing and investment tracks of one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProjection {
    pub scenario: Scenario,
    pub housing: HousingProjection,
    pub investments: ScenarioInvestments,
}

/// Complete output of a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub profile: Profile,
    pub scenarios: Vec<ScenarioProjection>,
    pub living: LivingProjection,
    pub healthcare: Option<HealthcareProjection>,
    pub comparison: Comparison,
}

impl ProjectionResult {
    pub fn years(&self) -> usize {
        self.living.series.len()
    }

    pub fn scenario(&self, scenario: Scenario) -> Option<&ScenarioProjection> {
        self.scenarios.iter().find(|s| s.scenario == scenario)
    }

    /// Final-year figures, the best scenario and net-position crossovers
    pub fn summary(&self) -> ProjectionSummary {
        let comparison = &self.comparison;
        let last = self.years().checked_sub(1);
        let final_value = |table: &ComparisonTable, scenario: Scenario| {
            last.and_then(|year| table.value(year, scenario)).unwrap_or(0.0)
        };

        let scenarios: Vec<ScenarioSummary> = self
            .scenarios
            .iter()
            .map(|s| ScenarioSummary {
                scenario: s.scenario,
                final_total_cost: final_value(&comparison.total_costs, s.scenario),
                final_assets: final_value(&comparison.cumulative_assets, s.scenario),
                final_net_position: final_value(&comparison.net_position, s.scenario),
                depleted_at: s.investments.depleted_at,
            })
            .collect();

        let best = scenarios
            .iter()
            .max_by(|a, b| a.final_net_position.total_cmp(&b.final_net_position))
            .map(|s| s.scenario);

        let crossovers = self
            .scenarios
            .iter()
            .filter(|s| s.scenario != Scenario::Rent)
            .map(|s| Crossover {
                scenario: s.scenario,
                age: crossover_age(comparison, s.scenario),
            })
            .collect();

        ProjectionSummary {
            years: self.years(),
            final_age: last.and_then(|year| self.living.series.get(year)).map(|r| r.age),
            scenarios,
            best,
            crossovers,
        }
    }
}

/// First age at which `scenario`'s net position catches up with renting
fn crossover_age(comparison: &Comparison, scenario: Scenario) -> Option<u32> {
    let table = &comparison.net_position;
    let rent = table.column(Scenario::Rent)?;
    let column = table.column(scenario)?;

    table
        .rows
        .iter()
        .find(|row| row.values[column] >= row.values[rent])
        .map(|row| row.age)
}

/// Final-year figures for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub scenario: Scenario,
    pub final_total_cost: f64,
    pub final_assets: f64,
    pub final_net_position: f64,
    pub depleted_at: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crossover {
    pub scenario: Scenario,
    /// `None` when the scenario never catches up within the horizon
    pub age: Option<u32>,
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: usize,
    pub final_age: Option<u32>,
    pub scenarios: Vec<ScenarioSummary>,
    /// Scenario with the highest final net position
    pub best: Option<Scenario>,
    pub crossovers: Vec<Crossover>,
}

impl ProjectionSummary {
    pub fn scenario(&self, scenario: Scenario) -> Option<&ScenarioSummary> {
        self.scenarios.iter().find(|s| s.scenario == scenario)
    }

    pub fn crossover_age(&self, scenario: Scenario) -> Option<u32> {
        self.crossovers
            .iter()
            .find(|c| c.scenario == scenario)
            .and_then(|c| c.age)
    }
}
