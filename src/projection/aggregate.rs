//! Cross-scenario comparison tables
//!
//! Pure functions of finished series; cheap enough to rebuild on every run.

use serde::{Deserialize, Serialize};

use super::ScenarioProjection;
use crate::living::LivingProjection;
use crate::scenario::Scenario;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub age: u32,
    /// One value per scenario, in the table's column order
    pub values: Vec<f64>,
}

/// Year-by-scenario table of one aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTable {
    pub title: String,
    pub scenarios: Vec<Scenario>,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    fn build<F>(title: &str, scenarios: &[ScenarioProjection], years: usize, value: F) -> Self
    where
        F: Fn(usize, &ScenarioProjection) -> f64,
    {
        let rows = (0..years)
            .map(|year| ComparisonRow {
                age: scenarios
                    .first()
                    .and_then(|s| s.housing.series.get(year))
                    .map(|r| r.age)
                    .unwrap_or_default(),
                values: scenarios.iter().map(|s| value(year, s)).collect(),
            })
            .collect();

        Self {
            title: title.to_string(),
            scenarios: scenarios.iter().map(|s| s.scenario).collect(),
            rows,
        }
    }

    pub fn column(&self, scenario: Scenario) -> Option<usize> {
        self.scenarios.iter().position(|&s| s == scenario)
    }

    /// Value at a year for a scenario
    pub fn value(&self, year: usize, scenario: Scenario) -> Option<f64> {
        let column = self.column(scenario)?;
        self.rows.get(year).and_then(|r| r.values.get(column)).copied()
    }

    pub fn last_row(&self) -> Option<&ComparisonRow> {
        self.rows.last()
    }
}

/// The three comparison tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub total_costs: ComparisonTable,
    pub cumulative_assets: ComparisonTable,
    pub net_position: ComparisonTable,
}

impl Comparison {
    pub fn tables(&self) -> [&ComparisonTable; 3] {
        [&self.total_costs, &self.cumulative_assets, &self.net_position]
    }
}

/// Housing cumulative cost plus living cumulative cost
pub fn total_costs(scenarios: &[ScenarioProjection], living: &LivingProjection) -> ComparisonTable {
    ComparisonTable::build("Total Costs", scenarios, living.series.len(), |year, s| {
        s.housing.series.cumulative(year) + living.series.cumulative(year)
    })
}

/// Combined investment balances plus home equity
pub fn cumulative_assets(scenarios: &[ScenarioProjection], years: usize) -> ComparisonTable {
    ComparisonTable::build("Cumulative Assets", scenarios, years, |year, s| {
        s.investments.total_balance(year) + s.housing.series.equity(year)
    })
}

/// Assets minus total costs, cell by cell
pub fn net_position(assets: &ComparisonTable, costs: &ComparisonTable) -> ComparisonTable {
    let rows = assets
        .rows
        .iter()
        .zip(&costs.rows)
        .map(|(a, c)| ComparisonRow {
            age: a.age,
            values: a.values.iter().zip(&c.values).map(|(a, c)| a - c).collect(),
        })
        .collect();

    ComparisonTable {
        title: "Net Position".to_string(),
        scenarios: assets.scenarios.clone(),
        rows,
    }
}

/// Build every comparison table
pub fn compare(scenarios: &[ScenarioProjection], living: &LivingProjection) -> Comparison {
    let total_costs = total_costs(scenarios, living);
    let cumulative_assets = cumulative_assets(scenarios, living.series.len());
    let net_position = net_position(&cumulative_assets, &total_costs);

    Comparison {
        total_costs,
        cumulative_assets,
        net_position,
    }
}
