//! Projection engine and cross-scenario comparison

mod aggregate;
mod engine;
mod result;
mod series;

pub use aggregate::{
    compare, cumulative_assets, net_position, total_costs, Comparison, ComparisonRow,
    ComparisonTable,
};
pub use engine::ProjectionEngine;
pub use result::{Crossover, ProjectionResult, ProjectionSummary, ScenarioProjection, ScenarioSummary};
pub use series::{Series, YearRecord};
