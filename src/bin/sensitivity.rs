//! Sweep investment return and inflation rates
//!
//! Runs every combination in parallel and prints each scenario's final net
//! position alongside the best scenario for that combination.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use housing_projection::{load_inputs, ProjectionInputs, Scenario, ScenarioRunner};

const RETURN_RATES: [f64; 7] = [0.04, 0.05, 0.06, 0.07, 0.08, 0.09, 0.10];
const INFLATION_RATES: [f64; 3] = [0.02, 0.03, 0.04];

#[derive(Parser, Debug)]
#[command(name = "sensitivity")]
#[command(about = "Final net position across return and inflation assumptions")]
struct Args {
    /// JSON input bundle (default: built-in example household)
    #[arg(long)]
    inputs: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let base = match &args.inputs {
        Some(path) => load_inputs(path)
            .with_context(|| format!("failed to load inputs from {}", path.display()))?,
        None => ProjectionInputs::default_example(),
    };

    let grid: Vec<(f64, f64)> = RETURN_RATES
        .iter()
        .flat_map(|&r| INFLATION_RATES.iter().map(move |&i| (r, i)))
        .collect();

    let variations: Vec<ProjectionInputs> = grid
        .iter()
        .map(|&(return_rate, inflation)| {
            let mut inputs = base.clone();
            inputs.profile.inflation_rate = inflation;
            for account in &mut inputs.investments {
                account.annual_return_rate = return_rate;
            }
            inputs
        })
        .collect();

    let start = Instant::now();
    let results = ScenarioRunner::new().run_batch(&variations);
    println!("Ran {} projections in {:?}\n", results.len(), start.elapsed());

    print!("{:>7} {:>9}", "Return", "Inflation");
    for scenario in Scenario::ALL {
        print!(" {:>18}", scenario.label());
    }
    println!(" {:>18}", "Best");
    println!("{}", "-".repeat(17 + 19 * (Scenario::ALL.len() + 1)));

    for (&(return_rate, inflation), result) in grid.iter().zip(&results) {
        let summary = result.summary();
        print!("{:>6.1}% {:>8.1}%", return_rate * 100.0, inflation * 100.0);
        for scenario in Scenario::ALL {
            let value = summary
                .scenario(scenario)
                .map(|s| s.final_net_position)
                .unwrap_or(0.0);
            print!(" {:>18.2}", value);
        }
        println!(
            " {:>18}",
            summary.best.map(|s| s.label()).unwrap_or("-")
        );
    }

    Ok(())
}
