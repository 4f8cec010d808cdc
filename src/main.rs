//! Housing Projection CLI
//!
//! Runs rent vs. mortgage projections and manages saved scenarios

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use housing_projection::export::export_comparison;
use housing_projection::storage::ScenarioRecord;
use housing_projection::{
    load_inputs, load_tax_tables, FileStore, ProjectionInputs, ProjectionResult, ScenarioLibrary,
    ScenarioRunner, TaxTables,
};

#[derive(Parser, Debug)]
#[command(name = "housing_projection")]
#[command(about = "Compare renting with 15- and 30-year mortgages over a lifetime")]
struct Args {
    /// Directory holding saved scenarios
    #[arg(long, global = true, default_value = ".housing_projection")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a projection and print the comparison
    Run {
        /// JSON input bundle (default: built-in example household)
        #[arg(long)]
        inputs: Option<PathBuf>,

        /// CSV bracket tables replacing the built-in 2024 tables
        #[arg(long)]
        tax_table: Option<PathBuf>,

        /// Write the comparison tables to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,

        /// Number of yearly rows to print (default: all)
        #[arg(long)]
        rows: Option<usize>,
    },

    /// Save an input bundle under a name
    Save {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        notes: String,

        #[arg(long)]
        inputs: Option<PathBuf>,
    },

    /// List saved scenarios
    List,

    /// Show a saved scenario and its projection summary
    Show {
        #[arg(long)]
        id: String,
    },

    /// Delete a saved scenario
    Delete {
        #[arg(long)]
        id: String,
    },
}

fn read_inputs(path: Option<&Path>) -> Result<ProjectionInputs> {
    match path {
        Some(path) => load_inputs(path)
            .with_context(|| format!("failed to load inputs from {}", path.display())),
        None => Ok(ProjectionInputs::default_example()),
    }
}

fn read_tax_tables(path: Option<&Path>) -> Result<TaxTables> {
    match path {
        Some(path) => load_tax_tables(path)
            .with_context(|| format!("failed to load tax tables from {}", path.display())),
        None => Ok(TaxTables::default()),
    }
}

fn open_library(store: &Path) -> Result<ScenarioLibrary<FileStore>> {
    let store = FileStore::open(store)
        .with_context(|| format!("failed to open scenario store {}", store.display()))?;
    Ok(ScenarioLibrary::new(store))
}

fn print_summary(result: &ProjectionResult) {
    let summary = result.summary();

    println!(
        "Projection Results ({} years, ages {}-{}):",
        summary.years,
        result.profile.start_age,
        summary.final_age.unwrap_or(result.profile.start_age)
    );
    println!(
        "{:<18} {:>16} {:>16} {:>16} {:>10}",
        "Scenario", "Total Cost", "Assets", "Net Position", "Depleted"
    );
    println!("{}", "-".repeat(80));
    for s in &summary.scenarios {
        println!(
            "{:<18} {:>16.2} {:>16.2} {:>16.2} {:>10}",
            s.scenario.label(),
            s.final_total_cost,
            s.final_assets,
            s.final_net_position,
            s.depleted_at.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string()),
        );
    }
    println!();

    if let Some(best) = summary.best {
        println!("Best final net position: {}", best);
    }
    for crossover in &summary.crossovers {
        match crossover.age {
            Some(age) => println!("{} overtakes renting at age {}", crossover.scenario, age),
            None => println!("{} never overtakes renting", crossover.scenario),
        }
    }
}

fn print_net_position(result: &ProjectionResult, rows: Option<usize>) {
    let table = &result.comparison.net_position;
    let shown = rows.unwrap_or(table.rows.len()).min(table.rows.len());

    println!();
    print!("{:>4}", "Age");
    for scenario in &table.scenarios {
        print!(" {:>18}", scenario.label());
    }
    println!();
    println!("{}", "-".repeat(4 + 19 * table.scenarios.len()));

    for row in table.rows.iter().take(shown) {
        print!("{:>4}", row.age);
        for value in &row.values {
            print!(" {:>18.2}", value);
        }
        println!();
    }
    if table.rows.len() > shown {
        println!("... ({} more years)", table.rows.len() - shown);
    }
}

fn print_record(record: &ScenarioRecord) {
    println!(
        "{}  {:<24} updated {}",
        record.id,
        record.name,
        record.updated_at.format("%Y-%m-%d %H:%M")
    );
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Command::Run {
            inputs,
            tax_table,
            export,
            rows,
        } => {
            let inputs = read_inputs(inputs.as_deref())?;
            let runner = ScenarioRunner::with_tax_tables(read_tax_tables(tax_table.as_deref())?);
            let result = runner.run(&inputs);

            print_summary(&result);
            print_net_position(&result, rows);

            if let Some(path) = export {
                export_comparison(&path, &result.comparison)
                    .with_context(|| format!("failed to export to {}", path.display()))?;
                println!("\nWrote comparison tables to {}", path.display());
            }

            open_library(&args.store)?
                .autosave(&inputs)
                .context("failed to autosave inputs")?;
        }
        Command::Save {
            name,
            notes,
            inputs,
        } => {
            let inputs = read_inputs(inputs.as_deref())?;
            let record = open_library(&args.store)?.save(&name, &notes, &inputs)?;
            info!("saved scenario {}", record.id);
            println!("Saved `{}` as {}", record.name, record.id);
        }
        Command::List => {
            let records = open_library(&args.store)?.list()?;
            if records.is_empty() {
                println!("No saved scenarios in {}", args.store.display());
            }
            for record in &records {
                print_record(record);
            }
        }
        Command::Show { id } => {
            let record = open_library(&args.store)?.load(&id)?;
            print_record(&record);
            if !record.notes.is_empty() {
                println!("  {}", record.notes);
            }
            println!();
            print_summary(&ScenarioRunner::new().run(&record.snapshot));
        }
        Command::Delete { id } => {
            open_library(&args.store)?.delete(&id)?;
            println!("Deleted {}", id);
        }
    }

    Ok(())
}
