//! ghgcalc command-line front end
//!
//! # Usage
//!
//! ```bash
//! ghgcalc categories
//! ghgcalc list stationary-combustion
//! ghgcalc show 1.1
//! ghgcalc eval 0.2 10 CH4
//! ghgcalc expr "E * GWP" --bind E=10 --bind GWP=28
//! ghgcalc session --config ghgcalc.toml
//! ```

mod chart;
mod report;
mod session;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ghgcalc_core::{FormulaDispatcher, Settings};
use ghgcalc_formulas::FORMULA_REGISTRY;

use crate::chart::TextChart;
use crate::session::Session;

/// Greenhouse-gas emission calculator
#[derive(Parser, Debug)]
#[command(name = "ghgcalc", version)]
#[command(about = "Evaluate greenhouse-gas emission formulas")]
struct Args {
    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Decimal places of displayed results, overrides the settings file
    #[arg(short, long, global = true)]
    precision: Option<usize>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log every evaluation
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the formula categories
    Categories,
    /// List the formulas of a category (slug, name or number)
    List { category: String },
    /// Describe a formula and its inputs
    Show { id: String },
    /// Evaluate a formula with one value per input
    Eval {
        id: String,
        /// Input values in declaration order
        #[arg(allow_hyphen_values = true)]
        fields: Vec<String>,
    },
    /// Evaluate a free-text expression
    Expr {
        expression: String,
        /// Variable binding, `name=value`
        #[arg(short, long = "bind")]
        bindings: Vec<String>,
    },
    /// Show the fuel reference table
    Fuels,
    /// Read commands from standard input
    Session {
        /// Do not draw the history chart
        #[arg(long)]
        no_chart: bool,
    },
}

#[derive(Serialize)]
struct CategoryEntry {
    number: usize,
    slug: &'static str,
    name: &'static str,
    formulas: usize,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("ghgcalc=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ghgcalc=info"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
    }
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(precision) = args.precision {
        settings.precision = precision;
    }
    debug!(?settings, "Loaded settings");
    Ok(settings)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let settings = load_settings(&args)?;

    let registry = &*FORMULA_REGISTRY;
    let mut dispatcher = FormulaDispatcher::with_settings(registry, &settings);

    match args.command {
        Command::Categories => {
            if args.json {
                let entries: Vec<_> = registry
                    .list_categories()
                    .iter()
                    .map(|c| CategoryEntry {
                        number: c.number(),
                        slug: c.slug(),
                        name: c.name(),
                        formulas: registry.formulas_in(*c).count(),
                    })
                    .collect();
                print_json(&entries)?;
            } else {
                print!("{}", report::CategoryListing(registry));
            }
        }
        Command::List { category } => {
            let formulas = registry.list_formulas(&category)?;
            if args.json {
                print_json(&formulas)?;
            } else {
                print!("{}", report::FormulaListing(&formulas));
            }
        }
        Command::Show { id } => {
            let spec = registry.get(&id)?;
            if args.json {
                print_json(spec)?;
            } else {
                print!("{}", report::FormulaDetails(spec));
            }
        }
        Command::Eval { id, fields } => {
            let result = dispatcher.evaluate(&id, fields.as_slice())?;
            if args.json {
                print_json(&result)?;
            } else {
                println!("{result}");
            }
        }
        Command::Expr {
            expression,
            bindings,
        } => {
            let result = dispatcher.evaluate_expression(&expression, &bindings.join("\n"))?;
            if args.json {
                print_json(&result)?;
            } else {
                println!("{result}");
            }
        }
        Command::Fuels => {
            if args.json {
                print_json(registry.fuels())?;
            } else {
                print!("{}", report::FuelTable(registry.fuels()));
            }
        }
        Command::Session { no_chart } => {
            if settings.chart && !no_chart {
                dispatcher.add_observer(Box::new(TextChart::stdout(settings.chart_width)));
            }
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            Session::new(dispatcher, settings).run(stdin.lock(), &mut stdout)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
