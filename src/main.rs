use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod charts;
mod dataset;
mod filters;
mod memo;
mod metrics;
mod report;
mod session;

use charts::{RadarVariable, ViolinVariable};
use dataset::{Dataset, Gender};
use session::DashboardSession;

#[derive(Parser)]
#[command(name = "depression-dashboard")]
#[command(about = "Explore workplace depression survey data with linked filtered views", long_about = None)]
struct Cli {
    /// Path to the survey CSV file
    #[arg(long, default_value = "data/depression_survey.csv", global = true)]
    data: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Lower age bound (default: dataset minimum)
    #[arg(long)]
    age_min: Option<u32>,
    /// Upper age bound (default: dataset maximum)
    #[arg(long)]
    age_max: Option<u32>,
    /// Gender to include; repeat for multiple (default: both)
    #[arg(long = "gender", value_enum)]
    genders: Vec<Gender>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the three summary cards
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show the filtered rows as a table
    Table {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show the radar aggregation for a categorical variable
    Radar {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, value_enum, default_value = "depression")]
        variable: RadarVariable,
        /// Emit the chart-ready series as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the violin distribution for a selected variable
    Violin {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, value_enum, default_value = "work-hours")]
        variable: ViolinVariable,
        /// Emit the chart-ready points as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show every view at once
    Dashboard {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, value_enum, default_value = "depression")]
        radar_variable: RadarVariable,
        #[arg(long, value_enum, default_value = "work-hours")]
        violin_variable: ViolinVariable,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, value_enum, default_value = "depression")]
        radar_variable: RadarVariable,
        #[arg(long, value_enum, default_value = "work-hours")]
        violin_variable: ViolinVariable,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let dataset = Dataset::load(&cli.data)
        .with_context(|| format!("failed to load dataset from {}", cli.data.display()))?;
    let mut session = DashboardSession::new(dataset);

    match cli.command {
        Commands::Summary { filter } => {
            apply_filters(&mut session, &filter)?;
            print!("{}", report::render_summary(&mut session));
        }
        Commands::Table { filter } => {
            apply_filters(&mut session, &filter)?;
            println!("{}", report::render_table(&mut session));
        }
        Commands::Radar {
            filter,
            variable,
            json,
        } => {
            apply_filters(&mut session, &filter)?;
            let chart = session.radar(variable);
            if json {
                println!("{}", serde_json::to_string_pretty(&chart)?);
            } else {
                print!("{}", report::render_radar(&chart));
            }
        }
        Commands::Violin {
            filter,
            variable,
            json,
        } => {
            apply_filters(&mut session, &filter)?;
            let chart = session.violin(variable);
            if json {
                println!("{}", serde_json::to_string_pretty(&chart)?);
            } else {
                print!("{}", report::render_violin(&chart));
            }
        }
        Commands::Dashboard {
            filter,
            radar_variable,
            violin_variable,
        } => {
            apply_filters(&mut session, &filter)?;
            print!(
                "{}",
                report::render_dashboard(&mut session, radar_variable, violin_variable)
            );
        }
        Commands::Report {
            filter,
            radar_variable,
            violin_variable,
            out,
        } => {
            apply_filters(&mut session, &filter)?;
            let report = report::build_report(&mut session, radar_variable, violin_variable);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn apply_filters(session: &mut DashboardSession, filter: &FilterArgs) -> anyhow::Result<()> {
    if filter.age_min.is_some() || filter.age_max.is_some() {
        let extent = session.dataset().age_extent();
        let lo = filter.age_min.unwrap_or(extent.min);
        let hi = filter.age_max.unwrap_or(extent.max);
        session
            .set_age_range(lo, hi)
            .context("invalid age filter")?;
    }
    if !filter.genders.is_empty() {
        let genders: BTreeSet<Gender> = filter.genders.iter().copied().collect();
        session.set_genders(genders).context("invalid gender filter")?;
    }
    Ok(())
}
