use anyhow::{Context, Result};
use clap::Parser;
use geopulse::{config, output, pipeline};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "geopulse",
    about = "Batch sentiment analytics for geotagged posts — temporal bucketing + density dashboard"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the full pipeline: load posts → enrich → aggregate → write the dashboard
    Run {
        /// Path to config file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// Output path override for the dashboard HTML
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run collection and aggregation only, print the series as JSON
    Aggregate {
        /// Path to config file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
    },

    /// Render the dashboard from a pre-computed series file (no database access)
    Render {
        /// Path to an aggregated series JSON file
        series: PathBuf,

        /// Path to config file (for dashboard style settings)
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// Output path override for the dashboard HTML
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geopulse=info".parse().unwrap()),
        )
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Run { config, output } => {
            let cfg = config::Config::load(&config)?;
            cfg.validate()?;
            let series = pipeline::run(&cfg)?;
            let path = output.unwrap_or_else(|| cfg.dashboard.output.clone());
            write_dashboard(&series, &cfg, &path)
        }
        Command::Aggregate { config } => {
            let cfg = config::Config::load(&config)?;
            cfg.validate()?;
            let series = pipeline::run(&cfg)?;
            println!("{}", serde_json::to_string_pretty(&series)?);
            Ok(())
        }
        Command::Render {
            series,
            config,
            output,
        } => {
            let cfg = config::Config::load(&config).unwrap_or_default();
            let series: pipeline::AggregatedSeries =
                serde_json::from_str(&std::fs::read_to_string(&series)?)
                    .with_context(|| format!("parse series file {}", series.display()))?;
            let path = output.unwrap_or_else(|| cfg.dashboard.output.clone());
            write_dashboard(&series, &cfg, &path)
        }
    }
}

fn write_dashboard(
    series: &pipeline::AggregatedSeries,
    cfg: &config::Config,
    path: &Path,
) -> Result<()> {
    let html = output::render_dashboard(series, &cfg.dashboard, &cfg.style)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &html)?;

    println!(
        "Dashboard written: {} ({} selections, {} posts)",
        path.display(),
        series.labels.len(),
        series
            .full_dataset()
            .map_or(0, |bucket| bucket.sentiment.len())
    );
    Ok(())
}
