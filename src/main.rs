use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

mod augment;
mod chart;
mod export;
mod generate;
mod loader;
mod models;
mod report;
mod state;
mod table;
mod timestamp;

use loader::{DataSource, Loader, DEFAULT_SOURCE};
use report::Dashboard;
use table::{TableView, DEFAULT_PAGE_SIZE};
use timestamp::DisplayZone;

#[derive(Parser)]
#[command(name = "perfdash")]
#[command(about = "Performance index dashboard for simulation run records", long_about = None)]
struct Cli {
    /// Dataset path or http(s) URL
    #[arg(long, global = true, env = "PERFDASH_SOURCE", default_value = DEFAULT_SOURCE)]
    source: String,
    /// Read calendar days and display timestamps in UTC instead of local time
    #[arg(long, global = true)]
    utc: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the dataset and render the table and status chart
    Show {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = table::parse_page_size)]
        page_size: usize,
        /// Mark a record as selected (repeatable)
        #[arg(long = "select")]
        selected: Vec<String>,
        /// Also write the HTML bar chart here
        #[arg(long)]
        chart_out: Option<PathBuf>,
    },
    /// Load the dataset and write the HTML status bar chart
    Chart {
        #[arg(long, default_value = "status_chart.html")]
        out: PathBuf,
    },
    /// Load the dataset and write the augmented records as CSV
    Export {
        #[arg(long, default_value = "augmented.csv")]
        out: PathBuf,
    },
    /// Write a synthetic dataset
    Generate {
        /// Defaults to a random count between 100 and 200
        #[arg(long)]
        num_data_points: Option<usize>,
        #[arg(long, default_value = DEFAULT_SOURCE)]
        out: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 0.1)]
        dropout_rate: f64,
        /// ISO date-time of the first record, defaults to now
        #[arg(long)]
        start: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let zone = if cli.utc {
        DisplayZone::Utc
    } else {
        DisplayZone::Local
    };

    match cli.command {
        Commands::Generate {
            num_data_points,
            out,
            seed,
            dropout_rate,
            start,
        } => {
            let options = generate::GenerateOptions {
                num_data_points: num_data_points
                    .unwrap_or_else(|| rand::thread_rng().gen_range(100..=200)),
                dropout_rate,
                start: generate::parse_start(start.as_deref()),
            };
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let records = generate::generate_records(&options, &mut rng)?;
            generate::write_dataset(&out, &records)?;
            println!("{} random data points saved to {}.", records.len(), out.display());
        }
        Commands::Show {
            page,
            page_size,
            selected,
            chart_out,
        } => {
            let dashboard = load_dashboard(&cli.source, zone).await?;
            let view = TableView::new(zone)
                .with_page_size(page_size)?
                .with_page(page)
                .select(selected);
            print!("{}", dashboard.render(&view));
            if let Some(out) = chart_out {
                std::fs::write(&out, chart::render_html(dashboard.state().data()))?;
                println!("Chart written to {}.", out.display());
            }
            ensure_loaded(&dashboard)?;
        }
        Commands::Chart { out } => {
            let dashboard = load_dashboard(&cli.source, zone).await?;
            std::fs::write(&out, chart::render_html(dashboard.state().data()))?;
            println!("Chart written to {}.", out.display());
            ensure_loaded(&dashboard)?;
        }
        Commands::Export { out } => {
            let dashboard = load_dashboard(&cli.source, zone).await?;
            ensure_loaded(&dashboard)?;
            if let Some(records) = dashboard.state().data() {
                let written = export::export_csv(&out, records)?;
                println!("Exported {written} records to {}.", out.display());
            }
        }
    }

    Ok(())
}

async fn load_dashboard(raw_source: &str, zone: DisplayZone) -> anyhow::Result<Dashboard> {
    let source: DataSource = raw_source
        .parse()
        .with_context(|| format!("invalid data source '{raw_source}'"))?;
    let mut dashboard = Dashboard::new(Loader::new(), zone);
    dashboard.trigger(&source).await;
    Ok(dashboard)
}

fn ensure_loaded(dashboard: &Dashboard) -> anyhow::Result<()> {
    match dashboard.state().error() {
        Some(error) => anyhow::bail!("{error}"),
        None => Ok(()),
    }
}
