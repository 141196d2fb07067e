//! TrendLens - Climate justice social media trend dashboard
//!
//! Opens the desktop dashboard by default; `summary`, `report` and `list` run headless.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use eframe::egui;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use trendlens::charts::StaticChartRenderer;
use trendlens::gui::TrendLensApp;
use trendlens::{Dashboard, DashboardConfig, DashboardInputs, DataSource};

#[derive(Parser)]
#[command(name = "trendlens", version, about = "Climate justice social media trend dashboard")]
struct Cli {
    /// Config file (defaults to ./trendlens.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the dashboard window
    Gui,
    /// Print tables and KPIs as JSON
    Summary {
        #[command(flatten)]
        selection: Selection,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Write the dashboard charts to a PNG file
    Report {
        #[command(flatten)]
        selection: Selection,
        /// Output path (defaults to the configured report path)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List CSV files in the data directory
    List,
}

#[derive(Args)]
struct Selection {
    /// CSV file, relative to the data directory unless absolute; demo data when omitted
    #[arg(long)]
    csv: Option<PathBuf>,
    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,
}

impl Selection {
    fn inputs(&self) -> DashboardInputs {
        DashboardInputs {
            source: self
                .csv
                .clone()
                .map_or(DataSource::Demo, DataSource::Csv),
            start: self.start,
            end: self.end,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = DashboardConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command.unwrap_or(Command::Gui) {
        Command::Gui => run_gui(config),
        Command::Summary { selection, pretty } => {
            let view = Dashboard::new(&config)
                .compute(&selection.inputs())
                .context("building dashboard")?;
            let json = if pretty {
                serde_json::to_string_pretty(&view)?
            } else {
                serde_json::to_string(&view)?
            };
            println!("{json}");
            Ok(())
        }
        Command::Report { selection, out } => {
            let view = Dashboard::new(&config)
                .compute(&selection.inputs())
                .context("building dashboard")?;
            let path = out.unwrap_or_else(|| config.report_path.clone());
            StaticChartRenderer::render_dashboard_png(
                &view,
                &path,
                config.report_width,
                config.report_height,
            )
            .with_context(|| format!("rendering report to {}", path.display()))?;
            if config.open_after_export {
                open::that(&path).with_context(|| format!("opening {}", path.display()))?;
            }
            println!("{}", path.display());
            Ok(())
        }
        Command::List => {
            for path in Dashboard::new(&config).candidates() {
                println!("{}", path.display());
            }
            Ok(())
        }
    }
}

fn run_gui(config: DashboardConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Climate Action – Justice Lens"),
        ..Default::default()
    };

    eframe::run_native(
        "TrendLens",
        options,
        Box::new(|cc| Ok(Box::new(TrendLensApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard window failed: {e}"))
}
