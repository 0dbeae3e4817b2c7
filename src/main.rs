use anyhow::Result;
use clap::{Parser, Subcommand};

use metricdash::{cli, config, web};

#[derive(Debug, Parser)]
#[command(name = "metricdash")]
#[command(about = "Interactive dashboard of precomputed classifier metrics")]
struct App {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the dashboard over HTTP (default when no subcommand is given)
    Serve {
        /// Listen address, overrides `server.addr`
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser window
        #[arg(long)]
        no_browser: bool,
    },
    /// List the model catalog
    Models {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show the model with the highest accuracy
    Best {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Print a single-model chart, or a comparison chart for several models
    Chart {
        /// Model names, e.g. "SVM" "Naive Bayes"
        #[arg(required = true)]
        models: Vec<String>,
        /// Output format: table (default), json, csv, svg
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Check configuration, image asset and access log
    Health,
    /// Show recent access log entries
    Logs {
        /// Number of entries to show
        #[arg(long, default_value = "20")]
        tail: usize,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write the default config to ~/.metricdash/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a key in the global config, e.g. `server.addr 0.0.0.0:8501`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command.unwrap_or(Commands::Serve {
        addr: None,
        no_browser: false,
    }) {
        Commands::Serve { addr, no_browser } => {
            let mut cfg = config::load();
            if let Some(addr) = addr {
                cfg.server.addr = addr;
            }
            if no_browser {
                cfg.server.open_browser = false;
            }
            web::serve(&cfg)
        }
        Commands::Models { format } => {
            cli::run_models(cli::OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Best { format } => cli::run_best(cli::OutputFormat::from_str_opt(Some(&format))),
        Commands::Chart { models, format } => {
            cli::run_chart(&models, cli::OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Health => cli::run_health(),
        Commands::Logs { tail } => cli::run_logs(tail),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
