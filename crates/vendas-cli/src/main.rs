//! Vendas CLI - Sales analytics dashboard
//!
//! Usage:
//!   vendas report --region Sudeste --year 2022   Print the dashboard tabs
//!   vendas sellers --region Nordeste             List sellers for a region
//!   vendas regions                               List region options
//!   vendas serve --port 3000                     Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref(), cli.api_url.as_deref())?;

    match cli.command {
        Commands::Report {
            region,
            year,
            sellers,
            top,
            tab,
            json,
        } => {
            let filter = commands::resolve_filter(&config, region, year, &sellers)?;
            let source = commands::http_source(&config);
            commands::cmd_report(&source, &config, filter, top, &tab, json).await
        }
        Commands::Sellers { region, year } => {
            let filter = commands::resolve_filter(&config, region, year, &[])?;
            let source = commands::http_source(&config);
            commands::cmd_sellers(&source, &filter).await
        }
        Commands::Regions => commands::cmd_regions(),
        Commands::Serve {
            port,
            host,
            static_dir,
            allowed_origins,
        } => commands::cmd_serve(config, &host, port, static_dir.as_deref(), allowed_origins).await,
        Commands::Config => commands::cmd_config(&config),
    }
}
