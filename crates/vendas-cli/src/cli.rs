//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vendas_core::Region;

/// Vendas - Sales dashboard for the labdados sales API
#[derive(Parser)]
#[command(name = "vendas")]
#[command(about = "Sales analytics dashboard: revenue and sales by state, month, category and seller", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.config/vendas/dashboard.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Sales API URL (overrides the config file and VENDAS_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch sales and print the dashboard tabs
    Report {
        /// Region: Brasil (all), Centro-Oeste, Nordeste, Norte, Sudeste, Sul
        #[arg(short, long, default_value = "Brasil")]
        region: Region,

        /// Year (omit for all years)
        #[arg(short, long)]
        year: Option<i32>,

        /// Only include these sellers (repeatable)
        #[arg(short, long = "seller")]
        sellers: Vec<String>,

        /// Sellers in the top-N views (2-10, defaults to the config value)
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u8).range(2..=10))]
        top: Option<u8>,

        /// Tab to print: receita, quantidade, vendedores, all
        #[arg(long, default_value = "all")]
        tab: String,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// List the sellers present for a region/year (the seller multiselect options)
    Sellers {
        /// Region: Brasil (all), Centro-Oeste, Nordeste, Norte, Sudeste, Sul
        #[arg(short, long, default_value = "Brasil")]
        region: Region,

        /// Year (omit for all years)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// List the region options and the query value sent for each
    Regions,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory with static UI files to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allowed CORS origin (repeatable; default same-origin only)
        #[arg(long = "allow-origin")]
        allowed_origins: Vec<String>,
    },

    /// Show the resolved configuration
    Config,
}
