//! Configuration display command

use anyhow::Result;
use vendas_core::config::{default_config_path, API_URL_ENV, TIMEOUT_ENV};
use vendas_core::Config;

pub fn cmd_config(config: &Config) -> Result<()> {
    println!();
    println!("⚙️  Configuration");
    println!("   Loaded from: {}", config.source);
    if let Some(path) = default_config_path() {
        println!("   User config: {}", path.display());
    }
    println!("   ─────────────────────────────────────────────");
    println!("   [api]");
    println!("   base_url      = {}", config.api.base_url);
    println!("   timeout_secs  = {}", config.api.timeout_secs);
    println!("   [dashboard]");
    println!("   top_states    = {}", config.dashboard.top_states);
    println!("   top_sellers   = {}", config.dashboard.top_sellers);
    println!(
        "   years         = {}-{}",
        config.dashboard.year_min, config.dashboard.year_max
    );
    println!();
    println!(
        "   Environment overrides: {}, {} (and --api-url)",
        API_URL_ENV, TIMEOUT_ENV
    );
    Ok(())
}
