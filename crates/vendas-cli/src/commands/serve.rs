//! Server command implementation

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use vendas_core::{Config, SalesSource};
use vendas_server::ServerConfig;

use super::http_source;

pub async fn cmd_serve(
    config: Config,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    allowed_origins: Vec<String>,
) -> Result<()> {
    if let Some(dir) = static_dir {
        if !dir.is_dir() {
            anyhow::bail!("Static directory not found: {}", dir.display());
        }
    }

    println!("🚀 Starting Vendas web server...");
    println!("   Sales API: {}", config.api.base_url);
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    if !allowed_origins.is_empty() {
        println!("   CORS origins: {}", allowed_origins.join(", "));
    }
    println!();

    let source: Arc<dyn SalesSource> = Arc::new(http_source(&config));
    let static_dir_str = static_dir.map(|p| p.to_string_lossy().to_string());

    vendas_server::serve_with_config(
        source,
        config,
        host,
        port,
        static_dir_str.as_deref(),
        ServerConfig { allowed_origins },
    )
    .await
}
