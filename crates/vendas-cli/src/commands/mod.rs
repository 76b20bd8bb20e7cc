//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `common` - Shared utilities (config loading, filter resolution, sales source)
//! - `report` - Dashboard report command
//! - `sellers` - Filter option commands (sellers, regions)
//! - `serve` - Web server command
//! - `settings` - Resolved configuration display

pub mod common;
pub mod report;
pub mod sellers;
pub mod serve;
pub mod settings;

// Re-export command functions for main.rs
pub use common::*;
pub use report::*;
pub use sellers::*;
pub use serve::*;
pub use settings::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
