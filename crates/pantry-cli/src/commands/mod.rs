//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config, record loading, clock, analytics pass)
//! - `reports` - Analytics commands (report, buckets, freshness, insights)
//! - `settings` - Engine configuration command

pub mod core;
pub mod reports;
pub mod settings;

// Re-export command functions for main.rs
pub use core::*;
pub use reports::*;
pub use settings::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
