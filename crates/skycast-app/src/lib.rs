//! Application layer for Skycast: configuration, preference persistence,
//! the pure render pipeline, and the search/location orchestrators.

pub mod config;
pub mod prefs;
pub mod search;
pub mod view;

pub use config::Config;
pub use prefs::{PrefsStore, Preferences};
pub use search::{Dashboard, LocateOutcome, SearchOutcome, WeatherApp};

use anyhow::Result;

/// Initialize logging for the application
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::debug!("Skycast app layer initialized");
    Ok(())
}
