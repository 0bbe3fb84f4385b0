#![cfg(not(tarpaulin_include))]

use recipe_dashboard::app;
use recipe_dashboard::config::{DashboardConfig, init_logging};

/// Main entry point for the recipe dashboard web application
///
/// Loads the recipe table and state boundaries once, then serves the
/// dashboard until the process exits.
///
/// # Arguments
/// * `[data] [geojson] [bind]` - optional positional overrides, see [`DashboardConfig`]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = DashboardConfig::from_env_and_args();
    log::info!("starting dashboard with {:?}", config);

    app::run(config).await
}
