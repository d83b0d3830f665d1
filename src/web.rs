#![cfg(not(tarpaulin_include))]

use log::error;
use ridership::LoadError;
use ridership::app;
use ridership::config::Config;
use std::process::ExitCode;

/// Main entry point for the dashboard web server
///
/// Loads the configured data file and serves the dashboard until the process
/// is terminated. If the file cannot be loaded the process exits with a
/// failure status and no port is opened.
///
/// # Environment
/// * `RUST_LOG` - log filter, `info` when unset
/// * `PORT`, `DASHBOARD_HOST`, `DASHBOARD_DATA` - see `--help`
#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_args();

    if let Err(e) = app::launch(&config).await {
        match e.downcast_ref::<LoadError>() {
            Some(LoadError::NotFound(path)) => {
                error!("Data file not found: {}", path.display())
            }
            Some(load_error) => {
                error!("Failed to read {}: {load_error}", config.data.display())
            }
            None => error!("Server error: {e}"),
        }
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
