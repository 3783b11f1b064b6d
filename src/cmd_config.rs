//! `check-config` handler.

use tracing::warn;

use pagesnap_config::{Config, ConfigValidator};

/// Validate the loaded configuration and report findings.
pub(crate) fn check_config(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let result = ConfigValidator::validate(config);

    for warning in &result.warnings {
        warn!("{}: {}", warning.path, warning.message);
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }

    match result.into_error() {
        Some(err) => Err(err.into()),
        None => {
            println!("Configuration OK");
            Ok(())
        }
    }
}
