//! CLI command implementations

pub mod logs;
pub mod menu;

use bankline_core::config::Config;
use bankline_core::LoggingService;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger(config: &Config) -> Option<LoggingService> {
    LoggingService::new(&config.app_dir, env!("CARGO_PKG_VERSION")).ok()
}
