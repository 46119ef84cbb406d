//! # Config Commands
//!
//! Runs before the local store is opened, so a broken store path can still
//! be inspected and fixed from here.

use std::path::PathBuf;

use storefront_client::StorefrontConfig;

use super::{ConfigArgs, ConfigCommand};
use crate::error::{AppError, AppResult, ErrorCode};
use crate::output::Output;

/// Run a config command against the loaded configuration.
pub fn run(
    args: ConfigArgs,
    config: &StorefrontConfig,
    path: Option<PathBuf>,
    output: Output,
) -> AppResult<()> {
    match args.command {
        ConfigCommand::Show => {
            let shown = redacted(config);
            let text = toml::to_string_pretty(&shown)
                .map_err(|e| AppError::internal(format!("Could not render config: {e}")))?;
            output.emit(&shown, || text.trim_end().to_string());
        }
        ConfigCommand::Init { force } => {
            let target = path
                .or_else(StorefrontConfig::default_config_path)
                .ok_or_else(|| AppError::new(ErrorCode::ConfigError, "No config path available"))?;
            if target.exists() && !force {
                return Err(AppError::new(
                    ErrorCode::ConfigError,
                    format!("{} already exists (use --force to overwrite)", target.display()),
                ));
            }
            StorefrontConfig::default().save(Some(target.clone()))?;
            output.success(&format!("Wrote {}", target.display()));
        }
    }
    Ok(())
}

fn redacted(config: &StorefrontConfig) -> StorefrontConfig {
    let mut shown = config.clone();
    if shown.auth.token.is_some() {
        shown.auth.token = Some("********".to_string());
    }
    shown
}
