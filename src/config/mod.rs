pub mod toml_config;

pub use toml_config::{ProviderConfig, ResourceFile, TimeoutsConfig};

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use crate::utils::error::{ResourceError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, Validate};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "conversations-address-webhook")]
#[command(about = "Manage a Twilio Conversations address configuration webhook")]
pub struct CliConfig {
    #[arg(long, short, default_value = "address_webhook.toml")]
    pub config: PathBuf,

    #[arg(long, default_value = ".")]
    pub state_dir: PathBuf,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show what apply would do
    Plan,
    /// Create, update or replace the address configuration
    Apply,
    /// Re-read the remote address configuration into state
    Refresh,
    /// Delete the address configuration
    Destroy,
    /// Adopt an existing address configuration: /Configuration/Addresses/<sid>
    Import { id: String },
    /// Print the resource schema as JSON
    Schema,
}

#[cfg(feature = "cli")]
fn path_str<'a>(field: &str, path: &'a std::path::Path) -> Result<&'a str> {
    path.to_str()
        .ok_or_else(|| ResourceError::InvalidConfigValueError {
            field: field.to_string(),
            value: path.display().to_string(),
            reason: "Path is not valid UTF-8".to_string(),
        })
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("--config", path_str("--config", &self.config)?)?;
        validate_path("--state-dir", path_str("--state-dir", &self.state_dir)?)?;
        if self.state_dir.is_file() {
            return Err(ResourceError::InvalidConfigValueError {
                field: "--state-dir".to_string(),
                value: self.state_dir.display().to_string(),
                reason: "State directory points to a file".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn cli(args: &[&str]) -> CliConfig {
        let mut argv = vec!["conversations-address-webhook"];
        argv.extend_from_slice(args);
        CliConfig::parse_from(argv)
    }

    #[test]
    fn test_default_paths_are_valid() {
        assert!(cli(&["plan"]).validate().is_ok());
    }

    #[test]
    fn test_empty_config_path_is_rejected() {
        let err = cli(&["--config", "", "plan"]).validate().unwrap_err();
        assert!(err.to_string().contains("--config"));
    }

    #[test]
    fn test_state_dir_pointing_to_file_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        let err = cli(&["--state-dir", path, "apply"]).validate().unwrap_err();
        assert!(err.to_string().contains("State directory points to a file"));
    }
}
