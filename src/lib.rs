pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{storage::LocalStorage, twilio::TwilioConversationsClient};
pub use app::ResourceRunner;
pub use config::ResourceFile;
pub use crate::core::{plan::Plan, resource::AddressConfigurationWebhook, resource_data::ResourceData};
pub use utils::error::{ResourceError, Result};
