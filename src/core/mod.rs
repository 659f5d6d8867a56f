pub mod plan;
pub mod resource;
pub mod resource_data;
pub mod state;

pub use crate::domain::ports::{AddressConfigurationApi, Storage};
pub use crate::domain::schema::Attributes;
pub use crate::utils::error::Result;
