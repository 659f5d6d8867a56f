use crate::domain::model::{AddressConfigurationResponse, CreateAddressInput, UpdateAddressInput};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

/// Conversations `Configuration/Addresses` API 的抽象
#[async_trait]
pub trait AddressConfigurationApi: Send + Sync {
    async fn create(&self, input: &CreateAddressInput) -> Result<AddressConfigurationResponse>;
    async fn fetch(&self, sid: &str) -> Result<AddressConfigurationResponse>;
    async fn update(
        &self,
        sid: &str,
        input: &UpdateAddressInput,
    ) -> Result<AddressConfigurationResponse>;
    async fn delete(&self, sid: &str) -> Result<()>;
}
