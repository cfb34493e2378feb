use crate::domain::model::{CertRecord, RegistrableDomain, SubdomainSet};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn timeout(&self) -> Duration;
    fn user_agent(&self) -> &str {
        concat!("subhunt/", env!("CARGO_PKG_VERSION"))
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, domain: &RegistrableDomain) -> Result<Vec<CertRecord>>;
    fn transform(&self, domain: &RegistrableDomain, records: Vec<CertRecord>) -> SubdomainSet;
    async fn load(&self, domain: &RegistrableDomain, subdomains: &SubdomainSet) -> Result<String>;
}
