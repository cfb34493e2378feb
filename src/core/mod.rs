pub mod engine;
pub mod harvest;
pub mod normalize;
pub mod sink;

pub use crate::domain::model::{CertRecord, HarvestReport, RegistrableDomain, SubdomainSet};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
