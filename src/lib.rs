pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, HarvestConfig};

pub use core::{engine::HarvestEngine, harvest::CrtShPipeline, normalize::normalize_domain};
pub use utils::error::{HarvestError, Result};
