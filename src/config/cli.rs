use crate::core::Storage;
use crate::utils::error::{HarvestError, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
        let full_path = Path::new(&self.base_path).join(path);
        let display = full_path.display().to_string();

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|source| HarvestError::FileWrite {
                path: display.clone(),
                source,
            })?;
        }

        fs::write(&full_path, data).map_err(|source| HarvestError::FileWrite {
            path: display.clone(),
            source,
        })?;
        Ok(display)
    }
}
