//! Bundled book files read from a data directory.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;

use super::DataSource;
use crate::core::store::LoadError;

pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DataSource for DirectorySource {
    fn name(&self) -> &str {
        "directory"
    }

    async fn fetch(&self, file_name: &str) -> Result<Vec<u8>, LoadError> {
        // Book files are flat names; refuse anything that could escape the root.
        if file_name.contains(['/', '\\']) || file_name.starts_with('.') {
            return Err(LoadError::DataSourceNotFound(file_name.to_string()));
        }
        let path = self.root.join(file_name);
        debug!("Reading bundled data from {}", path.display());
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(LoadError::DataSourceNotFound(file_name.to_string()))
            }
            Err(e) => Err(LoadError::Unreadable(format!("{}: {e}", path.display()))),
        }
    }
}
