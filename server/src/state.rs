use std::path::{Path, PathBuf};
use std::sync::Arc;

use migration_map_shared::DATASET_FILES;

use crate::config::{data_dir, dist_dir};

#[derive(Debug, Clone)]
pub struct AppState {
    pub dist_dir: Arc<PathBuf>,
    pub data_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(dist_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            dist_dir: Arc::new(dist_dir.into()),
            data_dir: Arc::new(data_dir.into()),
        }
    }

    pub fn from_env() -> Self {
        Self::new(dist_dir(), data_dir())
    }

    /// Dataset files the client will ask for that are not on disk.
    pub async fn missing_datasets(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for file in DATASET_FILES {
            if !is_file(&self.data_dir.join(file)).await {
                missing.push(file);
            }
        }
        missing
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
