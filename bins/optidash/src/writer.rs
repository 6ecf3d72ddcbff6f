//! Persist emitted items

use optidash_core::{Error, Result};
use optidash_pipeline::{Contents, WorkItem};
use std::path::{Path, PathBuf};

/// Where emitted items go
#[derive(Debug, Clone)]
pub enum Destination {
    /// Mirror relative paths under a directory
    Directory(PathBuf),
    /// Overwrite the source files
    InPlace,
}

impl Destination {
    /// Target path for `item`, or `None` when nothing needs writing
    pub fn target(&self, item: &WorkItem) -> Option<PathBuf> {
        match (self, item.contents()) {
            (Self::Directory(root), Contents::Empty | Contents::Buffer(_)) => {
                Some(root.join(item.relative()))
            }
            (Self::InPlace, Contents::Buffer(_)) => Some(item.path().to_path_buf()),
            _ => None,
        }
    }

    /// Write `item`, returning the path written
    pub async fn write(&self, item: &WorkItem) -> Result<Option<PathBuf>> {
        let Some(target) = self.target(item) else {
            return Ok(None);
        };

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| with_path(e, parent))?;
        }

        let bytes = item.bytes().unwrap_or_default();
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| with_path(e, &target))?;

        Ok(Some(target))
    }
}

fn with_path(err: std::io::Error, path: &Path) -> Error {
    Error::from(err).with_context(format!("Writing {}", path.display()))
}
