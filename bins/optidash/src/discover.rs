//! Turn a source path into work items

use optidash_core::{Error, ErrorCode, Result};
use optidash_pipeline::WorkItem;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files found under a source, read into memory
#[derive(Debug)]
pub struct Discovered {
    /// Root the relative paths are computed from
    pub base: PathBuf,
    pub items: Vec<WorkItem>,
}

impl Discovered {
    /// Items with content, the ones the progress bar counts
    pub fn non_empty(&self) -> u64 {
        self.items.iter().filter(|item| item.bytes().is_some()).count() as u64
    }
}

/// Walk `source` and read every regular file.
///
/// A file source yields one item relative to its parent directory. Zero-byte
/// files become empty items. Entries are sorted by path so runs are repeatable.
pub fn discover(source: &Path) -> Result<Discovered> {
    let metadata = std::fs::metadata(source).map_err(|e| {
        Error::from(e).with_context(format!("Reading source {}", source.display()))
    })?;

    let base = if metadata.is_dir() {
        source.to_path_buf()
    } else {
        source.parent().map(Path::to_path_buf).unwrap_or_default()
    };

    let mut items = Vec::new();
    for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            Error::new(ErrorCode::IoError, e.to_string())
                .with_context(format!("Walking {}", source.display()))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        let bytes = std::fs::read(&path)
            .map_err(|e| Error::from(e).with_context(format!("Reading {}", path.display())))?;

        let item = if bytes.is_empty() {
            WorkItem::empty(path)
        } else {
            WorkItem::buffer(path, bytes)
        };
        items.push(item.with_base(&base));
    }

    tracing::debug!(source = %source.display(), files = items.len(), "Discovered files");
    Ok(Discovered { base, items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use optidash_pipeline::ContentKind;

    #[test]
    fn test_discover_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("img")).unwrap();
        std::fs::write(dir.path().join("img/a.png"), [1u8, 2, 3]).unwrap();
        std::fs::write(dir.path().join("empty.jpg"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hi").unwrap();

        let found = discover(dir.path()).unwrap();
        let relative: Vec<_> = found
            .items
            .iter()
            .map(|item| item.relative().to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(relative, ["empty.jpg", "img/a.png", "notes.txt"]);
        assert_eq!(found.items[0].kind(), ContentKind::Empty);
        assert_eq!(found.non_empty(), 2);
    }

    #[test]
    fn test_discover_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("logo.svg");
        std::fs::write(&file, b"<svg/>").unwrap();

        let found = discover(&file).unwrap();
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].relative(), Path::new("logo.svg"));
        assert_eq!(found.base, dir.path());
    }

    #[test]
    fn test_missing_source() {
        let err = discover(Path::new("/definitely/not/here")).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
    }
}
