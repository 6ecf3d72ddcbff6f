//! Work items flowing through a stage

use std::fmt;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::io::AsyncRead;

/// Incremental byte source
pub type ByteStream = Pin<Box<dyn AsyncRead + Send>>;

/// Content carried by a [`WorkItem`]
pub enum Contents {
    /// No content (directories, placeholders)
    Empty,
    /// Fully materialized bytes
    Buffer(Vec<u8>),
    /// Bytes delivered incrementally
    Stream(ByteStream),
}

/// Kind of content, without the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Empty,
    Buffer,
    Stream,
}

impl Contents {
    /// Kind of this content
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Empty => ContentKind::Empty,
            Self::Buffer(_) => ContentKind::Buffer,
            Self::Stream(_) => ContentKind::Stream,
        }
    }
}

impl fmt::Debug for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Buffer(bytes) => write!(f, "Buffer({} bytes)", bytes.len()),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// A file moving through the stage
///
/// `base` is the root the file was discovered under; [`WorkItem::relative`]
/// strips it for display and output mirroring.
#[derive(Debug)]
pub struct WorkItem {
    path: PathBuf,
    base: Option<PathBuf>,
    contents: Contents,
}

impl WorkItem {
    /// Item with fully buffered bytes
    pub fn buffer(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self::with_contents(path, Contents::Buffer(bytes))
    }

    /// Item without content
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self::with_contents(path, Contents::Empty)
    }

    /// Item with streamed content
    pub fn stream(path: impl Into<PathBuf>, reader: impl AsyncRead + Send + 'static) -> Self {
        Self::with_contents(path, Contents::Stream(Box::pin(reader)))
    }

    fn with_contents(path: impl Into<PathBuf>, contents: Contents) -> Self {
        Self {
            path: path.into(),
            base: None,
            contents,
        }
    }

    /// Record the root this item was discovered under
    #[must_use]
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Full path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Discovery root, if any
    #[must_use]
    pub fn base(&self) -> Option<&Path> {
        self.base.as_deref()
    }

    /// Path relative to the discovery root, or the full path without one
    #[must_use]
    pub fn relative(&self) -> &Path {
        self.base
            .as_deref()
            .and_then(|base| self.path.strip_prefix(base).ok())
            .filter(|rel| !rel.as_os_str().is_empty())
            .unwrap_or(&self.path)
    }

    /// File name used for uploads
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Current content
    #[must_use]
    pub fn contents(&self) -> &Contents {
        &self.contents
    }

    /// Kind of the current content
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        self.contents.kind()
    }

    /// Buffered bytes, if the content is a buffer
    #[must_use]
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.contents {
            Contents::Buffer(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Replace the content
    pub fn set_contents(&mut self, contents: Contents) {
        self.contents = contents;
    }

    /// Consume the item, yielding its content
    #[must_use]
    pub fn into_contents(self) -> Contents {
        self.contents
    }

    /// Take the buffered bytes out, leaving the item empty
    pub(crate) fn take_buffer(&mut self) -> Option<Vec<u8>> {
        match std::mem::replace(&mut self.contents, Contents::Empty) {
            Contents::Buffer(bytes) => Some(bytes),
            other => {
                self.contents = other;
                None
            }
        }
    }
}
