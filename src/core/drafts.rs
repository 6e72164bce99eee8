//! Draft attachments: files staged in the composer before a message is
//! sent.
//!
//! Each draft owns a preview handle backed by a temporary file. The handle
//! must be released exactly once: explicitly when the draft is discarded,
//! or by the drop guard when the composer is torn down, whichever happens
//! first. Promoting a draft into a sent message transfers the handle to
//! the message's attachment instead.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::message::{Attachment, AttachmentKind};

/// Errors from staging or releasing draft attachments.
#[derive(Debug)]
pub enum DraftError {
    /// Failed to read the source file or write the preview copy.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The preview handle was already released; a second release is a
    /// lifecycle bug in the caller.
    AlreadyReleased,
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftError::Io { path, source } => {
                write!(f, "Failed to stage attachment {}: {}", path.display(), source)
            }
            DraftError::AlreadyReleased => {
                write!(f, "Attachment preview was already released")
            }
        }
    }
}

impl StdError for DraftError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            DraftError::Io { source, .. } => Some(source),
            DraftError::AlreadyReleased => None,
        }
    }
}

/// A temporary preview file with release-exactly-once semantics.
///
/// Dropping an unreleased handle releases it; calling [`release`] after the
/// handle is gone reports [`DraftError::AlreadyReleased`].
///
/// [`release`]: PreviewHandle::release
#[derive(Debug)]
pub struct PreviewHandle {
    file: Option<NamedTempFile>,
}

impl PreviewHandle {
    /// Stage a preview copy of `source` in a temp file.
    pub fn stage(source: &Path) -> Result<Self, DraftError> {
        let mut file = NamedTempFile::new().map_err(|source_err| DraftError::Io {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        let bytes = fs::read(source).map_err(|source_err| DraftError::Io {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        file.write_all(&bytes).map_err(|source_err| DraftError::Io {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        Ok(Self { file: Some(file) })
    }

    /// Build a preview directly from bytes (clipboard pastes, tests).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DraftError> {
        let mut file = NamedTempFile::new().map_err(|source| DraftError::Io {
            path: PathBuf::from("<bytes>"),
            source,
        })?;
        file.write_all(bytes).map_err(|source| DraftError::Io {
            path: PathBuf::from("<bytes>"),
            source,
        })?;
        Ok(Self { file: Some(file) })
    }

    /// Path of the preview file while the handle is live.
    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(|f| f.path())
    }

    pub fn is_released(&self) -> bool {
        self.file.is_none()
    }

    /// Release the preview file. Exactly one release is allowed.
    pub fn release(&mut self) -> Result<(), DraftError> {
        match self.file.take() {
            Some(file) => {
                debug!(path = %file.path().display(), "releasing attachment preview");
                drop(file);
                Ok(())
            }
            None => Err(DraftError::AlreadyReleased),
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            debug!(path = %file.path().display(), "preview released by drop guard");
        }
    }
}

/// A file staged in the composer but not yet attached to a sent message.
#[derive(Debug)]
pub struct DraftAttachment {
    pub kind: AttachmentKind,
    pub name: String,
    pub size: u64,
    pub mime: String,
    pub preview: PreviewHandle,
}

impl DraftAttachment {
    /// Stage `path` as a draft, copying it into a preview file.
    pub fn stage_file(path: &Path) -> Result<Self, DraftError> {
        let metadata = fs::metadata(path).map_err(|source| DraftError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime = guess_mime(path);
        let preview = PreviewHandle::stage(path)?;
        Ok(Self {
            kind: AttachmentKind::from_mime(&mime),
            name,
            size: metadata.len(),
            mime,
            preview,
        })
    }

    /// Discard the draft, releasing its preview now rather than at drop.
    pub fn discard(mut self) -> Result<(), DraftError> {
        self.preview.release()
    }

    /// Promote the draft into a sent-message attachment, transferring the
    /// preview handle.
    pub fn into_attachment(self) -> Attachment {
        Attachment {
            kind: self.kind,
            name: self.name,
            size: self.size,
            mime: self.mime,
            preview: self.preview,
        }
    }
}

/// Minimal extension-based MIME sniffing; only the image/file split
/// matters for previews.
fn guess_mime(path: &Path) -> String {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" | "md" | "log" => "text/plain",
        _ => "application/octet-stream",
    }
    .to_string()
}
