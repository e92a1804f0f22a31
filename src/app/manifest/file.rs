//! Manifest files with scoped lifetime
//!
//! [`ScopedManifestFile`] writes a document to a temporary file and removes
//! it when dropped, whether the caller returns normally, bails out with an
//! error or panics.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use super::document::{ManifestDocument, ManifestFormat};
use crate::errors::ManifestResult;

/// A manifest written to disk for as long as this value lives
#[derive(Debug)]
pub struct ScopedManifestFile {
    file: NamedTempFile,
}

impl ScopedManifestFile {
    /// Write `document` to a new file in the system temp directory
    pub fn write(document: &ManifestDocument, format: ManifestFormat) -> ManifestResult<Self> {
        Self::write_in(std::env::temp_dir(), document, format)
    }

    /// Write `document` to a new file inside `dir`
    pub fn write_in(
        dir: impl AsRef<Path>,
        document: &ManifestDocument,
        format: ManifestFormat,
    ) -> ManifestResult<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("containerapp-")
            .suffix(format.extension())
            .tempfile_in(dir)?;

        let text = document.render(format)?;
        file.write_all(text.as_bytes())?;
        file.flush()?;

        debug!("Wrote manifest to {}", file.path().display());
        Ok(Self { file })
    }

    /// Location of the manifest on disk
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Remove the file now, reporting any error instead of ignoring it
    pub fn close(self) -> ManifestResult<()> {
        self.file.close()?;
        Ok(())
    }
}
