//! Access to the two raw documents of a report template archive.
//!
//! An archive is either a `.pbit` zip container or a directory the archive
//! was already extracted into. Both expose the schema document at
//! [`SCHEMA_DOCUMENT`] and the layout document at [`LAYOUT_DOCUMENT`].

use crate::checksum::compute_checksum;
use crate::error::{CoreError, CoreResult};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Archive path of the data-model schema document
pub const SCHEMA_DOCUMENT: &str = "DataModelSchema";

/// Archive path of the report layout document
pub const LAYOUT_DOCUMENT: &str = "Report/Layout";

/// Largest document that will be read into memory
pub const MAX_DOCUMENT_BYTES: u64 = 512 * 1024 * 1024;

/// Undecoded bytes of the schema and layout documents
#[derive(Debug, Clone)]
pub struct RawDocuments {
    pub schema: Vec<u8>,
    pub layout: Vec<u8>,
}

impl RawDocuments {
    /// SHA-256 of the schema document
    pub fn schema_checksum(&self) -> String {
        compute_checksum(&self.schema)
    }

    /// SHA-256 of the layout document
    pub fn layout_checksum(&self) -> String {
        compute_checksum(&self.layout)
    }
}

/// Where the archive documents are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveSource {
    /// A zip container such as a `.pbit` file
    Zip(PathBuf),
    /// A directory holding the extracted archive
    Directory(PathBuf),
}

impl ArchiveSource {
    /// Classify `path` as a directory or a zip file.
    pub fn open(path: &Path) -> CoreResult<Self> {
        if path.is_dir() {
            Ok(ArchiveSource::Directory(path.to_path_buf()))
        } else if path.is_file() {
            Ok(ArchiveSource::Zip(path.to_path_buf()))
        } else {
            Err(CoreError::ArchiveNotFound {
                path: path.display().to_string(),
            })
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ArchiveSource::Zip(p) | ArchiveSource::Directory(p) => p,
        }
    }

    /// Read both documents. A missing document is fatal.
    pub fn read_documents(&self) -> CoreResult<RawDocuments> {
        match self {
            ArchiveSource::Directory(dir) => Ok(RawDocuments {
                schema: read_from_dir(dir, SCHEMA_DOCUMENT)?,
                layout: read_from_dir(dir, LAYOUT_DOCUMENT)?,
            }),
            ArchiveSource::Zip(path) => {
                let mut archive = open_zip(path)?;
                Ok(RawDocuments {
                    schema: read_from_zip(&mut archive, path, SCHEMA_DOCUMENT)?,
                    layout: read_from_zip(&mut archive, path, LAYOUT_DOCUMENT)?,
                })
            }
        }
    }
}

fn read_from_dir(dir: &Path, document: &str) -> CoreResult<Vec<u8>> {
    let path = document
        .split('/')
        .fold(dir.to_path_buf(), |acc, part| acc.join(part));
    if !path.is_file() {
        return Err(CoreError::DocumentMissing {
            archive: dir.display().to_string(),
            document: document.to_string(),
        });
    }

    let size = std::fs::metadata(&path)
        .map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?
        .len();
    check_size(document, size)?;

    std::fs::read(&path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })
}

fn open_zip(path: &Path) -> CoreResult<ZipArchive<File>> {
    let file = File::open(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    ZipArchive::new(file).map_err(|e| CoreError::ArchiveOpen {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Find an entry by name, tolerating `\` separators and case differences.
fn find_entry(archive: &ZipArchive<File>, document: &str) -> Option<String> {
    archive
        .file_names()
        .find(|name| name.replace('\\', "/").eq_ignore_ascii_case(document))
        .map(str::to_string)
}

fn read_from_zip(
    archive: &mut ZipArchive<File>,
    path: &Path,
    document: &str,
) -> CoreResult<Vec<u8>> {
    let missing = || CoreError::DocumentMissing {
        archive: path.display().to_string(),
        document: document.to_string(),
    };
    let entry_name = find_entry(archive, document).ok_or_else(missing)?;

    let mut entry = archive
        .by_name(&entry_name)
        .map_err(|e| CoreError::ArchiveOpen {
            path: path.display().to_string(),
            message: format!("failed to read entry '{}': {}", entry_name, e),
        })?;
    check_size(document, entry.size())?;

    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn check_size(document: &str, size: u64) -> CoreResult<()> {
    if size > MAX_DOCUMENT_BYTES {
        return Err(CoreError::DocumentTooLarge {
            document: document.to_string(),
            size,
            limit: MAX_DOCUMENT_BYTES,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "archive_test.rs"]
mod tests;
