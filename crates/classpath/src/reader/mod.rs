//! Per-kind readers for classpath entries.
//!
//! The kind of an entry is decided on every lookup: a directory root, or a
//! file whose magic bytes identify a ZIP archive or a JDK runtime image.
//! Readers open whatever they need for one call and close it before
//! returning; nothing is cached between requests.

mod archive;
mod directory;
mod image;

pub use archive::ArchiveReader;
pub use directory::DirectoryReader;
pub use image::ImageReader;

use crate::error::Result;
use jbridge_api::{ClasspathEntry, EntryKind};
use std::collections::HashSet;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// A class found while scanning a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundClass {
    /// Fully-qualified entry name, e.g. `pkg/One.class`
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Reads classes out of one kind of classpath entry.
pub trait EntryReader: Send + Sync {
    /// Looks up `class_name` (no `.class` suffix) under `root`.
    fn find_class(&self, root: &Path, class_name: &str) -> Result<Option<Vec<u8>>>;

    /// Collects classes directly inside `package`, skipping names in `seen`.
    ///
    /// Either the whole entry succeeds or nothing from it is returned.
    fn package_classes(
        &self,
        root: &Path,
        package: &str,
        seen: &HashSet<String>,
    ) -> Result<Vec<FoundClass>>;
}

/// Probes what `path` currently is. `Ok(None)` means "nothing searchable here".
pub fn detect_kind(path: &Path) -> Result<Option<EntryKind>> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if metadata.is_dir() {
        return Ok(Some(EntryKind::Directory));
    }
    if !metadata.is_file() {
        return Ok(None);
    }

    // Detect format via magic bytes
    let mut file = File::open(path)?;
    let mut magic = [0u8; 4];
    if file.read_exact(&mut magic).is_err() {
        return Ok(None);
    }

    let kind = match &magic {
        // ZIP magic: PK\x03\x04 or PK\x05\x06 (empty) or PK\x07\x08 (spanned)
        [0x50, 0x4B, _, _] => Some(EntryKind::Archive),
        // JImage magic: CAFEDADA (big-endian) or DADAFECA (little-endian)
        [0xCA, 0xFE, 0xDA, 0xDA] | [0xDA, 0xDA, 0xFE, 0xCA] => Some(EntryKind::RuntimeImage),
        _ => None,
    };
    Ok(kind)
}

pub fn reader_for(kind: EntryKind) -> &'static dyn EntryReader {
    match kind {
        EntryKind::Directory => &DirectoryReader,
        EntryKind::Archive => &ArchiveReader,
        EntryKind::RuntimeImage => &ImageReader,
    }
}

pub(crate) fn find_class(entry: &ClasspathEntry, class_name: &str) -> Result<Option<Vec<u8>>> {
    match detect_kind(entry.path())? {
        Some(kind) => reader_for(kind).find_class(entry.path(), class_name),
        None => Ok(None),
    }
}

pub(crate) fn package_classes(
    entry: &ClasspathEntry,
    package: &str,
    seen: &HashSet<String>,
) -> Result<Vec<FoundClass>> {
    match detect_kind(entry.path())? {
        Some(kind) => reader_for(kind).package_classes(entry.path(), package, seen),
        None => Ok(Vec::new()),
    }
}
