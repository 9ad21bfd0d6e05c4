use super::{EntryReader, FoundClass};
use crate::error::Result;
use jbridge_api::{CLASS_SUFFIX, class_entry_name, entry_package};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;
use zip::result::ZipError;

/// Reads classes out of ZIP-format archives (jars).
pub struct ArchiveReader;

impl ArchiveReader {
    fn open(root: &Path) -> Result<ZipArchive<File>> {
        let file = File::open(root)?;
        Ok(ZipArchive::new(file)?)
    }
}

impl EntryReader for ArchiveReader {
    fn find_class(&self, root: &Path, class_name: &str) -> Result<Option<Vec<u8>>> {
        let mut archive = Self::open(root)?;
        let mut entry = match archive.by_name(&class_entry_name(class_name)) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // Declared sizes come from the archive and are not trusted for allocation.
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }

    fn package_classes(
        &self,
        root: &Path,
        package: &str,
        seen: &HashSet<String>,
    ) -> Result<Vec<FoundClass>> {
        let mut archive = Self::open(root)?;
        let mut found = Vec::new();

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }

            let name = entry.name().to_string();
            if !name.ends_with(CLASS_SUFFIX) || entry_package(&name) != package {
                continue;
            }
            if seen.contains(&name) {
                continue;
            }

            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;
            found.push(FoundClass { name, bytes });
        }

        Ok(found)
    }
}
