use super::{EntryReader, FoundClass};
use crate::error::{ClasspathError, Result};
use jbridge_api::{CLASS_SUFFIX, class_entry_name, entry_package};
use ristretto_jimage::Image;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Reads classes out of a JDK runtime image (`lib/modules`).
///
/// Resources in an image are named `/<module>/<package>/<Class>.class`; the
/// module segment is not part of the class name clients ask for.
pub struct ImageReader;

impl ImageReader {
    fn open(root: &Path) -> Result<Image> {
        Image::from_file(root).map_err(|e| ClasspathError::Image(e.to_string()))
    }
}

/// Drops the leading `/<module>` segment of an image resource name.
fn strip_module(name: &str) -> &str {
    if let Some(rest) = name.strip_prefix('/') {
        match rest.find('/') {
            Some(idx) => &rest[idx + 1..],
            None => rest,
        }
    } else {
        name
    }
}

/// True when `resource_name` is the entry for `wanted`, which may be given
/// with or without its module segment.
fn matches_class(resource_name: &str, wanted: &str) -> bool {
    strip_module(resource_name) == wanted || resource_name.strip_prefix('/') == Some(wanted)
}

impl EntryReader for ImageReader {
    fn find_class(&self, root: &Path, class_name: &str) -> Result<Option<Vec<u8>>> {
        let image = Self::open(root)?;
        let wanted = class_entry_name(class_name);

        // Since we don't know the module, we search all modules
        for resource_result in image.iter() {
            match resource_result {
                Ok(resource) if matches_class(&resource.name(), &wanted) => {
                    return Ok(Some(resource.data().to_vec()));
                }
                Ok(_) => {}
                Err(e) => debug!("Skipping unreadable resource in {}: {}", root.display(), e),
            }
        }
        Ok(None)
    }

    fn package_classes(
        &self,
        root: &Path,
        package: &str,
        seen: &HashSet<String>,
    ) -> Result<Vec<FoundClass>> {
        let image = Self::open(root)?;
        let mut found = Vec::new();

        for resource_result in image.iter() {
            let resource = match resource_result {
                Ok(resource) => resource,
                Err(e) => {
                    debug!("Skipping unreadable resource in {}: {}", root.display(), e);
                    continue;
                }
            };

            let full_name = resource.name();
            let name = strip_module(&full_name);
            if !name.ends_with(CLASS_SUFFIX) || entry_package(name) != package {
                continue;
            }
            if seen.contains(name) {
                continue;
            }
            found.push(FoundClass {
                name: name.to_string(),
                bytes: resource.data().to_vec(),
            });
        }

        Ok(found)
    }
}
