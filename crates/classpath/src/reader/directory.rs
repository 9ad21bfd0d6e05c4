use super::{EntryReader, FoundClass};
use crate::error::Result;
use jbridge_api::{CLASS_SUFFIX, class_entry_name, qualify};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads `.class` files laid out under a directory root.
pub struct DirectoryReader;

/// Converts a `/`-separated name to a native relative path.
///
/// Rejects segments that could leave the root (`..`, absolute names) as well as
/// empty ones, which no class name contains.
fn native_relative(name: &str) -> Option<PathBuf> {
    let mut path = PathBuf::new();
    if name.is_empty() {
        return Some(path);
    }
    for segment in name.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
            return None;
        }
        path.push(segment);
    }
    Some(path)
}

impl EntryReader for DirectoryReader {
    fn find_class(&self, root: &Path, class_name: &str) -> Result<Option<Vec<u8>>> {
        if class_name.is_empty() {
            return Ok(None);
        }
        let Some(relative) = native_relative(&class_entry_name(class_name)) else {
            return Ok(None);
        };

        match fs::read(root.join(relative)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn package_classes(
        &self,
        root: &Path,
        package: &str,
        seen: &HashSet<String>,
    ) -> Result<Vec<FoundClass>> {
        let Some(relative) = native_relative(package) else {
            return Ok(Vec::new());
        };
        let dir = root.join(relative);

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut candidates = Vec::new();
        for entry in entries {
            let entry = entry?;
            let Ok(file_name) = entry.file_name().into_string() else {
                continue;
            };
            if !file_name.ends_with(CLASS_SUFFIX) {
                continue;
            }
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = qualify(package, &file_name);
            if seen.contains(&name) {
                continue;
            }
            candidates.push((name, path));
        }
        // read_dir order is platform dependent
        candidates.sort();

        candidates
            .into_iter()
            .map(|(name, path)| {
                let bytes = fs::read(&path)?;
                Ok(FoundClass { name, bytes })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, bytes: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_native_relative() {
        assert_eq!(
            native_relative("a/b/C.class"),
            Some(Path::new("a").join("b").join("C.class"))
        );
        assert_eq!(native_relative(""), Some(PathBuf::new()));
        assert_eq!(native_relative("../etc/passwd"), None);
        assert_eq!(native_relative("/abs"), None);
        assert_eq!(native_relative("a//b"), None);
    }

    #[test]
    fn test_find_class() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a/B.class", b"0123456789");

        let reader = DirectoryReader;
        assert_eq!(
            reader.find_class(dir.path(), "a/B").unwrap(),
            Some(b"0123456789".to_vec())
        );
        assert_eq!(reader.find_class(dir.path(), "x/Y").unwrap(), None);
        assert_eq!(reader.find_class(dir.path(), "").unwrap(), None);
    }

    #[test]
    fn test_find_class_does_not_escape_root() {
        let outer = tempdir().unwrap();
        write(outer.path(), "Secret.class", b"secret");
        let root = outer.path().join("classes");
        fs::create_dir_all(&root).unwrap();

        let reader = DirectoryReader;
        assert_eq!(reader.find_class(&root, "../Secret").unwrap(), None);
    }

    #[test]
    fn test_package_classes_only_direct_children() {
        let dir = tempdir().unwrap();
        write(dir.path(), "pkg/One.class", b"one");
        write(dir.path(), "pkg/Two.class", b"two");
        write(dir.path(), "pkg/readme.txt", b"text");
        write(dir.path(), "pkg/sub/Three.class", b"three");

        let reader = DirectoryReader;
        let found = reader
            .package_classes(dir.path(), "pkg", &HashSet::new())
            .unwrap();

        let names: Vec<_> = found.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["pkg/One.class", "pkg/Two.class"]);
        assert_eq!(found[0].bytes, b"one");
    }

    #[test]
    fn test_package_classes_skips_seen() {
        let dir = tempdir().unwrap();
        write(dir.path(), "pkg/One.class", b"one");
        write(dir.path(), "pkg/Two.class", b"two");

        let seen: HashSet<String> = ["pkg/One.class".to_string()].into_iter().collect();
        let found = DirectoryReader
            .package_classes(dir.path(), "pkg", &seen)
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "pkg/Two.class");
    }

    #[test]
    fn test_missing_package_is_empty() {
        let dir = tempdir().unwrap();
        let found = DirectoryReader
            .package_classes(dir.path(), "nowhere", &HashSet::new())
            .unwrap();
        assert!(found.is_empty());
    }
}
