use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Separator between elements of a search-path string.
#[cfg(windows)]
pub const PATH_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const PATH_SEPARATOR: char = ':';

/// Suffix of compiled class entries, both on disk and inside archives.
pub const CLASS_SUFFIX: &str = ".class";

/// One searchable location on the classpath.
///
/// Equality is exact string equality of the path as it was written in the
/// search path; `lib/a.jar` and `./lib/a.jar` are different entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClasspathEntry {
    path: String,
}

impl ClasspathEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn path(&self) -> &Path {
        Path::new(&self.path)
    }
}

impl fmt::Display for ClasspathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// What a classpath entry turned out to be when it was probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    /// A directory root holding `pkg/Name.class` files
    Directory,
    /// A ZIP-format archive (jar)
    Archive,
    /// A JDK runtime image (`lib/modules`)
    RuntimeImage,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Directory => "directory",
            EntryKind::Archive => "archive",
            EntryKind::RuntimeImage => "runtime-image",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single class lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Found(Vec<u8>),
    NotFound,
}

impl FetchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, FetchResult::Found(_))
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            FetchResult::Found(bytes) => Some(bytes),
            FetchResult::NotFound => None,
        }
    }
}

impl From<Option<Vec<u8>>> for FetchResult {
    fn from(bytes: Option<Vec<u8>>) -> Self {
        match bytes {
            Some(bytes) => FetchResult::Found(bytes),
            None => FetchResult::NotFound,
        }
    }
}

/// Entry name of a class inside a classpath root: `a/b/C` -> `a/b/C.class`.
pub fn class_entry_name(class_name: &str) -> String {
    format!("{class_name}{CLASS_SUFFIX}")
}

/// Package part of an entry name, i.e. everything before the last `/`.
///
/// Entries at the root of an archive belong to the unnamed package `""`.
pub fn entry_package(entry_name: &str) -> &str {
    entry_name.rsplit_once('/').map(|(pkg, _)| pkg).unwrap_or("")
}

/// Fully-qualified entry name of `file_name` inside `package`.
pub fn qualify(package: &str, file_name: &str) -> String {
    if package.is_empty() {
        file_name.to_string()
    } else {
        format!("{package}/{file_name}")
    }
}
