use crate::reader::{self, FoundClass};
use indexmap::IndexSet;
use jbridge_api::{
    ClassSource, ClasspathEntry, EntryKind, FetchResult, PATH_SEPARATOR, PackageClasses,
};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Ordered, deduplicated classpath.
///
/// Entries keep first-seen order; lookups walk them backwards so the entry
/// added last has the highest priority.
#[derive(Debug, Clone, Default)]
pub struct ClasspathIndex {
    entries: IndexSet<ClasspathEntry>,
}

impl ClasspathIndex {
    /// Builds an index from search-path strings, earliest (lowest priority) first.
    pub fn build<I, S>(search_paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        for search_path in search_paths {
            index.add_search_path(search_path.as_ref());
        }
        index
    }

    fn add_search_path(&mut self, search_path: &str) {
        // A trailing separator does not introduce an empty element
        for element in search_path.split_terminator(PATH_SEPARATOR) {
            self.entries.insert(ClasspathEntry::new(element));
        }
    }

    /// Entries in construction order.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &ClasspathEntry> {
        self.entries.iter()
    }

    /// Entries in lookup order, highest priority first.
    pub fn search_order(&self) -> impl Iterator<Item = &ClasspathEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Probes the current kind of `entry`, treating probe failures as absent.
    pub fn entry_kind(entry: &ClasspathEntry) -> Option<EntryKind> {
        reader::detect_kind(entry.path()).ok().flatten()
    }
}

impl ClassSource for ClasspathIndex {
    fn find_class(&self, class_name: &str) -> FetchResult {
        for entry in self.search_order() {
            match reader::find_class(entry, class_name) {
                Ok(Some(bytes)) => {
                    debug!("Found {} in {} ({} bytes)", class_name, entry, bytes.len());
                    return FetchResult::Found(bytes);
                }
                Ok(None) => {}
                Err(e) => debug!("Skipping {} while looking up {}: {}", entry, class_name, e),
            }
        }
        FetchResult::NotFound
    }

    fn package_classes<'a>(&'a self, package: &'a str) -> PackageClasses<'a> {
        Box::new(PackageScan::new(self.search_order(), package))
    }
}

/// Lazy package scan over the entries in lookup order.
///
/// Each entry is read as a unit when the previous one is exhausted. The
/// seen-set is owned by the scan and dies with it.
struct PackageScan<'a, I> {
    entries: I,
    package: &'a str,
    seen: HashSet<String>,
    pending: VecDeque<Vec<u8>>,
}

impl<'a, I> PackageScan<'a, I>
where
    I: Iterator<Item = &'a ClasspathEntry>,
{
    fn new(entries: I, package: &'a str) -> Self {
        Self {
            entries,
            package,
            seen: HashSet::new(),
            pending: VecDeque::new(),
        }
    }

    fn accept(&mut self, found: Vec<FoundClass>) {
        for class in found {
            if self.seen.insert(class.name) {
                self.pending.push_back(class.bytes);
            }
        }
    }
}

impl<'a, I> Iterator for PackageScan<'a, I>
where
    I: Iterator<Item = &'a ClasspathEntry>,
{
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        loop {
            if let Some(bytes) = self.pending.pop_front() {
                return Some(bytes);
            }

            let entry = self.entries.next()?;
            match reader::package_classes(entry, self.package, &self.seen) {
                Ok(found) => {
                    if !found.is_empty() {
                        debug!("{} classes of {} in {}", found.len(), self.package, entry);
                    }
                    self.accept(found);
                }
                Err(e) => debug!("Skipping {} while scanning {}: {}", entry, self.package, e),
            }
        }
    }
}
