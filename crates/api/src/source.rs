//! Class source abstraction used by the class-fetch server.

use crate::models::FetchResult;

/// Lazy stream of class payloads for one package request.
///
/// Whatever deduplication state the source keeps for the request lives inside
/// the iterator and is gone once it is dropped.
pub type PackageClasses<'a> = Box<dyn Iterator<Item = Vec<u8>> + 'a>;

/// Something that can hand out compiled classes by their `/`-separated name.
pub trait ClassSource: Send + Sync {
    /// Returns the bytes of `class_name` (without the `.class` suffix).
    fn find_class(&self, class_name: &str) -> FetchResult;

    /// Streams every class located directly in `package`, each name at most once.
    fn package_classes<'a>(&'a self, package: &'a str) -> PackageClasses<'a>;
}
