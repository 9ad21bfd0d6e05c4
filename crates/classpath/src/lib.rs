//! Classpath resolution and class lookup.
//!
//! A [`ClasspathIndex`] is built once from the boot and application search
//! paths and then only read. Each lookup probes entries from the last one
//! added to the first, so later search paths override earlier ones.

pub mod discoverer;
pub mod error;
pub mod index;
pub mod reader;

pub use discoverer::{JdkDiscoverer, JdkRuntime};
pub use error::{ClasspathError, Result};
pub use index::ClasspathIndex;
pub use reader::{FoundClass, detect_kind};
