mod jdk;

pub use jdk::{JdkDiscoverer, JdkRuntime};
