use jbridge_classpath::{ClasspathIndex, JdkDiscoverer};
use tracing::{debug, info, warn};

/// Environment variable overriding the discovered boot search path.
pub const BOOT_CLASSPATH_ENV: &str = "JBRIDGE_BOOT_CLASSPATH";
/// Environment variable holding the application search path.
pub const CLASSPATH_ENV: &str = "CLASSPATH";

/// Where the class server looks for classes.
///
/// Boot entries are added before application entries, so on a name clash
/// the application copy is served.
#[derive(Debug, Clone, Default)]
pub struct ClasspathConfig {
    boot: Option<String>,
    application: Option<String>,
    discover_jdk: bool,
}

impl ClasspathConfig {
    /// Empty configuration; nothing is discovered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration read from `JBRIDGE_BOOT_CLASSPATH` and `CLASSPATH`, with
    /// JDK discovery as the boot fallback.
    pub fn from_env() -> Self {
        Self {
            boot: std::env::var(BOOT_CLASSPATH_ENV).ok(),
            application: std::env::var(CLASSPATH_ENV).ok(),
            discover_jdk: true,
        }
    }

    /// Overrides the boot path when `boot` is set.
    pub fn with_boot(mut self, boot: Option<String>) -> Self {
        if boot.is_some() {
            self.boot = boot;
        }
        self
    }

    /// Overrides the application path when `application` is set.
    pub fn with_application(mut self, application: Option<String>) -> Self {
        if application.is_some() {
            self.application = application;
        }
        self
    }

    pub fn with_jdk_discovery(mut self, enabled: bool) -> Self {
        self.discover_jdk = enabled;
        self
    }

    pub fn application(&self) -> Option<&str> {
        self.application.as_deref()
    }

    /// The boot path: configured, else the discovered JDK's class asset.
    pub fn resolve_boot(&self) -> Option<String> {
        self.resolve_boot_with(&JdkDiscoverer::new())
    }

    pub fn resolve_boot_with(&self, discoverer: &JdkDiscoverer) -> Option<String> {
        if let Some(boot) = &self.boot {
            return Some(boot.clone());
        }
        if !self.discover_jdk {
            return None;
        }

        match discoverer.discover() {
            Some(runtime) => {
                info!(
                    "Using JDK at {} (version: {})",
                    runtime.root.display(),
                    runtime.version.as_deref().unwrap_or("unknown")
                );
                Some(runtime.boot_classpath())
            }
            None => {
                warn!("No JDK found; boot classpath is empty");
                None
            }
        }
    }

    pub fn build_index(&self) -> ClasspathIndex {
        self.build_index_with(&JdkDiscoverer::new())
    }

    /// Builds the index from the boot path followed by the application path.
    pub fn build_index_with(&self, discoverer: &JdkDiscoverer) -> ClasspathIndex {
        let search_paths: Vec<String> = self
            .resolve_boot_with(discoverer)
            .into_iter()
            .chain(self.application.clone())
            .collect();

        let index = ClasspathIndex::build(&search_paths);
        debug!("Classpath index has {} entries", index.len());
        index
    }
}
