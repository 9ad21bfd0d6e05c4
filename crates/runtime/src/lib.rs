mod config;

pub use config::{BOOT_CLASSPATH_ENV, CLASSPATH_ENV, ClasspathConfig};

use jbridge_api::ClassSource;
use jbridge_core::callback::CallbackTable;
use jbridge_core::protocol::{ClassServer, ServerConfig};
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Process-wide bridge state, created once by [`startup`].
pub struct Runtime {
    callbacks: Arc<CallbackTable>,
}

impl Runtime {
    /// The callback table native code registers targets with.
    ///
    /// Bound to the thread that ran [`startup`].
    pub fn callbacks(&self) -> &Arc<CallbackTable> {
        &self.callbacks
    }
}

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Initializes the bridge. Must run before any fetch or callback use.
///
/// Idempotent: later calls return the runtime created by the first one, and
/// the calling thread of that first call stays the only one allowed to invoke
/// callbacks.
pub fn startup() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        info!("Bridge runtime started on {:?}", std::thread::current().id());
        Runtime {
            callbacks: Arc::new(CallbackTable::bound_to_current_thread()),
        }
    })
}

/// The runtime, if [`startup`] has run.
pub fn runtime() -> Option<&'static Runtime> {
    RUNTIME.get()
}

/// Assembles a class server over the classpath `config` describes.
///
/// Does not call [`startup`]; the caller decides which thread owns callbacks.
pub fn build_default_server(config: &ClasspathConfig, server_config: ServerConfig) -> ClassServer {
    let index = config.build_index();
    info!("Serving classes from {} classpath entries", index.len());

    let source: Arc<dyn ClassSource> = Arc::new(index);
    ClassServer::new(source).with_config(server_config)
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(jbridge_core::logging::init_logging(component, to_stderr))
}
