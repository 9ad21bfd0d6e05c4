use jbridge_core::protocol::{Framing, ServerConfig};
use jbridge_runtime::ClasspathConfig;
use tracing::info;

pub fn run(
    config: ClasspathConfig,
    framing: Framing,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    jbridge_runtime::startup();
    let server = jbridge_runtime::build_default_server(&config, ServerConfig { framing, strict });

    let stats = server.serve_stdio()?;
    info!(
        "Session finished after {} requests ({} classes sent)",
        stats.requests, stats.classes_sent
    );
    Ok(())
}
