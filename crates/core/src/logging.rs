use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_DIRECTIVE: &str = "info";

/// Directory holding the rolling log files.
pub fn log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".jbridge")
        .join("logs")
}

/// `RUST_LOG` when it parses, `info` otherwise.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Installs the global subscriber writing to `<log_dir>/<component>.<date>`.
///
/// Logs never go to stdout: the class-fetch protocol owns it. Keep the
/// returned guard alive or buffered lines are lost on exit.
pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    let dir = log_dir();
    let _ = std::fs::create_dir_all(&dir);

    let appender = tracing_appender::rolling::daily(&dir, component);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(stderr_layer)
        .init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_under_home() {
        let dir = log_dir();
        assert!(dir.ends_with(".jbridge/logs"));
        if let Some(home) = dirs::home_dir() {
            assert!(dir.starts_with(home));
        }
    }

    #[test]
    fn test_env_filter_falls_back_to_info() {
        // Only meaningful when RUST_LOG is not set for the test run.
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(
                env_filter().max_level_hint(),
                Some(tracing_subscriber::filter::LevelFilter::INFO)
            );
        }
    }
}
