use super::command::{Command, read_request};
use super::framing::{Framing, STATUS_END, STATUS_OK};
use crate::error::{BridgeError, Result};
use jbridge_api::{ClassSource, FetchResult};
use std::io::{self, BufRead, BufWriter, Write};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub framing: Framing,
    /// Fail on unknown command bytes instead of skipping the line.
    pub strict: bool,
}

/// Counters for one serving session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServeStats {
    /// Lines read, including ignored ones
    pub requests: usize,
    /// Class payloads written
    pub classes_sent: usize,
    /// `R` requests answered with `0`
    pub misses: usize,
    /// Empty lines and unknown commands skipped
    pub ignored: usize,
}

enum Flow {
    Continue,
    Quit,
}

/// Serves classes from a [`ClassSource`] over a request/response byte stream.
///
/// One request is read, fully answered and flushed before the next one is
/// read. The loop ends on `Q` or end of input.
pub struct ClassServer {
    source: Arc<dyn ClassSource>,
    config: ServerConfig,
}

impl ClassServer {
    pub fn new(source: Arc<dyn ClassSource>) -> Self {
        Self {
            source,
            config: ServerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Runs the protocol on the process's stdin/stdout.
    pub fn serve_stdio(&self) -> Result<ServeStats> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), BufWriter::new(stdout.lock()))
    }

    pub fn serve<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<ServeStats> {
        info!(
            "Class server started (framing: {}, strict: {})",
            self.config.framing, self.config.strict
        );

        let mut stats = ServeStats::default();
        let mut line = Vec::new();

        loop {
            if !read_request(&mut input, &mut line)? {
                debug!("Input closed");
                break;
            }
            stats.requests += 1;

            match self.handle(&line, &mut output, &mut stats)? {
                Flow::Continue => output.flush()?,
                Flow::Quit => break,
            }
        }
        output.flush()?;

        info!(
            "Class server stopped: {} requests, {} classes sent, {} misses, {} ignored",
            stats.requests, stats.classes_sent, stats.misses, stats.ignored
        );
        Ok(stats)
    }

    fn handle<W: Write>(&self, line: &[u8], out: &mut W, stats: &mut ServeStats) -> Result<Flow> {
        match Command::parse(line) {
            Command::Probe => {
                self.config.framing.write_status(out, STATUS_OK)?;
            }
            Command::Quit => {
                debug!("Quit requested");
                return Ok(Flow::Quit);
            }
            Command::Fetch(class_name) => self.fetch_class(&class_name, out, stats)?,
            Command::Package(package) => self.fetch_package(&package, out, stats)?,
            Command::Empty => {
                stats.ignored += 1;
            }
            Command::Unknown(op) => {
                if self.config.strict {
                    warn!("Rejecting unknown command byte 0x{:02x}", op);
                    return Err(BridgeError::MalformedRequest(format!(
                        "unknown command byte 0x{op:02x}"
                    )));
                }
                debug!("Ignoring unknown command byte 0x{:02x}", op);
                stats.ignored += 1;
            }
        }
        Ok(Flow::Continue)
    }

    fn fetch_class<W: Write>(
        &self,
        class_name: &str,
        out: &mut W,
        stats: &mut ServeStats,
    ) -> Result<()> {
        match self.source.find_class(class_name) {
            FetchResult::Found(bytes) => {
                self.config.framing.write_class(out, &bytes)?;
                stats.classes_sent += 1;
            }
            FetchResult::NotFound => {
                debug!("Class {} not found", class_name);
                self.config.framing.write_status(out, STATUS_END)?;
                stats.misses += 1;
            }
        }
        Ok(())
    }

    fn fetch_package<W: Write>(
        &self,
        package: &str,
        out: &mut W,
        stats: &mut ServeStats,
    ) -> Result<()> {
        let mut sent = 0;
        for bytes in self.source.package_classes(package) {
            self.config.framing.write_class(out, &bytes)?;
            sent += 1;
        }
        self.config.framing.write_status(out, STATUS_END)?;

        debug!("Package {}: {} classes", package, sent);
        stats.classes_sent += sent;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jbridge_api::PackageClasses;
    use std::collections::HashMap;
    use std::io::Cursor;

    /// In-memory source keyed by class name.
    struct MapSource {
        classes: HashMap<String, Vec<u8>>,
    }

    impl MapSource {
        fn new(classes: &[(&str, &[u8])]) -> Arc<Self> {
            Arc::new(Self {
                classes: classes
                    .iter()
                    .map(|(name, bytes)| (name.to_string(), bytes.to_vec()))
                    .collect(),
            })
        }
    }

    impl ClassSource for MapSource {
        fn find_class(&self, class_name: &str) -> FetchResult {
            self.classes.get(class_name).cloned().into()
        }

        fn package_classes<'a>(&'a self, package: &'a str) -> PackageClasses<'a> {
            let mut names: Vec<_> = self
                .classes
                .keys()
                .filter(|name| jbridge_api::entry_package(name) == package)
                .collect();
            names.sort();
            Box::new(names.into_iter().map(|name| self.classes[name].clone()))
        }
    }

    fn run(server: &ClassServer, input: &[u8]) -> (Vec<u8>, ServeStats) {
        let mut out = Vec::new();
        let stats = server.serve(Cursor::new(input.to_vec()), &mut out).unwrap();
        (out, stats)
    }

    #[test]
    fn test_probe_and_quit() {
        let server = ClassServer::new(MapSource::new(&[]));
        let (out, stats) = run(&server, b"?\n?\nQ\n?\n");
        assert_eq!(out, vec![STATUS_OK, STATUS_OK]);
        assert_eq!(stats.requests, 3);
    }

    #[test]
    fn test_fetch_found_and_missing() {
        let server = ClassServer::new(MapSource::new(&[("a/B", b"0123456789")]));
        let (out, stats) = run(&server, b"Ra/B\nRx/Y\n");

        let mut expected = vec![STATUS_OK];
        expected.extend_from_slice(b"0123456789");
        expected.push(STATUS_END);
        assert_eq!(out, expected);
        assert_eq!(stats.classes_sent, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_package_terminated_by_end() {
        let server = ClassServer::new(MapSource::new(&[
            ("pkg/One", b"one"),
            ("pkg/Two", b"two"),
            ("pkg/sub/Three", b"three"),
        ]));
        let (out, _) = run(&server, b"Ppkg\nPnothing\n");

        let mut expected = vec![STATUS_OK];
        expected.extend_from_slice(b"one");
        expected.push(STATUS_OK);
        expected.extend_from_slice(b"two");
        expected.push(STATUS_END);
        expected.push(STATUS_END);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_empty_and_unknown_lines_are_ignored() {
        let server = ClassServer::new(MapSource::new(&[]));
        let (out, stats) = run(&server, b"\nZzz\n?\n");
        assert_eq!(out, vec![STATUS_OK]);
        assert_eq!(stats.ignored, 2);
    }

    #[test]
    fn test_strict_mode_rejects_unknown_command() {
        let server = ClassServer::new(MapSource::new(&[])).with_config(ServerConfig {
            strict: true,
            ..Default::default()
        });

        let mut out = Vec::new();
        let result = server.serve(Cursor::new(b"?\n\nZ\n?\n".to_vec()), &mut out);

        assert!(matches!(result, Err(BridgeError::MalformedRequest(_))));
        assert_eq!(out, vec![STATUS_OK]);
    }

    #[test]
    fn test_length_prefixed_framing() {
        let server = ClassServer::new(MapSource::new(&[("a/B", b"xyz")])).with_config(
            ServerConfig {
                framing: Framing::LengthPrefixed,
                ..Default::default()
            },
        );
        let (out, _) = run(&server, b"Ra/B\n?\n");
        assert_eq!(out, vec![STATUS_OK, 0, 0, 0, 3, b'x', b'y', b'z', STATUS_OK]);
    }

    #[test]
    fn test_eof_without_quit() {
        let server = ClassServer::new(MapSource::new(&[("a/B", b"b")]));
        let (out, stats) = run(&server, b"?\nRa/B");
        assert_eq!(out, vec![STATUS_OK]);
        assert_eq!(stats.requests, 1);
    }
}
