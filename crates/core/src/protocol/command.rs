use std::borrow::Cow;
use std::io::{self, BufRead};

/// A decoded request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// `?` liveness probe
    Probe,
    /// `Q` end of session
    Quit,
    /// `R<class>` single class fetch
    Fetch(Cow<'a, str>),
    /// `P<package>` package fetch
    Package(Cow<'a, str>),
    /// Zero-length line
    Empty,
    /// Any other leading byte
    Unknown(u8),
}

impl<'a> Command<'a> {
    /// Decodes a line with its terminating `\n` already removed.
    pub fn parse(line: &'a [u8]) -> Self {
        let Some((&op, arg)) = line.split_first() else {
            return Command::Empty;
        };
        match op {
            b'?' => Command::Probe,
            b'Q' => Command::Quit,
            b'R' => Command::Fetch(String::from_utf8_lossy(arg)),
            b'P' => Command::Package(String::from_utf8_lossy(arg)),
            other => Command::Unknown(other),
        }
    }
}

/// Reads one request line into `buf`, without the trailing `\n`.
///
/// Returns `false` at end of input. A final line that is not terminated is
/// dropped, the same as a closed stream.
pub fn read_request<R: BufRead>(input: &mut R, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();
    input.read_until(b'\n', buf)?;
    if buf.pop() != Some(b'\n') {
        return Ok(false);
    }
    Ok(true)
}
