use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

/// Status byte preceding a payload, also the `?` reply.
pub const STATUS_OK: u8 = 1;
/// Status byte for "not found" and for the end of a package listing.
pub const STATUS_END: u8 = 0;

/// How class payloads are delimited on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// Status byte then raw bytes; the receiver learns the length out of band.
    #[default]
    Raw,
    /// Status byte, big-endian `u32` length, then the bytes.
    LengthPrefixed,
}

impl Framing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framing::Raw => "raw",
            Framing::LengthPrefixed => "length-prefixed",
        }
    }

    /// Writes one found class. Nothing is written when the payload cannot be
    /// framed.
    pub fn write_class<W: Write>(&self, out: &mut W, bytes: &[u8]) -> io::Result<()> {
        let prefix = self.length_prefix(bytes.len())?;
        out.write_all(&[STATUS_OK])?;
        if let Some(prefix) = prefix {
            out.write_all(&prefix)?;
        }
        out.write_all(bytes)
    }

    fn length_prefix(&self, len: usize) -> io::Result<Option<[u8; 4]>> {
        match self {
            Framing::Raw => Ok(None),
            Framing::LengthPrefixed => u32::try_from(len)
                .map(|len| Some(len.to_be_bytes()))
                .map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidInput, "class payload exceeds u32 length")
                }),
        }
    }

    pub fn write_status<W: Write>(&self, out: &mut W, status: u8) -> io::Result<()> {
        out.write_all(&[status])
    }
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Framing::Raw),
            "length-prefixed" => Ok(Framing::LengthPrefixed),
            other => Err(format!("unknown framing `{other}`")),
        }
    }
}
