//! Line-oriented class-fetch protocol.
//!
//! Each request is one `\n`-terminated line whose first byte selects the
//! operation:
//!
//! | Command     | Response                              |
//! |-------------|---------------------------------------|
//! | `?`         | `1`                                   |
//! | `Q`         | nothing, the loop ends                |
//! | `R<class>`  | `1` + class bytes, or `0`             |
//! | `P<package>`| (`1` + class bytes)*, then `0`        |
//!
//! Class payloads carry no length unless [`Framing::LengthPrefixed`] is
//! selected.

pub mod command;
pub mod framing;
mod server;

pub use command::Command;
pub use framing::{Framing, STATUS_END, STATUS_OK};
pub use server::{ClassServer, ServeStats, ServerConfig};
