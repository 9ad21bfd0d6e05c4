pub mod callback;
pub mod error;
pub mod logging;
pub mod protocol;

pub use error::{BridgeError, Result};
