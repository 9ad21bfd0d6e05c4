use thiserror::Error;

/// Failure while probing a single classpath entry.
///
/// These never reach the protocol peer: the index logs them and moves on to
/// the next entry.
#[derive(Error, Debug)]
pub enum ClasspathError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("Runtime image error: {0}")]
    Image(String),
}

pub type Result<T> = std::result::Result<T, ClasspathError>;
