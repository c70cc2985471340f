use thiserror::Error;

/// Errors raised at the I/O edges (fixtures, persistence, terminal).
///
/// The switching core never returns these; it degrades to no-ops instead.
#[derive(Error, Debug)]
pub enum SwitchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory error: {0}")]
    Directory(String),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

pub type Result<T> = std::result::Result<T, SwitchError>;
