use thiserror::Error;

#[derive(Debug, Error)]
pub enum MortalityError {
    #[error("life table parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid survival curve: {0}")]
    InvalidTable(String),
}

pub type MortalityResult<T> = Result<T, MortalityError>;
