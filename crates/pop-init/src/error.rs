use pop_mortality::MortalityError;
use pop_pyramid::PyramidError;
use pop_queue::QueueError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("initialization configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Pyramid(#[from] PyramidError),

    #[error(transparent)]
    Mortality(#[from] MortalityError),

    #[error("death queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("agent {agent} is scheduled to die {days} days before t = 0")]
    DeathBeforeStart {
        agent: u32,
        days:  i32,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias for `Result<T, InitError>`.
pub type InitResult<T> = Result<T, InitError>;
