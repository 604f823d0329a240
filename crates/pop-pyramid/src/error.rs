use thiserror::Error;

#[derive(Debug, Error)]
pub enum PyramidError {
    #[error("pyramid parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pyramid has no age bins")]
    Empty,

    #[error("age bin {index} starts at year {found}, expected year {expected}")]
    NonContiguous {
        index:    usize,
        expected: u32,
        found:    u32,
    },

    #[error("distribution weights sum to zero")]
    ZeroTotal,

    #[error("distribution weights overflow u64")]
    WeightOverflow,
}

pub type PyramidResult<T> = Result<T, PyramidError>;
