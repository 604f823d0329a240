use thiserror::Error;

/// The two ways a queue operation can be refused.
///
/// Neither variant leaves the queue partially modified.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// `push` on a queue already holding `capacity` entries.
    #[error("priority queue is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },

    /// `peek` or `pop` on a queue holding no entries.
    #[error("priority queue is empty")]
    EmptyQueue,
}

pub type QueueResult<T> = Result<T, QueueError>;
