use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("push of {requested} bytes exceeds remaining capacity of {remaining}")]
    CapacityExceeded { requested: usize, remaining: usize },
    #[error("stream is closed to further writes")]
    Closed,
}
