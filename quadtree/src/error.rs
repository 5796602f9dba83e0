use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadtreeError {
    CapacityExceeded { required: usize, capacity: usize },
}

pub type QuadtreeResult<T> = Result<T, QuadtreeError>;

impl fmt::Display for QuadtreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuadtreeError::CapacityExceeded { required, capacity } => {
                write!(
                    f,
                    "node array too small for descent (required: {}, capacity: {})",
                    required, capacity
                )
            }
        }
    }
}

impl std::error::Error for QuadtreeError {}
