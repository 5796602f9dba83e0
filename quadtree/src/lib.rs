pub mod error;
pub mod loose;
pub mod quadtree;

pub use error::{QuadtreeError, QuadtreeResult};
