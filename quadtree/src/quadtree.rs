mod bounds;
mod config;
mod core;
mod node;
mod query;

pub use self::config::{capacity_for_depth, Config};
pub use self::core::QuadTree;
pub use self::node::{CellKey, QuadNode, SlotStatus};

use crate::error::{QuadtreeError, QuadtreeResult};
use common::shapes::{Aabb, Circle};
use fxhash::FxHashMap;
use glam::Vec2;
