// Slot lifecycle: Empty -> Leaf on the first occupant, Leaf -> Branch at the
// split threshold, back to Empty when the count drains. Slots are reset in
// place, never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SlotStatus {
    #[default]
    Empty = 0,
    Branch = 1,
    Leaf = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuadNode {
    pub status: SlotStatus,
    pub count: u16,
    pub key: u16,
}

// The (depth, quadrant) pair stays a struct everywhere except the u16 stored
// in the node record and used to key the bounds table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub depth: u8,
    pub quadrant: u8,
}

impl CellKey {
    pub fn new(depth: u8, quadrant: u8) -> Self {
        Self { depth, quadrant }
    }

    // Quadrant in the low byte, depth in the high byte.
    pub fn pack(self) -> u16 {
        self.quadrant as u16 | (self.depth as u16) << 8
    }

    pub fn unpack(key: u16) -> Self {
        Self {
            depth: (key >> 8) as u8,
            quadrant: (key & 0xff) as u8,
        }
    }
}
