use super::*;

pub struct QuadTree {
    pub(crate) nodes: Vec<QuadNode>,
    pub(crate) bounds: FxHashMap<u16, Aabb>,
    pub(crate) index: FxHashMap<u32, usize>,
    pub(crate) world_size: Vec2,
    pub(crate) depth_limit: u8,
    pub(crate) split_threshold: u16,
}

impl QuadTree {
    pub fn new(capacity: usize, world_size: Vec2, depth_limit: u8) -> Self {
        Self::new_with_config(
            world_size,
            Config {
                capacity,
                depth_limit,
                ..Config::default()
            },
        )
    }

    pub fn new_with_config(world_size: Vec2, config: Config) -> Self {
        assert!(
            world_size.is_finite() && world_size.x > 0.0 && world_size.y > 0.0,
            "world size must be finite and positive: {:?}",
            world_size
        );
        let depth_limit = config.depth_limit.clamp(1, 7);
        // The four root cells must always fit.
        let capacity = config.capacity.max(4);
        QuadTree {
            nodes: vec![QuadNode::default(); capacity],
            bounds: bounds::build_bounds_table(world_size, depth_limit),
            index: FxHashMap::default(),
            world_size,
            depth_limit,
            split_threshold: config.split_threshold.max(1),
        }
    }

    // Walks down from the root group, testing the point against the four
    // precomputed cells per depth. A point outside every cell at some level
    // is dropped without error.
    pub fn insert(&mut self, point: Vec2, id: u32) -> QuadtreeResult<()> {
        if self.index.contains_key(&id) {
            self.remove(id);
        }
        let mut offset = 0usize;
        let mut depth = 0u8;
        loop {
            let quadrant = match self.locate(point, depth) {
                Some(quadrant) => quadrant,
                None => return Ok(()),
            };
            let slot = offset + quadrant as usize;
            let key = CellKey::new(depth, quadrant).pack();
            match self.nodes[slot].status {
                SlotStatus::Empty => {
                    let node = &mut self.nodes[slot];
                    node.status = SlotStatus::Leaf;
                    node.count = 1;
                    node.key = key;
                    self.index.insert(id, slot);
                    return Ok(());
                }
                SlotStatus::Leaf => {
                    if self.nodes[slot].count >= self.split_threshold
                        && depth + 1 < self.depth_limit
                    {
                        // Full leaf converts in place; its occupants keep the
                        // slot and only the incoming insert descends.
                        offset = self.child_base(slot)?;
                        depth += 1;
                        self.nodes[slot].status = SlotStatus::Branch;
                        continue;
                    }
                    let node = &mut self.nodes[slot];
                    node.count += 1;
                    node.key = key;
                    self.index.insert(id, slot);
                    return Ok(());
                }
                SlotStatus::Branch => {
                    offset = self.child_base(slot)?;
                    depth += 1;
                }
            }
        }
    }

    pub fn remove(&mut self, id: u32) {
        let slot = match self.index.remove(&id) {
            Some(slot) => slot,
            None => return,
        };
        let node = &mut self.nodes[slot];
        node.count -= 1;
        if node.count == 0 {
            node.status = SlotStatus::Empty;
            node.key = 0;
        }
    }

    // Per-frame relocation: ids whose point is still inside the cell named by
    // their stored key are left alone, everything else is removed and
    // re-inserted from the root.
    pub fn refresh(&mut self, points: &[Vec2], ids: &[u32]) -> QuadtreeResult<()> {
        for (&point, &id) in points.iter().zip(ids) {
            let slot = match self.index.get(&id) {
                Some(&slot) => slot,
                None => continue,
            };
            let key = self.nodes[slot].key;
            if self
                .bounds
                .get(&key)
                .map_or(false, |cell| cell.contains(point))
            {
                continue;
            }
            self.remove(id);
            self.insert(point, id)?;
        }
        Ok(())
    }

    // First quadrant whose precomputed cell contains the point wins.
    fn locate(&self, point: Vec2, depth: u8) -> Option<u8> {
        (0..4u8).find(|&quadrant| {
            self.bounds
                .get(&CellKey::new(depth, quadrant).pack())
                .map_or(false, |cell| cell.contains(point))
        })
    }

    // Children of slot s live at (s+1)*4 ..= (s+1)*4+3. Checked before every
    // descent; an undersized node array reports the failure instead of
    // touching slots it does not own.
    fn child_base(&self, slot: usize) -> QuadtreeResult<usize> {
        let base = (slot + 1) * 4;
        if base + 4 > self.nodes.len() {
            return Err(QuadtreeError::CapacityExceeded {
                required: base + 4,
                capacity: self.nodes.len(),
            });
        }
        Ok(base)
    }
}
