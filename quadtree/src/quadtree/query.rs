use super::*;

// Flat queries run at cell granularity: an id matches when the cell its slot
// occupies intersects the range.
impl QuadTree {
    pub fn query(&self, range: &Aabb) -> Vec<u32> {
        self.matching(|cell| cell.intersects(range))
    }

    pub fn query_circle(&self, circle: &Circle) -> Vec<u32> {
        self.matching(|cell| cell.intersects_circle(circle))
    }

    fn matching<F: Fn(&Aabb) -> bool>(&self, hit: F) -> Vec<u32> {
        let mut found = Vec::new();
        for (&id, &slot) in &self.index {
            let key = self.nodes[slot].key;
            if self.bounds.get(&key).map_or(false, &hit) {
                found.push(id);
            }
        }
        found
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.index.contains_key(&id)
    }

    pub fn slot_of(&self, id: u32) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn node(&self, offset: usize) -> Option<QuadNode> {
        self.nodes.get(offset).copied()
    }

    pub fn cell_bounds(&self, depth: u8, quadrant: u8) -> Option<Aabb> {
        self.bounds.get(&CellKey::new(depth, quadrant).pack()).copied()
    }

    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth_limit(&self) -> u8 {
        self.depth_limit
    }

    pub fn world_size(&self) -> Vec2 {
        self.world_size
    }
}
