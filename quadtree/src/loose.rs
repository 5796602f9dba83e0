use std::mem;

use common::shapes::{Aabb, Circle};
use fxhash::{FxHashMap, FxHashSet};
use glam::Vec2;
use smallvec::{smallvec, SmallVec};

type NodeStack = SmallVec<[u32; 64]>;

// Anything the loose tree tracks: an axis-aligned box plus a position that
// moves in lockstep with it.
pub trait Boundable {
    fn bounds(&self) -> &Aabb;
    fn bounds_mut(&mut self) -> &mut Aabb;
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);
}

#[derive(Debug, Clone, Copy)]
pub struct LooseConfig {
    pub looseness: usize,
    pub min_size: f32,
}

impl Default for LooseConfig {
    fn default() -> Self {
        LooseConfig {
            looseness: 4,
            // Subdivision stops once a child would shrink below this on
            // either axis.
            min_size: 1.0,
        }
    }
}

struct LooseNode {
    bounds: Aabb,
    entries: Vec<u32>,
    children: [u32; 4],
}

impl LooseNode {
    fn new(bounds: Aabb) -> Self {
        LooseNode {
            bounds,
            entries: Vec::new(),
            children: [0; 4],
        }
    }

    // Index 0 is the root and never a child, so 0 doubles as "no children".
    fn has_children(&self) -> bool {
        self.children[0] != 0
    }
}

pub struct LooseQuadTree {
    nodes: Vec<LooseNode>,
    free: Vec<u32>,
    registry: FxHashMap<u32, Aabb>,
    looseness: usize,
    min_size: f32,
}

impl LooseQuadTree {
    pub fn new(bounds: Aabb, looseness: usize) -> Self {
        Self::new_with_config(
            bounds,
            LooseConfig {
                looseness,
                ..LooseConfig::default()
            },
        )
    }

    pub fn new_with_config(bounds: Aabb, config: LooseConfig) -> Self {
        let min_size = if config.min_size > 0.0 {
            config.min_size
        } else {
            1.0
        };
        LooseQuadTree {
            nodes: vec![LooseNode::new(bounds)],
            free: Vec::new(),
            registry: FxHashMap::default(),
            looseness: config.looseness.max(1),
            min_size,
        }
    }

    // Returns false when the bounds do not intersect the world; nothing is
    // recorded in that case.
    pub fn insert<T: Boundable>(&mut self, id: u32, entity: &T) -> bool {
        self.place(id, *entity.bounds())
    }

    // Re-homes the entity under its current bounds. An entity that left the
    // world drops out of the index entirely.
    pub fn update<T: Boundable>(&mut self, id: u32, entity: &T) -> bool {
        self.place(id, *entity.bounds())
    }

    fn place(&mut self, id: u32, bounds: Aabb) -> bool {
        if self.registry.remove(&id).is_some() {
            self.purge(id);
        }
        if !self.nodes[0].bounds.intersects(&bounds) {
            return false;
        }
        self.registry.insert(id, bounds);
        self.insert_into(0, id, &bounds);
        true
    }

    fn insert_into(&mut self, node: u32, id: u32, bounds: &Aabb) {
        let n = node as usize;
        if !self.nodes[n].bounds.intersects(bounds) {
            return;
        }
        if self.nodes[n].has_children() {
            let children = self.nodes[n].children;
            for child in children {
                self.insert_into(child, id, bounds);
            }
            return;
        }
        self.nodes[n].entries.push(id);
        if self.nodes[n].entries.len() > self.looseness && self.can_split(n) {
            self.subdivide(n);
        }
    }

    // A node splits only while its children would stay at least min_size on
    // both axes.
    fn can_split(&self, node: usize) -> bool {
        let half = self.nodes[node].bounds.size() / 2.0;
        half.x >= self.min_size && half.y >= self.min_size
    }

    fn subdivide(&mut self, node: usize) {
        let bounds = self.nodes[node].bounds;
        let center = bounds.center();
        // Same quadrant order as the flat tree's cells: +x+y, -x+y, -x-y, +x-y.
        let quads = [
            Aabb::new(center, bounds.max),
            Aabb::new(
                Vec2::new(bounds.min.x, center.y),
                Vec2::new(center.x, bounds.max.y),
            ),
            Aabb::new(bounds.min, center),
            Aabb::new(
                Vec2::new(center.x, bounds.min.y),
                Vec2::new(bounds.max.x, center.y),
            ),
        ];
        for (slot, quad) in quads.into_iter().enumerate() {
            let child = self.alloc(quad);
            self.nodes[node].children[slot] = child;
        }
        let entries = mem::take(&mut self.nodes[node].entries);
        let children = self.nodes[node].children;
        for id in entries {
            if let Some(entry_bounds) = self.registry.get(&id).copied() {
                for child in children {
                    self.insert_into(child, id, &entry_bounds);
                }
            }
        }
    }

    fn alloc(&mut self, bounds: Aabb) -> u32 {
        match self.free.pop() {
            Some(slot) => {
                let node = &mut self.nodes[slot as usize];
                node.bounds = bounds;
                node.entries.clear();
                node.children = [0; 4];
                slot
            }
            None => {
                self.nodes.push(LooseNode::new(bounds));
                (self.nodes.len() - 1) as u32
            }
        }
    }

    // Node-granularity matches: an entry reports when a childless node
    // holding it passes the test. An id spanning several children shows up
    // once per holder; callers dedupe when identity matters.
    pub fn query(&self, range: &Aabb) -> Vec<u32> {
        self.collect_hits(|bounds| bounds.intersects(range))
    }

    pub fn query_circle(&self, circle: &Circle) -> Vec<u32> {
        self.collect_hits(|bounds| bounds.intersects_circle(circle))
    }

    pub fn query_all(&self) -> Vec<u32> {
        self.collect_hits(|_| true)
    }

    fn collect_hits<F: Fn(&Aabb) -> bool>(&self, hit: F) -> Vec<u32> {
        let mut found = Vec::new();
        let mut stack: NodeStack = smallvec![0];
        while let Some(node) = stack.pop() {
            let node = &self.nodes[node as usize];
            if !hit(&node.bounds) {
                continue;
            }
            if node.has_children() {
                stack.extend_from_slice(&node.children);
            } else {
                found.extend_from_slice(&node.entries);
            }
        }
        found
    }

    // The translation lands only if a childless node reached through the
    // current bounds still contains the moved center. Bounds and position
    // move together or not at all.
    pub fn try_move<T: Boundable>(&mut self, id: u32, entity: &mut T, offset: Vec2) -> bool {
        let current = match self.registry.get(&id) {
            Some(&bounds) => bounds,
            None => return false,
        };
        let moved = current.translated(offset);
        if !self.accepts(0, &current, moved.center()) {
            return false;
        }
        entity.bounds_mut().translate(offset);
        let position = entity.position();
        entity.set_position(position + offset);
        self.registry.insert(id, moved);
        true
    }

    fn accepts(&self, node: u32, current: &Aabb, target: Vec2) -> bool {
        let node = &self.nodes[node as usize];
        if !node.bounds.intersects(current) {
            return false;
        }
        if node.has_children() {
            return node
                .children
                .iter()
                .any(|&child| self.accepts(child, current, target));
        }
        node.bounds.contains(target)
    }

    pub fn remove(&mut self, id: u32) {
        if self.registry.remove(&id).is_some() {
            self.purge(id);
        }
    }

    // Entries are not re-homed by try_move, so a descent pruned by the
    // recorded bounds could miss a holder. The sweep visits everything.
    fn purge(&mut self, id: u32) {
        let mut stack: NodeStack = smallvec![0];
        while let Some(node) = stack.pop() {
            let n = node as usize;
            if self.nodes[n].has_children() {
                stack.extend_from_slice(&self.nodes[n].children);
            } else {
                self.nodes[n].entries.retain(|&entry| entry != id);
            }
        }
    }

    pub fn rebalance(&mut self) {
        self.rebalance_node(0);
    }

    // Post-order: children settle first, then this node merges or splits.
    fn rebalance_node(&mut self, node: u32) {
        let n = node as usize;
        if self.nodes[n].has_children() {
            let children = self.nodes[n].children;
            for child in children {
                self.rebalance_node(child);
            }
            if self.occupancy(n) <= self.looseness {
                self.merge(n);
            }
        } else if self.nodes[n].entries.len() > self.looseness && self.can_split(n) {
            self.subdivide(n);
        }
    }

    // Distinct ids in the subtree; an id duplicated across children counts
    // once.
    fn occupancy(&self, node: usize) -> usize {
        let mut seen = FxHashSet::default();
        let mut stack: NodeStack = smallvec![node as u32];
        while let Some(node) = stack.pop() {
            let node = &self.nodes[node as usize];
            if node.has_children() {
                stack.extend_from_slice(&node.children);
            } else {
                seen.extend(node.entries.iter().copied());
            }
        }
        seen.len()
    }

    fn merge(&mut self, node: usize) {
        let mut pulled = Vec::new();
        let mut seen = FxHashSet::default();
        let children = self.nodes[node].children;
        for child in children {
            let c = child as usize;
            debug_assert!(!self.nodes[c].has_children());
            for id in mem::take(&mut self.nodes[c].entries) {
                if seen.insert(id) {
                    pulled.push(id);
                }
            }
            self.free.push(child);
        }
        debug_assert!(self.nodes[node].entries.is_empty());
        self.nodes[node].entries = pulled;
        self.nodes[node].children = [0; 4];
    }

    pub fn clear(&mut self) {
        let bounds = self.nodes[0].bounds;
        self.nodes.clear();
        self.nodes.push(LooseNode::new(bounds));
        self.free.clear();
        self.registry.clear();
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<Aabb> {
        self.registry.get(&id).copied()
    }

    pub fn bounds(&self) -> Aabb {
        self.nodes[0].bounds
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn root_entry_count(&self) -> usize {
        self.nodes[0].entries.len()
    }
}
