use super::*;

// Each depth halves the map and shifts the center by a quarter of the halved
// size; the quadrant index then reflects the shift into its own corner of a
// world centered on the origin.
fn cell_center(world_size: Vec2, depth: u8) -> Vec2 {
    let mut map = world_size;
    let mut center = Vec2::ZERO;
    for _ in 0..depth {
        map /= 2.0;
        center += map / 4.0;
    }
    center
}

fn reflect(center: Vec2, quadrant: u8) -> Vec2 {
    match quadrant {
        0 => center,
        1 => Vec2::new(-center.x, center.y),
        2 => -center,
        _ => Vec2::new(center.x, -center.y),
    }
}

pub(crate) fn cell_bounds(world_size: Vec2, key: CellKey) -> Aabb {
    let center = reflect(cell_center(world_size, key.depth), key.quadrant);
    let half = world_size / 2.0;
    match key.quadrant {
        0 => Aabb::new(center, center + half),
        1 => Aabb::new(
            Vec2::new(center.x - half.x, center.y),
            Vec2::new(center.x, center.y + half.y),
        ),
        2 => Aabb::new(center - half, center),
        _ => Aabb::new(
            Vec2::new(center.x, center.y - half.y),
            Vec2::new(center.x + half.x, center.y),
        ),
    }
}

pub(crate) fn build_bounds_table(world_size: Vec2, depth_limit: u8) -> FxHashMap<u16, Aabb> {
    let mut table = FxHashMap::default();
    for depth in 0..depth_limit {
        for quadrant in 0..4 {
            let key = CellKey::new(depth, quadrant);
            table.insert(key.pack(), cell_bounds(world_size, key));
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn test_depth_zero_quadrants_tile_world() {
        let world = vec2(100.0, 100.0);
        let q0 = cell_bounds(world, CellKey::new(0, 0));
        let q1 = cell_bounds(world, CellKey::new(0, 1));
        let q2 = cell_bounds(world, CellKey::new(0, 2));
        let q3 = cell_bounds(world, CellKey::new(0, 3));
        assert_eq!(q0, Aabb::new(vec2(0.0, 0.0), vec2(50.0, 50.0)));
        assert_eq!(q1, Aabb::new(vec2(-50.0, 0.0), vec2(0.0, 50.0)));
        assert_eq!(q2, Aabb::new(vec2(-50.0, -50.0), vec2(0.0, 0.0)));
        assert_eq!(q3, Aabb::new(vec2(0.0, -50.0), vec2(50.0, 0.0)));
        // The four quadrants overlap only on shared edges.
        assert!(!q0.contains(vec2(-0.1, 0.1)));
        assert!(!q1.contains(vec2(0.1, 0.1)));
    }

    #[test]
    fn test_deeper_centers_shift_per_quadrant() {
        let world = vec2(100.0, 100.0);
        // Depth 1 shifts the center by an eighth of the world per axis.
        let q0 = cell_bounds(world, CellKey::new(1, 0));
        assert_eq!(q0.min, vec2(12.5, 12.5));
        assert_eq!(q0.max, vec2(62.5, 62.5));
        let q2 = cell_bounds(world, CellKey::new(1, 2));
        assert_eq!(q2.min, vec2(-62.5, -62.5));
        assert_eq!(q2.max, vec2(-12.5, -12.5));
        // Depth 2 adds a sixteenth on top.
        let deep = cell_bounds(world, CellKey::new(2, 0));
        assert_eq!(deep.min, vec2(18.75, 18.75));
    }

    #[test]
    fn test_table_size() {
        for depth_limit in 1..=7u8 {
            let table = build_bounds_table(vec2(64.0, 64.0), depth_limit);
            assert_eq!(table.len(), depth_limit as usize * 4);
        }
    }
}
