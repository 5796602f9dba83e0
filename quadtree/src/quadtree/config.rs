#[derive(Debug, Clone)]
pub struct Config {
    pub capacity: usize,
    pub depth_limit: u8,
    pub split_threshold: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            // A fully expanded tree with a depth limit of 4 occupies
            // 4 + 16 + 64 + 256 = 340 slots.
            capacity: capacity_for_depth(4),
            depth_limit: 4,
            split_threshold: 4,
        }
    }
}

// Worst-case slot demand for a fully expanded tree of the given depth:
// 4 + 16 + ... + 4^depth_limit.
pub fn capacity_for_depth(depth_limit: u8) -> usize {
    let depth_limit = depth_limit.clamp(1, 7) as u32;
    (4usize.pow(depth_limit + 1) - 4) / 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_for_depth() {
        assert_eq!(capacity_for_depth(1), 4);
        assert_eq!(capacity_for_depth(2), 20);
        assert_eq!(capacity_for_depth(3), 84);
        assert_eq!(capacity_for_depth(7), 21844);
        // Out-of-range depth limits clamp the same way the constructor does.
        assert_eq!(capacity_for_depth(0), 4);
        assert_eq!(capacity_for_depth(9), 21844);
    }
}
