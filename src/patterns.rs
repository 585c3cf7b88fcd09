//! Well-known starting patterns, as `(dx, dy)` offsets from a top-left origin.

pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(u32, u32)],
}

impl Pattern {
    /// Bounding box `(width, height)` of the live cells.
    pub fn extent(&self) -> (u32, u32) {
        self.cells
            .iter()
            .fold((0, 0), |(w, h), &(x, y)| (w.max(x + 1), h.max(y + 1)))
    }
}

/// Travels one cell down and right every four generations.
pub const GLIDER: Pattern = Pattern {
    name: "Glider",
    cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
};

/// Period 2 oscillator, starting horizontal.
pub const BLINKER: Pattern = Pattern {
    name: "Blinker",
    cells: &[(0, 0), (1, 0), (2, 0)],
};

pub const BLOCK: Pattern = Pattern {
    name: "Block",
    cells: &[(0, 0), (1, 0), (0, 1), (1, 1)],
};

pub const TOAD: Pattern = Pattern {
    name: "Toad",
    cells: &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
};

pub const BEACON: Pattern = Pattern {
    name: "Beacon",
    cells: &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2), (3, 2), (2, 3), (3, 3)],
};

pub const R_PENTOMINO: Pattern = Pattern {
    name: "R-pentomino",
    cells: &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
};

/// Patterns in the order the number keys select them.
pub const PATTERNS: &[Pattern] = &[GLIDER, BLINKER, BLOCK, TOAD, BEACON, R_PENTOMINO];

#[cfg(test)]
mod test {
    use super::*;
    use crate::engine::{Engine, StagnationThreshold};

    #[test]
    fn extents() {
        assert_eq!(GLIDER.extent(), (3, 3));
        assert_eq!(BLINKER.extent(), (3, 1));
        assert_eq!(BEACON.extent(), (4, 4));
    }

    #[test]
    fn toad_and_beacon_have_period_two() {
        for pattern in [&TOAD, &BEACON] {
            let mut engine = Engine::new(10, 10, StagnationThreshold::default());
            engine.stamp(pattern, 3, 3);
            let start = engine.cells_view().clone();

            engine.step();
            assert_ne!(engine.cells_view(), &start, "{}", pattern.name);
            engine.step();
            assert_eq!(engine.cells_view(), &start, "{}", pattern.name);
        }
    }
}
