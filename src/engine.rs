//! The automaton itself: a toroidal boolean grid advanced by Conway's rule.
//!
//! Nothing in here knows about rendering, input or timing. The front-end owns an
//! [`Engine`], calls [`Engine::step`] at whatever cadence it likes and paints
//! [`Engine::cells_view`] afterwards.
//!
//! Stagnation is detected from the population alone: a run is reported stagnant
//! once the live-cell count has not changed for `threshold` consecutive
//! generations. Oscillators whose population is constant across phases (the
//! blinker, for one) are therefore reported as stagnant too.

use serde::{Deserialize, Serialize};

use crate::{error::EngineError, patterns::Pattern};

const NEIGHBOUR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Row-major `width × height` grid whose edges wrap around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates an all-dead grid. Both dimensions must be positive.
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0, "grid dimensions must be positive");
        Self {
            width,
            height,
            cells: vec![false; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Index of `(x, y)` into the row-major cell storage.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Inverse of [`Grid::index`].
    #[inline]
    pub fn coord(&self, idx: usize) -> (u32, u32) {
        (
            (idx % self.width as usize) as u32,
            (idx / self.width as usize) as u32,
        )
    }

    /// State of the cell at `(x, y)`; coordinates outside the grid read as dead.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.contains(x, y) && self.cells[self.index(x, y)]
    }

    /// State of the cell at a row-major index; out of range reads as dead.
    #[inline]
    pub fn get_index(&self, idx: usize) -> bool {
        self.cells.get(idx).copied().unwrap_or(false)
    }

    fn set(&mut self, x: u32, y: u32, alive: bool) {
        let idx = self.index(x, y);
        self.cells[idx] = alive;
    }

    /// Number of live cells among the eight wrapped neighbours of `(x, y)`.
    pub fn live_neighbours(&self, x: u32, y: u32) -> u8 {
        let (w, h) = (i64::from(self.width), i64::from(self.height));
        NEIGHBOUR_OFFSETS
            .iter()
            .filter(|(dx, dy)| {
                let nx = (i64::from(x) + dx + w) % w;
                let ny = (i64::from(y) + dy + h) % h;
                self.cells[self.index(nx as u32, ny as u32)]
            })
            .count() as u8
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|alive| **alive).count()
    }

    /// Iterates `(x, y, alive)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, bool)> + '_ {
        self.cells.iter().enumerate().map(move |(idx, alive)| {
            let (x, y) = self.coord(idx);
            (x, y, *alive)
        })
    }

    /// Writes the next generation of `self` into `next`.
    ///
    /// Every cell reads only from `self`, so no transition observes an
    /// already-updated neighbour.
    fn advance_into(&self, next: &mut Grid) {
        debug_assert_eq!((self.width, self.height), (next.width, next.height));
        for y in 0..self.height {
            for x in 0..self.width {
                let alive = self.cells[self.index(x, y)];
                next.set(x, y, next_state(alive, self.live_neighbours(x, y)));
            }
        }
    }
}

/// Conway's rule for a single cell.
#[inline]
pub fn next_state(alive: bool, live_neighbours: u8) -> bool {
    match (alive, live_neighbours) {
        // reproduction
        (false, 3) => true,
        // survival
        (true, 2 | 3) => true,
        // under- and overpopulation, or stays dead
        _ => false,
    }
}

/// How many unchanged generations count as stagnation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagnationThreshold {
    /// A fixed number of generations.
    Fixed(u32),
    /// As many generations as the grid is wide.
    GridWidth,
}

impl StagnationThreshold {
    pub fn resolve(self, grid_width: u32) -> u32 {
        match self {
            Self::Fixed(n) => n,
            Self::GridWidth => grid_width,
        }
    }
}

impl Default for StagnationThreshold {
    fn default() -> Self {
        Self::Fixed(10)
    }
}

/// What a completed generation looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    pub generation: u64,
    pub live_cells: usize,
}

#[derive(Debug, Clone)]
pub struct Engine {
    grid: Grid,
    next: Grid,
    generation: u64,
    live_cells: usize,
    previous_live_cells: usize,
    stagnant_generations: u32,
    threshold: StagnationThreshold,
}

impl Engine {
    /// An all-dead `width × height` engine at generation zero.
    pub fn new(width: u32, height: u32, threshold: StagnationThreshold) -> Self {
        Self {
            grid: Grid::new(width, height),
            next: Grid::new(width, height),
            generation: 0,
            live_cells: 0,
            previous_live_cells: 0,
            stagnant_generations: 0,
            threshold,
        }
    }

    /// Reallocates the grid and fills it from an RNG seeded with `seed`.
    ///
    /// The same `(width, height, seed)` always yields the same grid.
    pub fn initialize(&mut self, width: u32, height: u32, seed: u64) {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut grid = Grid::new(width, height);
        grid.cells.iter_mut().for_each(|cell| *cell = rng.bool());

        self.next = Grid::new(width, height);
        self.grid = grid;
        self.generation = 0;
        self.live_cells = self.grid.live_count();
        self.reset_tracker();
    }

    /// [`Engine::initialize`] with the current dimensions.
    pub fn randomize(&mut self, seed: u64) {
        self.initialize(self.width(), self.height(), seed);
    }

    /// Advances one generation.
    pub fn step(&mut self) -> StepResult {
        self.grid.advance_into(&mut self.next);
        std::mem::swap(&mut self.grid, &mut self.next);

        self.previous_live_cells = self.live_cells;
        self.live_cells = self.grid.live_count();
        if self.live_cells == self.previous_live_cells {
            self.stagnant_generations = self.stagnant_generations.saturating_add(1);
        } else {
            self.stagnant_generations = 0;
        }
        self.generation += 1;

        StepResult {
            generation: self.generation,
            live_cells: self.live_cells,
        }
    }

    /// Flips one cell. A manual edit is not a generation, so neither the
    /// generation counter nor the stagnation tracker move.
    pub fn toggle_cell(&mut self, x: u32, y: u32) -> Result<(), EngineError> {
        let alive = self.checked_get(x, y)?;
        self.write_cell(x, y, !alive);
        Ok(())
    }

    /// Sets one cell, otherwise behaves like [`Engine::toggle_cell`].
    pub fn set_cell(&mut self, x: u32, y: u32, alive: bool) -> Result<(), EngineError> {
        self.checked_get(x, y)?;
        self.write_cell(x, y, alive);
        Ok(())
    }

    /// Overlays `pattern` with its origin at `(x, y)`, wrapping around the edges.
    pub fn stamp(&mut self, pattern: &Pattern, x: u32, y: u32) {
        let (w, h) = (self.width(), self.height());
        for &(dx, dy) in pattern.cells {
            let px = ((u64::from(x) + u64::from(dx)) % u64::from(w)) as u32;
            let py = ((u64::from(y) + u64::from(dy)) % u64::from(h)) as u32;
            self.grid.set(px, py, true);
        }
        self.live_cells = self.grid.live_count();
    }

    /// Kills every cell and resets all counters.
    pub fn clear(&mut self) {
        self.grid.cells.fill(false);
        self.generation = 0;
        self.live_cells = 0;
        self.reset_tracker();
    }

    pub fn is_stagnant(&self) -> bool {
        self.stagnant_generations >= self.stagnation_threshold()
    }

    /// Read-only view of the current generation.
    pub fn cells_view(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> u32 {
        self.grid.width
    }

    pub fn height(&self) -> u32 {
        self.grid.height
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn live_cells(&self) -> usize {
        self.live_cells
    }

    pub fn stagnant_generations(&self) -> u32 {
        self.stagnant_generations
    }

    pub fn stagnation_threshold(&self) -> u32 {
        self.threshold.resolve(self.grid.width)
    }

    fn checked_get(&self, x: u32, y: u32) -> Result<bool, EngineError> {
        if !self.grid.contains(x, y) {
            return Err(EngineError::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(self.grid.get(x, y))
    }

    fn write_cell(&mut self, x: u32, y: u32, alive: bool) {
        self.grid.set(x, y, alive);
        self.live_cells = self.grid.live_count();
    }

    fn reset_tracker(&mut self) {
        self.previous_live_cells = self.live_cells;
        self.stagnant_generations = 0;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::patterns::{BLINKER, BLOCK, GLIDER};

    fn live_set(engine: &Engine) -> Vec<(u32, u32)> {
        engine
            .cells_view()
            .iter()
            .filter(|(_, _, alive)| *alive)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    fn engine_with(width: u32, height: u32, cells: &[(u32, u32)]) -> Engine {
        let mut engine = Engine::new(width, height, StagnationThreshold::Fixed(10));
        for &(x, y) in cells {
            engine.set_cell(x, y, true).unwrap();
        }
        engine
    }

    #[test]
    fn rule_table() {
        assert!(next_state(false, 3));
        assert!(!next_state(false, 2));
        assert!(!next_state(true, 1));
        assert!(next_state(true, 2));
        assert!(next_state(true, 3));
        assert!(!next_state(true, 4));
        assert!(!next_state(false, 8));
    }

    #[test]
    fn initialize_is_reproducible() {
        let mut a = Engine::new(1, 1, StagnationThreshold::default());
        let mut b = Engine::new(3, 3, StagnationThreshold::default());
        a.initialize(24, 17, 42);
        b.initialize(24, 17, 42);
        assert_eq!(a.cells_view(), b.cells_view());
        assert_eq!(a.cells_view().width(), 24);
        assert_eq!(a.cells_view().height(), 17);
        assert_eq!(a.generation(), 0);
        assert_eq!(a.live_cells(), a.cells_view().live_count());

        b.initialize(24, 17, 43);
        assert_ne!(a.cells_view(), b.cells_view());
    }

    #[test]
    fn randomize_resets_counters() {
        let mut engine = Engine::new(8, 6, StagnationThreshold::default());
        engine.stamp(&BLOCK, 2, 2);
        for _ in 0..3 {
            engine.step();
        }
        assert_eq!(engine.stagnant_generations(), 3);

        engine.randomize(7);
        assert_eq!(engine.generation(), 0);
        assert_eq!(engine.stagnant_generations(), 0);
        assert_eq!(engine.live_cells(), engine.cells_view().live_count());

        let mut fresh = Engine::new(1, 1, StagnationThreshold::default());
        fresh.initialize(8, 6, 7);
        assert_eq!(engine.cells_view(), fresh.cells_view());
    }

    #[test]
    fn step_is_deterministic() {
        let mut a = Engine::new(1, 1, StagnationThreshold::default());
        a.initialize(30, 30, 7);
        let mut b = a.clone();
        for _ in 0..5 {
            assert_eq!(a.step(), b.step());
            assert_eq!(a.cells_view(), b.cells_view());
        }
    }

    #[test]
    fn glider_translates_after_four_steps() {
        let mut engine = Engine::new(10, 10, StagnationThreshold::default());
        engine.stamp(&GLIDER, 2, 2);
        let start = live_set(&engine);

        for _ in 0..4 {
            engine.step();
        }

        let mut expected: Vec<_> = start.iter().map(|&(x, y)| (x + 1, y + 1)).collect();
        expected.sort_by_key(|&(x, y)| (y, x));
        assert_eq!(live_set(&engine), expected);
        assert_eq!(engine.generation(), 4);
        assert_eq!(engine.live_cells(), 5);
    }

    #[test]
    fn block_is_still() {
        let mut engine = Engine::new(6, 6, StagnationThreshold::default());
        engine.stamp(&BLOCK, 2, 2);
        let before = engine.cells_view().clone();
        for _ in 0..8 {
            engine.step();
            assert_eq!(engine.cells_view(), &before);
        }
    }

    #[test]
    fn blinker_oscillates_and_reads_as_stagnant() {
        let mut engine = Engine::new(5, 5, StagnationThreshold::Fixed(10));
        engine.stamp(&BLINKER, 1, 2);
        assert_eq!(live_set(&engine), vec![(1, 2), (2, 2), (3, 2)]);

        let result = engine.step();
        assert_eq!(live_set(&engine), vec![(2, 1), (2, 2), (2, 3)]);
        assert_eq!(result.live_cells, 3);

        engine.step();
        assert_eq!(live_set(&engine), vec![(1, 2), (2, 2), (3, 2)]);

        for _ in 2..9 {
            engine.step();
        }
        assert_eq!(engine.stagnant_generations(), 9);
        assert!(!engine.is_stagnant());
        engine.step();
        assert!(engine.is_stagnant());
    }

    #[test]
    fn stagnation_resets_when_population_changes() {
        let mut engine = engine_with(8, 8, &[(1, 1), (2, 1), (1, 2), (2, 2)]);
        engine.step();
        engine.step();
        assert_eq!(engine.stagnant_generations(), 2);

        // lone cell away from the block dies on the next step
        engine.set_cell(6, 6, true).unwrap();
        assert_eq!(engine.stagnant_generations(), 2);
        engine.step();
        assert_eq!(engine.live_cells(), 4);
        assert_eq!(engine.stagnant_generations(), 0);
    }

    #[test]
    fn grid_width_threshold() {
        let engine = Engine::new(13, 4, StagnationThreshold::GridWidth);
        assert_eq!(engine.stagnation_threshold(), 13);
        assert!(!engine.is_stagnant());
    }

    #[test]
    fn toggle_out_of_bounds_leaves_grid() {
        let mut engine = engine_with(4, 3, &[(0, 0)]);
        let before = engine.cells_view().clone();

        assert_eq!(
            engine.toggle_cell(4, 0),
            Err(EngineError::OutOfBounds {
                x: 4,
                y: 0,
                width: 4,
                height: 3
            })
        );
        assert!(engine.toggle_cell(0, 3).is_err());
        assert_eq!(engine.cells_view(), &before);
        assert_eq!(engine.live_cells(), 1);
    }

    #[test]
    fn toggle_is_not_a_generation() {
        let mut engine = Engine::new(4, 4, StagnationThreshold::default());
        engine.step();
        engine.toggle_cell(1, 1).unwrap();
        assert!(engine.cells_view().get(1, 1));
        assert_eq!(engine.live_cells(), 1);
        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.stagnant_generations(), 1);

        engine.toggle_cell(1, 1).unwrap();
        assert!(!engine.cells_view().get(1, 1));
        assert_eq!(engine.live_cells(), 0);
    }

    #[test]
    fn clear_then_step_stays_dead() {
        let mut engine = Engine::new(1, 1, StagnationThreshold::default());
        engine.initialize(12, 12, 42);
        engine.step();
        engine.clear();
        assert_eq!(engine.generation(), 0);
        assert_eq!(engine.live_cells(), 0);
        assert_eq!(engine.stagnant_generations(), 0);

        let result = engine.step();
        assert_eq!(result.live_cells, 0);
        assert_eq!(engine.cells_view().live_count(), 0);
    }

    #[test]
    fn neighbours_wrap_around_corners() {
        let engine = engine_with(5, 4, &[(0, 0)]);
        let grid = engine.cells_view();
        assert_eq!(grid.live_neighbours(4, 3), 1);
        assert_eq!(grid.live_neighbours(0, 3), 1);
        assert_eq!(grid.live_neighbours(4, 0), 1);
        assert_eq!(grid.live_neighbours(2, 2), 0);

        let engine = engine_with(5, 4, &[(4, 3)]);
        assert_eq!(engine.cells_view().live_neighbours(0, 0), 1);
    }

    #[test]
    fn birth_across_the_seam() {
        // three live cells around (0, 0), all on the far edges
        let mut engine = engine_with(6, 6, &[(5, 5), (0, 5), (5, 0)]);
        engine.step();
        assert!(engine.cells_view().get(0, 0));
    }

    #[test]
    fn stamp_wraps() {
        let mut engine = Engine::new(4, 4, StagnationThreshold::default());
        engine.stamp(&BLOCK, 3, 3);
        assert_eq!(live_set(&engine), vec![(0, 0), (3, 0), (0, 3), (3, 3)]);
        assert_eq!(engine.live_cells(), 4);
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn index_roundtrip() {
        let grid = Grid::new(7, 3);
        assert_eq!(grid.index(2, 1), 9);
        assert_eq!(grid.coord(9), (2, 1));
        assert_eq!(grid.coord(20), (6, 2));
        assert!(!grid.get(7, 0));
        assert!(!grid.get_index(21));
    }
}
