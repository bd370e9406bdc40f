//! Placement strategies: start-cell selection and direction-order bias.
//!
//! The original generator grew several near-duplicate placement routines;
//! they are consolidated here into one [`Strategy`] enum. Each variant biases
//! the depth-first path search toward a different shape (diagonal runs,
//! spirals, zigzags, border hugging, center-outward bursts, pure random
//! walks) by reordering the eight candidate direction offsets, and chooses a
//! matching start cell (corner, border, center, or uniform random).

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::grid::{free_cells, free_neighbor_count, idx_to_pos, is_border, pos_to_idx, Pos, COLS, ROWS};

/// The eight direction offsets, row-major order.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Clockwise direction ring starting at "up", used by the spiral bias.
const CLOCKWISE: [(i32, i32); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

/// A path-shape bias for the placement search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Diagonal run from a corner toward the opposite corner.
    DiagonalSweep,
    /// Clockwise curl from a border cell.
    Spiral,
    /// Alternating horizontal/vertical steps from a border cell.
    Zigzag,
    /// Border-hugging snake from a corner.
    BorderSnake,
    /// Outward burst from a central cell.
    CenterBurst,
    /// Uniform random walk from a random free cell.
    RandomWalk,
}

impl Strategy {
    /// All strategies, in rotation order for word placement.
    pub const ALL: [Strategy; 6] = [
        Strategy::DiagonalSweep,
        Strategy::Spiral,
        Strategy::Zigzag,
        Strategy::BorderSnake,
        Strategy::CenterBurst,
        Strategy::RandomWalk,
    ];

    /// Picks a strategy uniformly at random.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).expect("strategy list is non-empty")
    }

    /// Chooses a start cell among the free cells, biased per strategy.
    ///
    /// Falls back to a uniform random free cell when no preferred cell is
    /// free. Returns `None` only when the grid is full.
    pub fn start_cell<R: Rng>(self, rng: &mut R, occupied: u64) -> Option<usize> {
        let free = free_cells(occupied);
        if free.is_empty() {
            return None;
        }

        let preferred: Vec<usize> = match self {
            Strategy::DiagonalSweep | Strategy::BorderSnake => corners()
                .iter()
                .copied()
                .filter(|&i| occupied & (1 << i) == 0)
                .collect(),
            Strategy::Spiral | Strategy::Zigzag => free
                .iter()
                .copied()
                .filter(|&i| is_border(i))
                .collect(),
            Strategy::CenterBurst => {
                // cells closest to the grid center
                let best = free
                    .iter()
                    .map(|&i| center_distance_sq(idx_to_pos(i)))
                    .min()
                    .expect("free list is non-empty");
                free.iter()
                    .copied()
                    .filter(|&i| center_distance_sq(idx_to_pos(i)) == best)
                    .collect()
            }
            Strategy::RandomWalk => free.clone(),
        };

        preferred
            .choose(rng)
            .or_else(|| free.choose(rng))
            .copied()
    }

    /// Produces the direction try-order for one search step.
    ///
    /// `start` is the path's first cell, `pos` the current cell and `step`
    /// the zero-based index of the letter being placed. The returned array is
    /// always a permutation of [`DIRECTIONS`].
    pub fn direction_order<R: Rng>(
        self,
        rng: &mut R,
        start: Pos,
        pos: Pos,
        step: usize,
    ) -> [(i32, i32); 8] {
        match self {
            Strategy::DiagonalSweep => {
                // run toward the corner diagonally opposite the start
                let dr = if start.0 < ROWS / 2 { 1 } else { -1 };
                let dc = if start.1 < COLS / 2 { 1 } else { -1 };
                let mut order = [
                    (dr, dc),
                    (dr, 0),
                    (0, dc),
                    (dr, -dc),
                    (-dr, dc),
                    (0, -dc),
                    (-dr, 0),
                    (-dr, -dc),
                ];
                // break ties between equally-preferred pairs
                if rng.gen_bool(0.5) {
                    order.swap(1, 2);
                }
                if rng.gen_bool(0.5) {
                    order.swap(3, 4);
                }
                order
            }
            Strategy::Spiral => {
                // rotate the clockwise ring as the path grows, curling inward
                let offset = step % 8;
                let mut order = [(0, 0); 8];
                for (i, slot) in order.iter_mut().enumerate() {
                    *slot = CLOCKWISE[(offset + i) % 8];
                }
                order
            }
            Strategy::Zigzag => {
                let dc = if start.1 < COLS / 2 { 1 } else { -1 };
                if step % 2 == 0 {
                    // horizontal-leaning step
                    [
                        (0, dc),
                        (0, -dc),
                        (-1, dc),
                        (1, dc),
                        (-1, -dc),
                        (1, -dc),
                        (-1, 0),
                        (1, 0),
                    ]
                } else {
                    // vertical-leaning step
                    [
                        (1, 0),
                        (-1, 0),
                        (1, dc),
                        (-1, dc),
                        (1, -dc),
                        (-1, -dc),
                        (0, dc),
                        (0, -dc),
                    ]
                }
            }
            Strategy::BorderSnake => {
                // prefer moves that keep the path on the border
                let mut order = DIRECTIONS;
                order.shuffle(rng);
                order.sort_by_key(|&(dr, dc)| {
                    let (nr, nc) = (pos.0 + dr, pos.1 + dc);
                    if !crate::grid::in_bounds(nr, nc) {
                        2
                    } else if is_border(pos_to_idx(nr, nc)) {
                        0
                    } else {
                        1
                    }
                });
                order
            }
            Strategy::CenterBurst => {
                // prefer moves that increase distance from the center
                let mut order = DIRECTIONS;
                order.shuffle(rng);
                order.sort_by_key(|&(dr, dc)| {
                    std::cmp::Reverse(center_distance_sq((pos.0 + dr, pos.1 + dc)))
                });
                order
            }
            Strategy::RandomWalk => {
                let mut order = DIRECTIONS;
                order.shuffle(rng);
                order
            }
        }
    }
}

/// The four corner cell indices.
fn corners() -> [usize; 4] {
    [
        pos_to_idx(0, 0),
        pos_to_idx(0, COLS - 1),
        pos_to_idx(ROWS - 1, 0),
        pos_to_idx(ROWS - 1, COLS - 1),
    ]
}

/// Squared distance from the grid center, in quarter-cell units.
///
/// Doubled coordinates avoid the half-integer center of an even-sized grid.
fn center_distance_sq(pos: Pos) -> i32 {
    let dr = 2 * pos.0 - (ROWS - 1);
    let dc = 2 * pos.1 - (COLS - 1);
    dr * dr + dc * dc
}

/// Picks a free cell with the fewest free neighbors, random among ties.
///
/// Used to steer word placement into tight pockets before they become
/// unreachable, and to order gap filling.
pub fn most_isolated<R: Rng>(rng: &mut R, occupied: u64) -> Option<usize> {
    let free = free_cells(occupied);
    let best = free
        .iter()
        .map(|&i| free_neighbor_count(occupied, i))
        .min()?;
    free.iter()
        .copied()
        .filter(|&i| free_neighbor_count(occupied, i) == best)
        .collect::<Vec<_>>()
        .choose(rng)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_direction_orders_are_permutations() {
        let mut rng = StdRng::seed_from_u64(7);
        for strategy in Strategy::ALL {
            for step in 0..4 {
                let order = strategy.direction_order(&mut rng, (0, 0), (3, 2), step);
                let mut sorted = order;
                sorted.sort();
                let mut expected = DIRECTIONS;
                expected.sort();
                assert_eq!(sorted, expected, "{strategy:?} step {step}");
            }
        }
    }

    #[test]
    fn test_start_cells_are_free() {
        let mut rng = StdRng::seed_from_u64(11);
        // occupy the whole left half of the grid
        let mut occupied = 0u64;
        for row in 0..ROWS {
            for col in 0..COLS / 2 {
                occupied |= 1 << pos_to_idx(row, col);
            }
        }
        for strategy in Strategy::ALL {
            for _ in 0..20 {
                let start = strategy.start_cell(&mut rng, occupied).unwrap();
                assert_eq!(occupied & (1 << start), 0, "{strategy:?} picked an occupied start");
            }
        }
    }

    #[test]
    fn test_start_cell_none_when_full() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            Strategy::RandomWalk.start_cell(&mut rng, crate::grid::ALL_CELLS_FILLED),
            None
        );
    }

    #[test]
    fn test_most_isolated_prefers_pockets() {
        let mut rng = StdRng::seed_from_u64(5);
        // leave a single free cell at the corner plus a free interior block
        let mut occupied = crate::grid::ALL_CELLS_FILLED;
        occupied &= !(1 << pos_to_idx(0, 0));
        for row in 3..6 {
            for col in 1..4 {
                occupied &= !(1 << pos_to_idx(row, col));
            }
        }
        // the lone corner cell has zero free neighbors
        assert_eq!(most_isolated(&mut rng, occupied), Some(pos_to_idx(0, 0)));
    }
}
