//! Spangram placement.
//!
//! The spangram is always placed first, on an otherwise empty grid, and its
//! path must genuinely touch two opposite sides of the grid. Two search
//! variants cooperate under one attempt budget:
//! - strategy-biased DFS from a border start, accepting only paths that span
//!   (the heuristic variant of the original, tightened into a hard check);
//! - randomized-graph BFS from one side to the opposite side, which spans by
//!   construction and is extended to the exact word length.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{is_border, spans_opposite_sides, CELL_COUNT, COLS, ROWS};
use crate::path::{bfs_span, find_path, SpanAxis};
use crate::strategy::Strategy;

/// Places the spangram on an empty grid, returning its path.
///
/// Makes up to `max_attempts` tries, each with a fresh strategy, start cell
/// and randomization; every third try uses the BFS spanning search. Returns
/// `None` when the budget is exhausted, which abandons the whole generation
/// attempt.
pub fn place<R: Rng>(
    rng: &mut R,
    occupied: u64,
    len: usize,
    max_attempts: usize,
    max_steps: usize,
) -> Option<Vec<usize>> {
    if len < COLS as usize || len > CELL_COUNT {
        return None;
    }

    for attempt in 0..max_attempts {
        let path = if attempt % 3 == 2 {
            let axis = pick_axis(rng, len);
            bfs_span(rng, occupied, len, axis, max_steps)
        } else {
            dfs_try(rng, occupied, len, max_steps)
        };
        if let Some(path) = path {
            return Some(path);
        }
    }
    None
}

/// One strategy-biased DFS try, kept only when the result spans.
fn dfs_try<R: Rng>(rng: &mut R, occupied: u64, len: usize, max_steps: usize) -> Option<Vec<usize>> {
    let strategy = Strategy::random(rng);
    let start = border_start(rng, strategy, occupied)?;
    let path = find_path(rng, occupied, start, len, strategy, max_steps)?;
    spans_opposite_sides(&path).then_some(path)
}

/// Strategy start cell, constrained to the border.
///
/// A spanning path must touch the border anyway, and border starts make the
/// spanning check succeed far more often.
fn border_start<R: Rng>(rng: &mut R, strategy: Strategy, occupied: u64) -> Option<usize> {
    for _ in 0..8 {
        let cell = strategy.start_cell(rng, occupied)?;
        if is_border(cell) {
            return Some(cell);
        }
    }
    // strategy kept proposing interior cells; take any free border cell
    crate::grid::free_cells(occupied)
        .into_iter()
        .filter(|&i| is_border(i))
        .collect::<Vec<_>>()
        .choose(rng)
        .copied()
}

/// Chooses which pair of opposite sides to span.
///
/// Column spans need 6 cells, row spans 8; when the word is long enough for
/// either, pick one at random.
fn pick_axis<R: Rng>(rng: &mut R, len: usize) -> SpanAxis {
    if len >= ROWS as usize && rng.gen_bool(0.5) {
        SpanAxis::Rows
    } else {
        SpanAxis::Cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::is_valid_path;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const STEPS: usize = 50_000;

    #[test]
    fn test_place_spans_for_all_lengths() {
        let mut rng = StdRng::seed_from_u64(17);
        for len in [6, 7, 9, 12, 15] {
            let path = place(&mut rng, 0, len, 200, STEPS)
                .unwrap_or_else(|| panic!("no spangram of {len} cells"));
            assert_eq!(path.len(), len);
            assert!(is_valid_path(&path));
            assert!(spans_opposite_sides(&path), "{len}-cell path does not span");
        }
    }

    #[test]
    fn test_place_rejects_unspannable_length() {
        let mut rng = StdRng::seed_from_u64(17);
        // 5 cells cannot touch two opposite sides of a 6-wide grid
        assert!(place(&mut rng, 0, 5, 200, STEPS).is_none());
    }

    #[test]
    fn test_place_starts_on_border() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..10 {
            let path = place(&mut rng, 0, 8, 200, STEPS).expect("8-cell spangram");
            assert!(is_border(path[0]), "spangram start {} is interior", path[0]);
        }
    }
}
