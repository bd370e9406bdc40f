//! Gap filling: assigning letters to the cells no word path claimed.
//!
//! Letters come from the leftover pool when placement intentionally left
//! some aside (the subset-sum fallback), or from random a-z filler when the
//! pool is empty. Gaps are filled in isolation order: cells with fewer
//! already-filled neighbors first.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::grid::{free_cells, free_neighbor_count, neighbors, Grid};

/// Bookkeeping mismatch between leftover letters and uncovered cells.
///
/// Cannot occur with correct bookkeeping upstream; treated as a bug signal
/// that fails the attempt.
#[derive(Debug, Error)]
#[error("gap count {gaps} does not match leftover letter count {letters}")]
pub struct FillError {
    pub gaps: usize,
    pub letters: usize,
}

/// Fills every free cell with a letter.
///
/// A non-empty pool must match the gap count exactly and is consumed in
/// isolation order after shuffling; an empty pool means random filler
/// letters. Returns the updated occupancy mask.
pub fn fill_gaps<R: Rng>(
    rng: &mut R,
    grid: &mut Grid,
    occupied: u64,
    mut pool: Vec<char>,
) -> Result<u64, FillError> {
    let mut gaps = free_cells(occupied);
    if !pool.is_empty() && pool.len() != gaps.len() {
        return Err(FillError {
            gaps: gaps.len(),
            letters: pool.len(),
        });
    }

    // fewest filled neighbors first
    gaps.sort_by_key(|&idx| {
        let free = free_neighbor_count(occupied, idx);
        neighbors(idx).count() - free
    });
    pool.shuffle(rng);

    let mut updated = occupied;
    for idx in gaps {
        let letter = pool
            .pop()
            .unwrap_or_else(|| (b'a' + rng.gen_range(0..26)) as char);
        grid.set(idx, letter);
        updated |= 1 << idx;
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{pos_to_idx, ALL_CELLS_FILLED, CELL_COUNT};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pool_matching_gaps_is_consumed() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut grid = Grid::new();
        let mut occupied = ALL_CELLS_FILLED;
        for idx in [pos_to_idx(0, 0), pos_to_idx(4, 3), pos_to_idx(7, 5)] {
            occupied &= !(1 << idx);
        }

        let updated = fill_gaps(&mut rng, &mut grid, occupied, vec!['x', 'y', 'z']).unwrap();
        assert_eq!(updated, ALL_CELLS_FILLED);
        let mut letters: Vec<char> = [pos_to_idx(0, 0), pos_to_idx(4, 3), pos_to_idx(7, 5)]
            .iter()
            .map(|&idx| grid.letter(idx).unwrap())
            .collect();
        letters.sort();
        assert_eq!(letters, vec!['x', 'y', 'z']);
    }

    #[test]
    fn test_empty_pool_uses_random_filler() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut grid = Grid::new();
        let updated = fill_gaps(&mut rng, &mut grid, 0, Vec::new()).unwrap();
        assert_eq!(updated, ALL_CELLS_FILLED);
        assert_eq!(grid.filled_count(), CELL_COUNT);
        for idx in 0..CELL_COUNT {
            assert!(grid.letter(idx).unwrap().is_ascii_lowercase());
        }
    }

    #[test]
    fn test_mismatched_pool_is_an_error() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut grid = Grid::new();
        let occupied = ALL_CELLS_FILLED & !(1 << 5);

        let err = fill_gaps(&mut rng, &mut grid, occupied, vec!['a', 'b']).unwrap_err();
        assert_eq!(err.gaps, 1);
        assert_eq!(err.letters, 2);
    }

    #[test]
    fn test_no_gaps_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut grid = Grid::new();
        let updated = fill_gaps(&mut rng, &mut grid, ALL_CELLS_FILLED, Vec::new()).unwrap();
        assert_eq!(updated, ALL_CELLS_FILLED);
        assert_eq!(grid.filled_count(), 0);
    }
}
