//! Placement of the non-spangram words into the free cells.
//!
//! The primary placer routes each word through a rotating [`Strategy`] with
//! varied start-cell bias, and prunes candidate paths that would strand a
//! free region no combination of the remaining word lengths can fill. The
//! fallback placer partitions the words into two near-equal-letter halves by
//! subset-sum dynamic programming and maps each half onto the longest free
//! path found under a wall-clock deadline, spilling excess letters into the
//! gap-fill pool.

use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::grid::{free_cells, idx_to_pos, neighbors, pos_to_idx, Grid, Pos, CELL_COUNT};
use crate::path::{find_path, longest_path};
use crate::strategy::{most_isolated, Strategy};

/// A word successfully placed on the grid, with its path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub word: String,
    /// Path positions in word order.
    pub path: Vec<Pos>,
    pub is_spangram: bool,
}

impl Placement {
    /// Builds a placement from a cell-index path.
    pub fn from_cells(word: &str, cells: &[usize], is_spangram: bool) -> Self {
        Self {
            word: word.to_string(),
            path: cells.iter().map(|&i| idx_to_pos(i)).collect(),
            is_spangram,
        }
    }

    /// The path as cell indices.
    pub fn cells(&self) -> Vec<usize> {
        self.path.iter().map(|&(r, c)| pos_to_idx(r, c)).collect()
    }
}

/// A single placement failure; abandons the whole generation attempt.
#[derive(Debug, Error)]
pub enum PlaceError {
    #[error("could not place word '{0}'")]
    WordExhausted(String),
    #[error("no free cell left to start a path from")]
    NoFreeStart,
}

/// Places every word as a path, writing letters into the grid.
///
/// Words are placed longest-first. Each word gets its own strategy from the
/// rotation and up to `attempts_per_word` tries; start cells alternate
/// between the strategy's bias, the most isolated free cell and a uniform
/// random free cell. A candidate is committed only when the free regions it
/// leaves behind remain fillable by the remaining word lengths.
pub fn place_words<R: Rng>(
    rng: &mut R,
    grid: &mut Grid,
    occupied: &mut u64,
    words: &[String],
    attempts_per_word: usize,
    max_steps: usize,
) -> Result<Vec<Placement>, PlaceError> {
    let mut ordered: Vec<&String> = words.iter().collect();
    ordered.sort_by_key(|w| std::cmp::Reverse(w.len()));

    let rotation_base = rng.gen_range(0..Strategy::ALL.len());
    let mut placements = Vec::with_capacity(ordered.len());

    for (word_index, word) in ordered.iter().enumerate() {
        let strategy = Strategy::ALL[(rotation_base + word_index) % Strategy::ALL.len()];
        let remaining: Vec<usize> = ordered[word_index + 1..].iter().map(|w| w.len()).collect();

        // starts whose DFS came up empty; pointless to revisit this attempt
        let mut dead_starts: FxHashSet<usize> = FxHashSet::default();
        let mut placed = false;

        for attempt in 0..attempts_per_word {
            let start = match attempt % 3 {
                0 => strategy.start_cell(rng, *occupied),
                1 => most_isolated(rng, *occupied),
                _ => free_cells(*occupied).choose(rng).copied(),
            };
            let Some(start) = start else {
                return Err(PlaceError::NoFreeStart);
            };
            if dead_starts.contains(&start) {
                continue;
            }

            let Some(path) = find_path(rng, *occupied, start, word.len(), strategy, max_steps)
            else {
                dead_starts.insert(start);
                continue;
            };

            let mask: u64 = path.iter().fold(0, |m, &i| m | (1 << i));
            if !regions_feasible(*occupied | mask, &remaining) {
                trace!(word = %word, "candidate path strands an unfillable region");
                continue;
            }

            for (&idx, ch) in path.iter().zip(word.chars()) {
                grid.set(idx, ch);
            }
            *occupied |= mask;
            placements.push(Placement::from_cells(word, &path, false));
            placed = true;
            break;
        }

        if !placed {
            return Err(PlaceError::WordExhausted(word.to_string()));
        }
    }

    Ok(placements)
}

/// Fallback placer: subset-sum partition plus longest-path mapping.
///
/// Splits the words into two groups whose letter counts are as close to
/// equal as the lengths allow, finds the longest free path for each group
/// within half the deadline, and lays the group's concatenated letters along
/// it. Letters past the end of a too-short path are returned as the leftover
/// pool; every word that landed fully on a path is recorded as a placement.
pub fn place_partitioned<R: Rng>(
    rng: &mut R,
    grid: &mut Grid,
    occupied: &mut u64,
    words: &[String],
    deadline: Instant,
) -> Result<(Vec<Placement>, Vec<char>), PlaceError> {
    if words.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let lens: Vec<usize> = words.iter().map(String::len).collect();
    let total: usize = lens.iter().sum();
    let target = closest_reachable_sum(&lens, total / 2);
    let chosen = subset_sum(&lens, target).expect("closest reachable sum must be recoverable");

    let in_first: Vec<bool> = {
        let mut flags = vec![false; words.len()];
        for &i in &chosen {
            flags[i] = true;
        }
        flags
    };
    let first: Vec<&String> = words.iter().enumerate().filter(|(i, _)| in_first[*i]).map(|(_, w)| w).collect();
    let second: Vec<&String> = words.iter().enumerate().filter(|(i, _)| !in_first[*i]).map(|(_, w)| w).collect();

    let half = (deadline - Instant::now()) / 2;
    let mut placements = Vec::new();
    let mut pool = Vec::new();
    for (group, group_deadline) in [(first, Instant::now() + half), (second, deadline)] {
        lay_group(rng, grid, occupied, &group, group_deadline, &mut placements, &mut pool)?;
    }
    Ok((placements, pool))
}

/// Lays one word group's letters along the longest path available.
///
/// The search is bounded by the deadline rather than a node budget.
fn lay_group<R: Rng>(
    rng: &mut R,
    grid: &mut Grid,
    occupied: &mut u64,
    group: &[&String],
    deadline: Instant,
    placements: &mut Vec<Placement>,
    pool: &mut Vec<char>,
) -> Result<(), PlaceError> {
    let letters: Vec<char> = group.iter().flat_map(|w| w.chars()).collect();
    if letters.is_empty() {
        return Ok(());
    }

    let start = most_isolated(rng, *occupied).ok_or(PlaceError::NoFreeStart)?;
    let path = longest_path(*occupied, start, letters.len(), deadline);

    for (&idx, &ch) in path.iter().zip(&letters) {
        grid.set(idx, ch);
        *occupied |= 1 << idx;
    }
    pool.extend(letters.iter().skip(path.len()).copied());

    // words fully on the path remain findable as contiguous subpaths
    let mut offset = 0;
    for word in group {
        if offset + word.len() <= path.len() {
            placements.push(Placement::from_cells(
                word,
                &path[offset..offset + word.len()],
                false,
            ));
        }
        offset += word.len();
    }
    Ok(())
}

/// Solves 0/1 subset-sum, returning the indices of a subset of `lens`
/// summing exactly to `target`, or `None` when unreachable.
///
/// Standard tabulation over words x target with backtracking to recover the
/// chosen subset.
pub fn subset_sum(lens: &[usize], target: usize) -> Option<Vec<usize>> {
    let mut reach = vec![vec![false; target + 1]; lens.len() + 1];
    reach[0][0] = true;
    for (i, &len) in lens.iter().enumerate() {
        for t in 0..=target {
            if reach[i][t] {
                reach[i + 1][t] = true;
                if t + len <= target {
                    reach[i + 1][t + len] = true;
                }
            }
        }
    }
    if !reach[lens.len()][target] {
        return None;
    }

    let mut chosen = Vec::new();
    let mut t = target;
    for i in (0..lens.len()).rev() {
        if !reach[i][t] {
            // the sum is only reachable by taking item i
            chosen.push(i);
            t -= lens[i];
        }
    }
    chosen.reverse();
    Some(chosen)
}

/// The reachable subset sum closest to `target` (ties broken downward).
fn closest_reachable_sum(lens: &[usize], target: usize) -> usize {
    let cap: usize = lens.iter().sum();
    let mut reach = vec![false; cap + 1];
    reach[0] = true;
    for &len in lens {
        for t in (len..=cap).rev() {
            if reach[t - len] {
                reach[t] = true;
            }
        }
    }
    (0..=cap)
        .filter(|&t| reach[t])
        .min_by_key(|&t| (target.abs_diff(t), t > target))
        .expect("sum 0 is always reachable")
}

/// Sizes of the 8-connected free regions under the occupancy mask.
pub fn region_sizes(occupied: u64) -> Vec<usize> {
    let mut seen = occupied;
    let mut sizes = Vec::new();
    for cell in 0..CELL_COUNT {
        if seen & (1 << cell) != 0 {
            continue;
        }
        let mut size = 0;
        let mut stack = vec![cell];
        seen |= 1 << cell;
        while let Some(idx) = stack.pop() {
            size += 1;
            for n in neighbors(idx) {
                if seen & (1 << n) == 0 {
                    seen |= 1 << n;
                    stack.push(n);
                }
            }
        }
        sizes.push(size);
    }
    sizes
}

/// Checks that every free region's size is a sum some subset of the
/// remaining word lengths can reach.
///
/// A necessary condition for the remaining words to tile the free cells;
/// candidate placements failing it are doomed and rejected early.
pub fn regions_feasible(occupied: u64, remaining: &[usize]) -> bool {
    let cap: usize = remaining.iter().sum();
    let mut reach = vec![false; cap + 1];
    reach[0] = true;
    for &len in remaining {
        for t in (len..=cap).rev() {
            if reach[t - len] {
                reach[t] = true;
            }
        }
    }
    region_sizes(occupied)
        .iter()
        .all(|&size| size <= cap && reach[size])
}
