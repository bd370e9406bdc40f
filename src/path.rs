//! Path search primitives over the 8-connected grid graph.
//!
//! Three searches back the packing engine:
//! - [`find_path`]: depth-first search with backtracking that grows a simple
//!   path to an exact length, with the direction try-order supplied by a
//!   [`Strategy`].
//! - [`bfs_span`]: breadth-first search across randomized adjacency from one
//!   border side to the opposite side, yielding a guaranteed spanning path
//!   that is then extended to the exact target length.
//! - [`longest_path`]: best-effort longest simple path under a wall-clock
//!   deadline, used by the subset-sum fallback placer.

use std::time::Instant;

use rand::Rng;

use crate::grid::{idx_to_pos, in_bounds, pos_to_idx, CELL_COUNT, COLS, ROWS};
use crate::strategy::Strategy;

/// Which pair of opposite grid sides a spanning path must connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanAxis {
    /// Top row to bottom row (8 cells minimum).
    Rows,
    /// Leftmost column to rightmost column (6 cells minimum).
    Cols,
}

impl SpanAxis {
    /// Minimum number of cells any path spanning this axis must contain.
    pub fn min_len(self) -> usize {
        match self {
            SpanAxis::Rows => ROWS as usize,
            SpanAxis::Cols => COLS as usize,
        }
    }
}

/// Grows a simple path of exactly `len` cells starting at `start`.
///
/// Cells set in `occupied` are never entered, the path never self-intersects,
/// and each step's candidate directions are ordered by `strategy`. The search
/// gives up after `max_steps` node expansions so pathological inputs (long
/// words on nearly-full grids) terminate promptly; the caller retries with
/// fresh randomization instead.
pub fn find_path<R: Rng>(
    rng: &mut R,
    occupied: u64,
    start: usize,
    len: usize,
    strategy: Strategy,
    max_steps: usize,
) -> Option<Vec<usize>> {
    if len == 0 || len > CELL_COUNT || occupied & (1 << start) != 0 {
        return None;
    }
    let mut path = vec![start];
    let mut visited = occupied | (1 << start);
    let mut steps = max_steps;
    if grow(rng, &mut visited, &mut path, len, strategy, &mut steps) {
        Some(path)
    } else {
        None
    }
}

/// Extends an existing simple path to exactly `len` cells.
///
/// `occupied` must already include the path's own cells. Restores the path
/// to its original length on failure.
pub fn extend_path<R: Rng>(
    rng: &mut R,
    occupied: u64,
    path: &mut Vec<usize>,
    len: usize,
    strategy: Strategy,
    max_steps: usize,
) -> bool {
    if path.is_empty() || path.len() > len {
        return false;
    }
    let original = path.len();
    let mut visited = occupied;
    let mut steps = max_steps;
    if grow(rng, &mut visited, path, len, strategy, &mut steps) {
        true
    } else {
        path.truncate(original);
        false
    }
}

/// Recursive DFS step: mark on entry, unmark on exit.
fn grow<R: Rng>(
    rng: &mut R,
    visited: &mut u64,
    path: &mut Vec<usize>,
    len: usize,
    strategy: Strategy,
    steps: &mut usize,
) -> bool {
    if path.len() == len {
        return true;
    }
    if *steps == 0 {
        return false;
    }
    *steps -= 1;

    let current = *path.last().expect("path is seeded with a start cell");
    let start = idx_to_pos(path[0]);
    let pos = idx_to_pos(current);
    let order = strategy.direction_order(rng, start, pos, path.len() - 1);

    for (dr, dc) in order {
        let (nr, nc) = (pos.0 + dr, pos.1 + dc);
        if !in_bounds(nr, nc) {
            continue;
        }
        let next = pos_to_idx(nr, nc);
        if *visited & (1 << next) != 0 {
            continue;
        }
        *visited |= 1 << next;
        path.push(next);
        if grow(rng, visited, path, len, strategy, steps) {
            return true;
        }
        path.pop();
        *visited &= !(1 << next);
    }
    false
}

/// Finds a path of exactly `len` cells that genuinely spans the grid.
///
/// Models the free cells as an 8-adjacency graph with each diagonal edge
/// independently dropped with probability 1/2 (varying the connectivity
/// between calls), then runs breadth-first search from every free cell on one
/// side of `axis` until the opposite side is reached. The resulting shortest
/// spanning path is extended by DFS to the exact target length; since
/// extension only appends cells, the span guarantee is preserved.
pub fn bfs_span<R: Rng>(
    rng: &mut R,
    occupied: u64,
    len: usize,
    axis: SpanAxis,
    max_steps: usize,
) -> Option<Vec<usize>> {
    if len < axis.min_len() {
        return None;
    }

    // randomized adjacency: cardinal edges always kept, diagonals coin-flipped
    // each undirected edge is decided once, from its lower-indexed endpoint
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); CELL_COUNT];
    for idx in 0..CELL_COUNT {
        let (row, col) = idx_to_pos(idx);
        for (dr, dc) in crate::strategy::DIRECTIONS {
            let (nr, nc) = (row + dr, col + dc);
            if !in_bounds(nr, nc) {
                continue;
            }
            let next = pos_to_idx(nr, nc);
            if idx >= next {
                continue;
            }
            let diagonal = dr != 0 && dc != 0;
            if diagonal && rng.gen_bool(0.5) {
                continue;
            }
            adjacency[idx].push(next);
            adjacency[next].push(idx);
        }
    }

    let on_near_side = |idx: usize| match axis {
        SpanAxis::Rows => idx_to_pos(idx).0 == 0,
        SpanAxis::Cols => idx_to_pos(idx).1 == 0,
    };
    let on_far_side = |idx: usize| match axis {
        SpanAxis::Rows => idx_to_pos(idx).0 == ROWS - 1,
        SpanAxis::Cols => idx_to_pos(idx).1 == COLS - 1,
    };

    let mut parent: Vec<Option<usize>> = vec![None; CELL_COUNT];
    let mut seen = occupied;
    let mut queue = std::collections::VecDeque::new();
    for idx in 0..CELL_COUNT {
        if on_near_side(idx) && occupied & (1 << idx) == 0 {
            seen |= 1 << idx;
            queue.push_back(idx);
        }
    }

    let mut reached = None;
    'search: while let Some(idx) = queue.pop_front() {
        for &next in &adjacency[idx] {
            if seen & (1 << next) != 0 {
                continue;
            }
            seen |= 1 << next;
            parent[next] = Some(idx);
            if on_far_side(next) {
                reached = Some(next);
                break 'search;
            }
            queue.push_back(next);
        }
    }

    let mut cursor = reached?;
    let mut path = vec![cursor];
    while let Some(prev) = parent[cursor] {
        path.push(prev);
        cursor = prev;
    }
    path.reverse();

    if path.len() > len {
        return None;
    }
    let mut path_mask = occupied;
    for &idx in &path {
        path_mask |= 1 << idx;
    }
    if extend_path(rng, path_mask, &mut path, len, Strategy::RandomWalk, max_steps) {
        Some(path)
    } else {
        None
    }
}

/// Finds the longest simple path from `start` through free cells, up to
/// `max_len` cells, abandoning the search when `deadline` passes.
///
/// The deadline is checked on every node expansion, so the search is a
/// cooperative cancellation point: on expiry the best path found so far is
/// returned rather than an error.
pub fn longest_path(
    occupied: u64,
    start: usize,
    max_len: usize,
    deadline: Instant,
) -> Vec<usize> {
    if max_len == 0 || occupied & (1 << start) != 0 {
        return Vec::new();
    }
    let mut best = vec![start];
    let mut path = vec![start];
    let mut visited = occupied | (1 << start);
    longest_step(&mut visited, &mut path, &mut best, max_len, deadline);
    best
}

fn longest_step(
    visited: &mut u64,
    path: &mut Vec<usize>,
    best: &mut Vec<usize>,
    max_len: usize,
    deadline: Instant,
) -> bool {
    if path.len() > best.len() {
        *best = path.clone();
    }
    if best.len() == max_len || Instant::now() >= deadline {
        // either nothing longer is wanted or time is up
        return best.len() == max_len;
    }

    let pos = idx_to_pos(*path.last().expect("path is non-empty"));
    for (dr, dc) in crate::strategy::DIRECTIONS {
        let (nr, nc) = (pos.0 + dr, pos.1 + dc);
        if !in_bounds(nr, nc) {
            continue;
        }
        let next = pos_to_idx(nr, nc);
        if *visited & (1 << next) != 0 {
            continue;
        }
        *visited |= 1 << next;
        path.push(next);
        let done = longest_step(visited, path, best, max_len, deadline);
        path.pop();
        *visited &= !(1 << next);
        if done {
            return true;
        }
    }
    false
}
