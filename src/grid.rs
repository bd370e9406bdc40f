//! Grid representation and operations for the letter grid.
//!
//! The grid is fixed at 8 rows by 6 columns (48 cells). Cells are addressed
//! either by `(row, col)` position or by a flat index, and occupancy is
//! tracked as a `u64` bitmask where bit `i` is set when cell `i` holds a
//! letter.

use serde::{Deserialize, Serialize};

/// Number of rows in the grid.
pub const ROWS: i32 = 8;

/// Number of columns in the grid.
pub const COLS: i32 = 6;

/// Total number of cells in the grid.
pub const CELL_COUNT: usize = (ROWS * COLS) as usize;

/// Bitmask with all 48 cells occupied (lowest 48 bits set).
///
/// Bit 0 corresponds to cell index 0 (position (0, 0) via `pos_to_idx`).
pub const ALL_CELLS_FILLED: u64 = (1 << CELL_COUNT) - 1;

/// A grid position as a (row, column) pair.
pub type Pos = (i32, i32);

/// Converts a (row, column) position to a linear cell index.
///
/// Index order is row-major: `idx = row * COLS + col`.
#[inline(always)]
pub const fn pos_to_idx(row: i32, col: i32) -> usize {
    (row * COLS + col) as usize
}

/// Converts a linear cell index to a (row, column) position.
#[inline(always)]
pub const fn idx_to_pos(cell_index: usize) -> Pos {
    (cell_index as i32 / COLS, cell_index as i32 % COLS)
}

/// Returns true when the position lies inside the grid.
#[inline(always)]
pub const fn in_bounds(row: i32, col: i32) -> bool {
    row >= 0 && row < ROWS && col >= 0 && col < COLS
}

/// Returns true when the cell lies on the outer border of the grid.
#[inline(always)]
pub const fn is_border(cell_index: usize) -> bool {
    let (row, col) = idx_to_pos(cell_index);
    row == 0 || row == ROWS - 1 || col == 0 || col == COLS - 1
}

/// Returns true when two positions are 8-directionally adjacent.
///
/// Row and column each differ by at most one, and the positions differ.
#[inline]
pub fn adjacent(a: Pos, b: Pos) -> bool {
    a != b && (a.0 - b.0).abs() <= 1 && (a.1 - b.1).abs() <= 1
}

/// Iterates the in-bounds 8-neighbors of a cell.
pub fn neighbors(cell_index: usize) -> impl Iterator<Item = usize> {
    let (row, col) = idx_to_pos(cell_index);
    crate::strategy::DIRECTIONS.iter().filter_map(move |&(dr, dc)| {
        let (nr, nc) = (row + dr, col + dc);
        in_bounds(nr, nc).then(|| pos_to_idx(nr, nc))
    })
}

/// Counts the free 8-neighbors of a cell under the given occupancy mask.
pub fn free_neighbor_count(occupied: u64, cell_index: usize) -> usize {
    neighbors(cell_index)
        .filter(|&n| occupied & (1 << n) == 0)
        .count()
}

/// Collects all free cell indices under the given occupancy mask.
pub fn free_cells(occupied: u64) -> Vec<usize> {
    (0..CELL_COUNT).filter(|&i| occupied & (1 << i) == 0).collect()
}

/// A single finished grid cell: one letter plus the spangram flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub letter: char,
    pub is_spangram: bool,
}

/// The letter grid built up during one generation attempt.
///
/// Letters are written once per cell; the spangram bitmask marks the cells
/// belonging to the spangram path. A fresh grid is allocated per attempt and
/// never reused across attempts.
#[derive(Debug, Clone)]
pub struct Grid {
    letters: [Option<char>; CELL_COUNT],
    spangram: u64,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Creates an empty grid: no letters, no spangram flags.
    pub fn new() -> Self {
        Self {
            letters: [None; CELL_COUNT],
            spangram: 0,
        }
    }

    /// Writes a letter into a cell.
    pub fn set(&mut self, cell_index: usize, letter: char) {
        self.letters[cell_index] = Some(letter);
    }

    /// Flags a cell as part of the spangram path.
    pub fn mark_spangram(&mut self, cell_index: usize) {
        self.spangram |= 1 << cell_index;
    }

    /// Returns the letter in a cell, if any.
    pub fn letter(&self, cell_index: usize) -> Option<char> {
        self.letters[cell_index]
    }

    /// Returns true when the cell belongs to the spangram path.
    pub fn is_spangram(&self, cell_index: usize) -> bool {
        self.spangram & (1 << cell_index) != 0
    }

    /// Bitmask of the cells flagged as spangram.
    pub fn spangram_mask(&self) -> u64 {
        self.spangram
    }

    /// Number of cells holding a letter.
    pub fn filled_count(&self) -> usize {
        self.letters.iter().filter(|l| l.is_some()).count()
    }

    /// Converts the grid into output rows of [`Cell`]s.
    ///
    /// Empty cells become spaces; only meaningful for placeholder grids
    /// returned alongside errors.
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        (0..ROWS)
            .map(|row| {
                (0..COLS)
                    .map(|col| {
                        let idx = pos_to_idx(row, col);
                        Cell {
                            letter: self.letters[idx].unwrap_or(' '),
                            is_spangram: self.is_spangram(idx),
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Returns true when the path is a simple path of 8-adjacent cells.
///
/// Every consecutive pair must be adjacent and no cell may repeat.
pub fn is_valid_path(path: &[usize]) -> bool {
    if path.is_empty() || path.iter().any(|&i| i >= CELL_COUNT) {
        return false;
    }
    let mut seen = 0u64;
    for &idx in path {
        if seen & (1 << idx) != 0 {
            return false;
        }
        seen |= 1 << idx;
    }
    path.windows(2)
        .all(|pair| adjacent(idx_to_pos(pair[0]), idx_to_pos(pair[1])))
}

/// Returns true when the path's letters in the grid spell the word.
pub fn path_spells(grid: &Grid, path: &[usize], word: &str) -> bool {
    let letters: Vec<char> = word.chars().collect();
    path.len() == letters.len()
        && path
            .iter()
            .zip(&letters)
            .all(|(&idx, &ch)| grid.letter(idx) == Some(ch))
}

/// Returns true when the path touches two opposite sides of the grid.
///
/// Either the top and bottom rows or the leftmost and rightmost columns;
/// this is the spanning contract the spangram must satisfy.
pub fn spans_opposite_sides(path: &[usize]) -> bool {
    let rows: Vec<i32> = path.iter().map(|&i| idx_to_pos(i).0).collect();
    let cols: Vec<i32> = path.iter().map(|&i| idx_to_pos(i).1).collect();
    let spans_rows = rows.contains(&0) && rows.contains(&(ROWS - 1));
    let spans_cols = cols.contains(&0) && cols.contains(&(COLS - 1));
    spans_rows || spans_cols
}

/// Formats the grid as text: one line per row, `.` for empty cells,
/// lowercase letters, spangram cells uppercase.
pub fn format_grid(grid: &Grid) -> String {
    let mut output = String::new();
    for row in 0..ROWS {
        for col in 0..COLS {
            let idx = pos_to_idx(row, col);
            let display_char = match grid.letter(idx) {
                None => '.',
                Some(ch) if grid.is_spangram(idx) => ch.to_ascii_uppercase(),
                Some(ch) => ch,
            };
            output.push(display_char);
        }
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_conversion_roundtrip() {
        for idx in 0..CELL_COUNT {
            let (row, col) = idx_to_pos(idx);
            assert!(in_bounds(row, col), "idx_to_pos({idx}) out of bounds");
            let recovered = pos_to_idx(row, col);
            assert_eq!(recovered, idx, "Roundtrip failed for index {idx}");
        }
    }

    #[test]
    fn test_neighbor_counts() {
        // corner has 3 neighbors, edge 5, interior 8
        assert_eq!(neighbors(pos_to_idx(0, 0)).count(), 3);
        assert_eq!(neighbors(pos_to_idx(0, 2)).count(), 5);
        assert_eq!(neighbors(pos_to_idx(3, 2)).count(), 8);
        assert_eq!(neighbors(pos_to_idx(7, 5)).count(), 3);
    }

    #[test]
    fn test_border_classification() {
        assert!(is_border(pos_to_idx(0, 3)));
        assert!(is_border(pos_to_idx(4, 0)));
        assert!(is_border(pos_to_idx(7, 5)));
        assert!(!is_border(pos_to_idx(3, 2)));
    }

    #[test]
    fn test_path_validity() {
        // diagonal run from (0,0)
        let diagonal: Vec<usize> = (0..4).map(|i| pos_to_idx(i, i)).collect();
        assert!(is_valid_path(&diagonal));

        // repeated cell is invalid
        let repeated = vec![pos_to_idx(0, 0), pos_to_idx(0, 1), pos_to_idx(0, 0)];
        assert!(!is_valid_path(&repeated));

        // gap between cells is invalid
        let gapped = vec![pos_to_idx(0, 0), pos_to_idx(0, 2)];
        assert!(!is_valid_path(&gapped));
    }

    #[test]
    fn test_path_spelling() {
        let mut grid = Grid::new();
        let path = vec![pos_to_idx(2, 1), pos_to_idx(3, 2), pos_to_idx(3, 3)];
        for (&idx, ch) in path.iter().zip("sun".chars()) {
            grid.set(idx, ch);
        }
        assert!(path_spells(&grid, &path, "sun"));
        assert!(!path_spells(&grid, &path, "sum"));
        assert!(!path_spells(&grid, &path, "su"));
    }

    #[test]
    fn test_spanning_detection() {
        let column: Vec<usize> = (0..ROWS).map(|r| pos_to_idx(r, 2)).collect();
        assert!(spans_opposite_sides(&column));

        let row: Vec<usize> = (0..COLS).map(|c| pos_to_idx(3, c)).collect();
        assert!(spans_opposite_sides(&row));

        let short = vec![pos_to_idx(2, 2), pos_to_idx(3, 3)];
        assert!(!spans_opposite_sides(&short));
    }

    #[test]
    fn test_filled_count_and_flags() {
        let mut grid = Grid::new();
        grid.set(0, 'a');
        grid.set(7, 'b');
        grid.mark_spangram(7);
        assert_eq!(grid.filled_count(), 2);
        assert!(grid.is_spangram(7));
        assert!(!grid.is_spangram(0));
        assert_eq!(grid.spangram_mask(), 1 << 7);
    }
}
