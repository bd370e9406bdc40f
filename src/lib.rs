//! Strands Puzzle Grid Generator Library
//!
//! Turns a themed word list into a fully covered 8x6 letter grid for a
//! Strands-style word search. The first word is the spangram and must span
//! the grid edge to edge; every word becomes a simple path of 8-adjacent
//! cells, and all 48 cells are used exactly once.

pub mod engine;
pub mod fill;
pub mod grid;
pub mod path;
pub mod place;
pub mod spangram;
pub mod strategy;
pub mod words;

pub use engine::{generate, Generator, GeneratorConfig, PuzzleResult};
pub use grid::{Cell, Grid};
pub use place::Placement;
pub use strategy::Strategy;
pub use words::{validate, PuzzleInput, Validation};
