//! Generation engine: attempt controller, verification and result assembly.
//!
//! One generation call runs validation once, then up to a configured number
//! of fully independent packing attempts. Each attempt allocates a fresh
//! grid, places the spangram, places the remaining words, and verifies full
//! coverage; any sub-step failure discards the attempt entirely. When the
//! primary budget is exhausted, a bounded number of subset-sum fallback
//! attempts run before the terminal error is reported.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::fill::{fill_gaps, FillError};
use crate::grid::{
    self, Cell, Grid, ALL_CELLS_FILLED, CELL_COUNT,
};
use crate::path::find_path;
use crate::place::{place_partitioned, place_words, regions_feasible, PlaceError, Placement};
use crate::spangram;
use crate::strategy::Strategy;
use crate::words::{validate, PuzzleInput, MIN_SPANGRAM_LEN};

/// Terminal error when every attempt and fallback failed.
pub const UNABLE_MESSAGE: &str = "Unable to create varied grid with complete coverage.";

/// Terminal error when every failure was a bookkeeping violation, which
/// points at a generator bug rather than bad input.
pub const INTERNAL_ERROR_MESSAGE: &str =
    "Internal error: grid bookkeeping failed during generation.";

/// Why a single generation attempt was discarded.
///
/// All of these are handled internally by retrying; they surface to the
/// caller only when the whole retry budget is exhausted.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("could not place the spangram")]
    SpangramExhausted,
    #[error("spangram placement strands an unfillable region")]
    SpangramStranded,
    #[error(transparent)]
    Place(#[from] PlaceError),
    #[error(transparent)]
    Fill(#[from] FillError),
    #[error("only {filled} of 48 cells were covered")]
    Incomplete { filled: usize },
    #[error("verification failed: {0}")]
    Verification(String),
}

impl AttemptError {
    /// Failures that should not occur with correct bookkeeping.
    fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            AttemptError::Fill(_)
                | AttemptError::Incomplete { .. }
                | AttemptError::Verification(_)
        )
    }
}

/// Tunables for the generation engine.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Maximum independent packing attempts before the fallback runs.
    pub max_attempts: usize,
    /// Path-search tries for the spangram within one attempt.
    pub spangram_attempts: usize,
    /// Path-search tries per word within one attempt.
    pub word_attempts: usize,
    /// Node-expansion budget per path search.
    pub search_steps: usize,
    /// Whether a too-short spangram is a hard validation error.
    pub strict_spangram: bool,
    /// Whether to run the subset-sum fallback after the primary budget.
    pub fallback: bool,
    /// Maximum fallback attempts.
    pub fallback_attempts: usize,
    /// Wall-clock budget for each fallback longest-path search pair.
    pub fallback_deadline: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 150,
            spangram_attempts: 200,
            word_attempts: 200,
            search_steps: 50_000,
            strict_spangram: true,
            fallback: true,
            fallback_attempts: 8,
            fallback_deadline: Duration::from_secs(5),
        }
    }
}

/// The finished generation result.
///
/// `errors` non-empty means `grid` is a placeholder (all spaces) and
/// `placements` is empty. `placements` carries each word's path for callers
/// that render or verify solutions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleResult {
    pub grid: Vec<Vec<Cell>>,
    pub placements: Vec<Placement>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub letters_used: usize,
    pub spangram_remaining: usize,
}

/// One attempt's successful output before assembly.
struct Packed {
    grid: Grid,
    placements: Vec<Placement>,
}

/// The puzzle grid generator.
///
/// Holds only configuration and a random source; every generation call is
/// otherwise stateless and independent.
pub struct Generator {
    pub config: GeneratorConfig,
    rng: StdRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Creates a generator with default configuration and an entropy seed.
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a generator with a custom configuration.
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a generator with a specific seed for reproducibility.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates a puzzle grid from the input.
    ///
    /// Runs validation first; on hard errors the placement machinery never
    /// runs and a placeholder grid is returned with the errors. Otherwise
    /// retries independent attempts until one verifies, the fallback
    /// succeeds, or both budgets are exhausted.
    pub fn generate(&mut self, input: &PuzzleInput) -> PuzzleResult {
        let validation = validate(input, self.config.strict_spangram);
        if !validation.errors.is_empty() {
            return PuzzleResult {
                grid: Grid::new().to_rows(),
                placements: Vec::new(),
                errors: validation.errors,
                warnings: validation.warnings,
                letters_used: validation.letters_used,
                spangram_remaining: validation.spangram_remaining,
            };
        }

        let words = validation.words.clone();
        let mut failures = 0usize;
        let mut invariant_failures = 0usize;

        for attempt in 1..=self.config.max_attempts {
            match self.attempt(&words) {
                Ok(packed) => {
                    info!(attempt, "grid generated");
                    return assemble(packed, &validation);
                }
                Err(err) => {
                    debug!(attempt, %err, "attempt discarded");
                    failures += 1;
                    if err.is_invariant_violation() {
                        invariant_failures += 1;
                    }
                }
            }
        }

        if self.config.fallback {
            warn!(
                attempts = self.config.max_attempts,
                "primary placement exhausted, trying subset-sum fallback"
            );
            for attempt in 1..=self.config.fallback_attempts {
                match self.fallback_attempt(&words) {
                    Ok(packed) => {
                        info!(attempt, "grid generated by fallback");
                        return assemble(packed, &validation);
                    }
                    Err(err) => {
                        debug!(attempt, %err, "fallback attempt discarded");
                        failures += 1;
                        if err.is_invariant_violation() {
                            invariant_failures += 1;
                        }
                    }
                }
            }
        }

        let message = if failures > 0 && invariant_failures == failures {
            INTERNAL_ERROR_MESSAGE
        } else {
            UNABLE_MESSAGE
        };
        PuzzleResult {
            grid: Grid::new().to_rows(),
            placements: Vec::new(),
            errors: vec![message.to_string()],
            warnings: validation.warnings,
            letters_used: validation.letters_used,
            spangram_remaining: validation.spangram_remaining,
        }
    }

    /// One full independent packing attempt.
    fn attempt(&mut self, words: &[String]) -> Result<Packed, AttemptError> {
        let mut grid = Grid::new();
        let mut occupied = 0u64;

        let spangram_word = &words[0];
        let span_path = self
            .place_spangram(spangram_word.len())
            .ok_or(AttemptError::SpangramExhausted)?;
        for (&idx, ch) in span_path.iter().zip(spangram_word.chars()) {
            grid.set(idx, ch);
            grid.mark_spangram(idx);
            occupied |= 1 << idx;
        }

        let remaining: Vec<usize> = words[1..].iter().map(String::len).collect();
        if !regions_feasible(occupied, &remaining) {
            return Err(AttemptError::SpangramStranded);
        }

        let mut placements = vec![Placement::from_cells(spangram_word, &span_path, true)];
        placements.extend(place_words(
            &mut self.rng,
            &mut grid,
            &mut occupied,
            &words[1..],
            self.config.word_attempts,
            self.config.search_steps,
        )?);

        verify(&grid, occupied, &placements)?;
        Ok(Packed { grid, placements })
    }

    /// One subset-sum fallback attempt.
    ///
    /// Coverage is guaranteed structurally: letters not laid on a path spill
    /// into the gap-fill pool, whose size always matches the gap count.
    fn fallback_attempt(&mut self, words: &[String]) -> Result<Packed, AttemptError> {
        let mut grid = Grid::new();
        let mut occupied = 0u64;

        let spangram_word = &words[0];
        let span_path = self
            .place_spangram(spangram_word.len())
            .ok_or(AttemptError::SpangramExhausted)?;
        for (&idx, ch) in span_path.iter().zip(spangram_word.chars()) {
            grid.set(idx, ch);
            grid.mark_spangram(idx);
            occupied |= 1 << idx;
        }

        let deadline = Instant::now() + self.config.fallback_deadline;
        let (word_placements, pool) = place_partitioned(
            &mut self.rng,
            &mut grid,
            &mut occupied,
            &words[1..],
            deadline,
        )?;

        let mut placements = vec![Placement::from_cells(spangram_word, &span_path, true)];
        placements.extend(word_placements);

        occupied = fill_gaps(&mut self.rng, &mut grid, occupied, pool)?;
        verify(&grid, occupied, &placements)?;
        Ok(Packed { grid, placements })
    }

    /// Places the spangram path on an empty grid.
    ///
    /// Words long enough to span get the spanning placement; a shorter
    /// spangram (possible only with relaxed validation) is placed as an
    /// ordinary path.
    fn place_spangram(&mut self, len: usize) -> Option<Vec<usize>> {
        if len >= MIN_SPANGRAM_LEN {
            return spangram::place(
                &mut self.rng,
                0,
                len,
                self.config.spangram_attempts,
                self.config.search_steps,
            );
        }
        for _ in 0..self.config.spangram_attempts {
            let strategy = Strategy::random(&mut self.rng);
            let start = strategy.start_cell(&mut self.rng, 0)?;
            if let Some(path) =
                find_path(&mut self.rng, 0, start, len, strategy, self.config.search_steps)
            {
                return Some(path);
            }
        }
        None
    }
}

/// Convenience wrapper: one-shot generation with default configuration.
pub fn generate(input: &PuzzleInput) -> PuzzleResult {
    Generator::new().generate(input)
}

/// Checks every invariant a finished grid must satisfy.
fn verify(grid: &Grid, occupied: u64, placements: &[Placement]) -> Result<(), AttemptError> {
    if occupied != ALL_CELLS_FILLED || grid.filled_count() != CELL_COUNT {
        return Err(AttemptError::Incomplete {
            filled: grid.filled_count(),
        });
    }

    let mut spangram_mask = 0u64;
    for placement in placements {
        let cells = placement.cells();
        if !grid::is_valid_path(&cells) {
            return Err(AttemptError::Verification(format!(
                "'{}' is not a simple adjacent path",
                placement.word
            )));
        }
        if !grid::path_spells(grid, &cells, &placement.word) {
            return Err(AttemptError::Verification(format!(
                "path does not spell '{}'",
                placement.word
            )));
        }
        if placement.is_spangram {
            spangram_mask = cells.iter().fold(0, |m, &i| m | (1 << i));
            if placement.word.len() >= MIN_SPANGRAM_LEN
                && !grid::spans_opposite_sides(&cells)
            {
                return Err(AttemptError::Verification(
                    "spangram does not span opposite sides".to_string(),
                ));
            }
        }
    }
    if spangram_mask != grid.spangram_mask() {
        return Err(AttemptError::Verification(
            "spangram flags do not match the spangram path".to_string(),
        ));
    }
    Ok(())
}

/// Packages a verified grid with the validation diagnostics.
fn assemble(packed: Packed, validation: &crate::words::Validation) -> PuzzleResult {
    PuzzleResult {
        grid: packed.grid.to_rows(),
        placements: packed.placements,
        errors: Vec::new(),
        warnings: validation.warnings.clone(),
        letters_used: validation.letters_used,
        spangram_remaining: validation.spangram_remaining,
    }
}
