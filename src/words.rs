//! Puzzle input, word sanitization and validation.
//!
//! Validation is a pure function: the same input always yields the same
//! errors and warnings. Errors are hard failures (generation must not run);
//! warnings are cosmetic and generation proceeds.

use serde::{Deserialize, Serialize};

use crate::grid::CELL_COUNT;

/// Minimum number of letters the spangram must have.
pub const MIN_SPANGRAM_LEN: usize = 6;

/// Raw puzzle input as supplied by the caller.
///
/// Words may contain punctuation, whitespace and mixed case; the first word
/// is the spangram. Title, theme and author are metadata only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PuzzleInput {
    pub title: String,
    pub theme: String,
    pub author: String,
    pub words: Vec<String>,
}

/// Outcome of validating a [`PuzzleInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// Sanitized lowercase words, empty results discarded. Index 0 is the
    /// spangram when present.
    pub words: Vec<String>,
    /// Hard failures; non-empty means generation must not run.
    pub errors: Vec<String>,
    /// Soft, cosmetic findings; generation proceeds.
    pub warnings: Vec<String>,
    /// Total letters across the sanitized words.
    pub letters_used: usize,
    /// Letters still needed to reach the minimum spangram length, 0 when
    /// satisfied.
    pub spangram_remaining: usize,
    /// Human-readable letter-count feedback for the caller's UI.
    pub letters_feedback: String,
}

/// Strips non-alphabetic characters and lowercases a word.
///
/// Only ASCII letters survive; anything else (digits, punctuation,
/// whitespace, accented characters) is dropped.
pub fn sanitize(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Validates a puzzle input, sanitizing its words.
///
/// With `strict_spangram` a too-short spangram is an error; otherwise it is
/// only a warning. Letter count must equal the grid capacity exactly.
pub fn validate(input: &PuzzleInput, strict_spangram: bool) -> Validation {
    let words: Vec<String> = input
        .words
        .iter()
        .map(|w| sanitize(w))
        .filter(|w| !w.is_empty())
        .collect();

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let letters_used: usize = words.iter().map(String::len).sum();

    if words.is_empty() {
        errors.push("Add at least one word.".to_string());
    }

    if letters_used != CELL_COUNT {
        errors.push(format!(
            "Total letters must equal {CELL_COUNT}. Currently {letters_used}."
        ));
    }

    let spangram_remaining = words
        .first()
        .map(|w| MIN_SPANGRAM_LEN.saturating_sub(w.len()))
        .unwrap_or(MIN_SPANGRAM_LEN);

    if !words.is_empty() && spangram_remaining > 0 {
        let message = format!("Spangram needs {spangram_remaining} more letters.");
        if strict_spangram {
            errors.push(message);
        } else {
            warnings.push(message);
        }
    }

    if input.title.trim().is_empty() {
        warnings.push("Title is missing.".to_string());
    }
    if input.theme.trim().is_empty() {
        warnings.push("Theme is missing.".to_string());
    }
    if input.author.trim().is_empty() {
        warnings.push("Author is missing.".to_string());
    }

    let letters_feedback = match letters_used {
        n if n < CELL_COUNT => format!("Needs {} more letters.", CELL_COUNT - n),
        n if n > CELL_COUNT => format!("{} letters over.", n - CELL_COUNT),
        _ => "Perfect letter count.".to_string(),
    };

    Validation {
        words,
        errors,
        warnings,
        letters_used,
        spangram_remaining,
        letters_feedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 7 + 8 + 7 + 7 + 5 + 5 + 4 + 5 = 48 letters.
    pub fn weather_input() -> PuzzleInput {
        PuzzleInput {
            title: "Stormy".to_string(),
            theme: "Weather".to_string(),
            author: "kim".to_string(),
            words: [
                "rainbow", "sunshine", "thunder", "drizzle", "cloud", "storm", "mist", "hails",
            ]
            .iter()
            .map(|w| w.to_string())
            .collect(),
        }
    }

    #[test]
    fn test_perfect_input_passes() {
        let validation = validate(&weather_input(), true);
        assert!(validation.errors.is_empty(), "{:?}", validation.errors);
        assert!(validation.warnings.is_empty(), "{:?}", validation.warnings);
        assert_eq!(validation.letters_used, 48);
        assert_eq!(validation.spangram_remaining, 0);
        assert_eq!(validation.letters_feedback, "Perfect letter count.");
    }

    #[test]
    fn test_sanitization_strips_noise() {
        assert_eq!(sanitize("Rain-Bow!"), "rainbow");
        assert_eq!(sanitize("  SUN shine "), "sunshine");
        assert_eq!(sanitize("42"), "");
        assert_eq!(sanitize("café"), "caf");
    }

    #[test]
    fn test_sanitized_words_drop_empties() {
        let mut input = weather_input();
        input.words.push("!!!".to_string());
        let validation = validate(&input, true);
        assert_eq!(validation.words.len(), 8);
    }

    #[test]
    fn test_letter_count_mismatch() {
        let mut input = weather_input();
        // "hails" -> "hail": 47 letters
        *input.words.last_mut().unwrap() = "hail".to_string();
        let validation = validate(&input, true);
        assert_eq!(
            validation.errors,
            vec!["Total letters must equal 48. Currently 47.".to_string()]
        );
        assert_eq!(validation.letters_feedback, "Needs 1 more letters.");
    }

    #[test]
    fn test_letter_count_over() {
        let mut input = weather_input();
        input.words.push("icy".to_string());
        let validation = validate(&input, true);
        assert_eq!(
            validation.errors,
            vec!["Total letters must equal 48. Currently 51.".to_string()]
        );
        assert_eq!(validation.letters_feedback, "3 letters over.");
    }

    #[test]
    fn test_empty_word_list() {
        let input = PuzzleInput::default();
        let validation = validate(&input, true);
        assert!(validation
            .errors
            .contains(&"Add at least one word.".to_string()));
        assert_eq!(validation.spangram_remaining, MIN_SPANGRAM_LEN);
    }

    #[test]
    fn test_short_spangram_strict_vs_relaxed() {
        let mut input = weather_input();
        // swap the spangram for a 3-letter word, padding elsewhere to keep 48
        input.words[0] = "sun".to_string(); // 3 letters, was 7
        input.words[1] = "sunshineglow".to_string(); // 12 letters, was 8

        let strict = validate(&input, true);
        assert!(strict
            .errors
            .contains(&"Spangram needs 3 more letters.".to_string()));

        let relaxed = validate(&input, false);
        assert!(relaxed.errors.is_empty(), "{:?}", relaxed.errors);
        assert!(relaxed
            .warnings
            .contains(&"Spangram needs 3 more letters.".to_string()));
        assert_eq!(relaxed.spangram_remaining, 3);
    }

    #[test]
    fn test_metadata_warnings() {
        let mut input = weather_input();
        input.title.clear();
        input.author = "   ".to_string();
        let validation = validate(&input, true);
        assert!(validation.warnings.contains(&"Title is missing.".to_string()));
        assert!(validation.warnings.contains(&"Author is missing.".to_string()));
        assert!(!validation.warnings.contains(&"Theme is missing.".to_string()));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let input = weather_input();
        let first = validate(&input, true);
        let second = validate(&input, true);
        assert_eq!(first, second);
    }
}
