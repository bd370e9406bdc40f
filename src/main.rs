//! Strands Puzzle Grid Generator
//!
//! Generates an 8x6 letter grid for a Strands-style word puzzle: the first
//! word (the spangram) spans the grid edge to edge, every word is a path of
//! 8-adjacent cells, and all 48 cells are covered exactly once.

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use strandgen::{grid, validate, Generator, PuzzleInput};

/// Generates Strands-style puzzle grids from a word list.
#[derive(Parser)]
#[command(name = "strandgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Word list and metadata shared by all subcommands.
#[derive(Args)]
struct InputArgs {
    /// The words; the first is the spangram. Total letters must be 48.
    words: Vec<String>,

    /// Read words from a file instead (one word per line).
    #[arg(long, conflicts_with = "words")]
    file: Option<std::path::PathBuf>,

    #[arg(long, default_value = "")]
    title: String,

    #[arg(long, default_value = "")]
    theme: String,

    #[arg(long, default_value = "")]
    author: String,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a grid and print it.
    Generate {
        #[command(flatten)]
        input: InputArgs,

        /// Seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum generation attempts.
        #[arg(long)]
        attempts: Option<usize>,
    },
    /// Validate the word list without generating.
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Generate and print the full result as JSON.
    ExportJson {
        #[command(flatten)]
        input: InputArgs,

        /// Seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate {
            input,
            seed,
            attempts,
        } => run_generate(input, seed, attempts),
        Command::Validate { input } => run_validate(input),
        Command::ExportJson { input, seed } => run_export_json(input, seed),
    }
}

/// Builds the puzzle input, reading the word file when one was given.
fn build_input(args: InputArgs) -> PuzzleInput {
    let words = match &args.file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(content) => content.lines().map(str::to_string).collect(),
            Err(e) => {
                eprintln!("Failed to read {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => args.words,
    };
    PuzzleInput {
        title: args.title,
        theme: args.theme,
        author: args.author,
        words,
    }
}

fn make_generator(seed: Option<u64>, attempts: Option<usize>) -> Generator {
    let mut generator = match seed {
        Some(seed) => Generator::with_seed(seed),
        None => Generator::new(),
    };
    if let Some(attempts) = attempts {
        generator.config.max_attempts = attempts;
    }
    generator
}

/// Generates a grid and prints it with the word list.
fn run_generate(input: InputArgs, seed: Option<u64>, attempts: Option<usize>) {
    let input = build_input(input);
    let mut generator = make_generator(seed, attempts);
    let result = generator.generate(&input);

    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }
    if !result.errors.is_empty() {
        for error in &result.errors {
            eprintln!("error: {error}");
        }
        std::process::exit(1);
    }

    print!("{}", format_result_grid(&result));
    println!();
    for placement in &result.placements {
        let marker = if placement.is_spangram { " (spangram)" } else { "" };
        println!("{}{}", placement.word, marker);
    }
}

/// Runs only the validator and reports its findings.
fn run_validate(input: InputArgs) {
    let input = build_input(input);
    let validation = validate(&input, true);

    println!("{}", validation.letters_feedback);
    for warning in &validation.warnings {
        println!("warning: {warning}");
    }
    if !validation.errors.is_empty() {
        for error in &validation.errors {
            eprintln!("error: {error}");
        }
        std::process::exit(1);
    }
    println!("{} words, {} letters", validation.words.len(), validation.letters_used);
}

/// Generates and prints the full result as JSON.
fn run_export_json(input: InputArgs, seed: Option<u64>) {
    let input = build_input(input);
    let mut generator = make_generator(seed, None);
    let result = generator.generate(&input);

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to serialize result: {e}");
            std::process::exit(1);
        }
    }
    if !result.errors.is_empty() {
        std::process::exit(1);
    }
}

/// Rebuilds a displayable grid from the result rows.
fn format_result_grid(result: &strandgen::PuzzleResult) -> String {
    let mut display = grid::Grid::new();
    for (row_index, row) in result.grid.iter().enumerate() {
        for (col_index, cell) in row.iter().enumerate() {
            let idx = grid::pos_to_idx(row_index as i32, col_index as i32);
            if cell.letter != ' ' {
                display.set(idx, cell.letter);
            }
            if cell.is_spangram {
                display.mark_spangram(idx);
            }
        }
    }
    grid::format_grid(&display)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_format_snapshot() {
        // "rainbow" bent along the top edge, flagged as the spangram
        let mut display = grid::Grid::new();
        let path = [
            grid::pos_to_idx(0, 0),
            grid::pos_to_idx(0, 1),
            grid::pos_to_idx(0, 2),
            grid::pos_to_idx(0, 3),
            grid::pos_to_idx(0, 4),
            grid::pos_to_idx(0, 5),
            grid::pos_to_idx(1, 5),
        ];
        for (&idx, ch) in path.iter().zip("rainbow".chars()) {
            display.set(idx, ch);
            display.mark_spangram(idx);
        }

        let output = grid::format_grid(&display);
        insta::assert_snapshot!("grid_format", output);
    }

    #[test]
    fn test_format_result_grid_roundtrip() {
        let mut generator = Generator::with_seed(1);
        generator.config.max_attempts = 0;
        generator.config.fallback = false;
        let input = PuzzleInput {
            words: vec!["x".to_string()],
            ..Default::default()
        };
        let result = generator.generate(&input);

        // error results carry a placeholder grid that formats as empty
        let formatted = format_result_grid(&result);
        assert_eq!(formatted, "......\n".repeat(8));
    }
}
