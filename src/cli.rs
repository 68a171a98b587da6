//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// A Hunspell-compatible spellchecker: reads words from stdin or
/// positional arguments and reports whether each is spelled correctly,
/// or (with `--suggest`) prints ranked corrections instead.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the affix description (`.aff`).
    #[arg(short = 'a', long, value_name = "AFF", env = "SPELLWRIGHT_AFF")]
    pub affix: PathBuf,

    /// Path to a word list (`.dic`). Repeatable; the first is primary,
    /// the rest are merged into it before the tries are built, mirroring
    /// Hunspell's own multi-dictionary support.
    #[arg(
        short = 'd',
        long = "dictionary",
        value_name = "DIC",
        required = true,
        num_args = 1..
    )]
    pub dictionaries: Vec<PathBuf>,

    /// Words to check. If none are given, words are read from stdin
    /// instead, one or more per line.
    #[arg(value_name = "WORD")]
    pub words: Vec<String>,

    /// Print ranked suggestions instead of a correct/incorrect verdict.
    #[arg(short, long)]
    pub suggest: bool,
}

impl Args {
    /// Parse from `std::env::args`.
    #[must_use]
    pub fn init() -> Self {
        Self::parse()
    }
}
