use std::fs;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use log::{debug, info};

use spellwright::Engine;

mod cli;

use cli::Args;

fn main() -> Result<ExitCode> {
    env_logger::init();

    let args = Args::init();
    info!("Launching with args: {:?}", args);

    let affix_text = fs::read_to_string(&args.affix)
        .with_context(|| format!("reading affix description at {:?}", args.affix))?;
    let dic_text = merge_dictionaries(&args.dictionaries)?;

    let engine = Engine::new(&affix_text, &dic_text).context("building engine")?;
    debug!("Engine built");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut any_failed = false;

    if args.words.is_empty() {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line.context("reading a line from stdin")?;
            for word in line.split_whitespace() {
                check_one(&engine, word, args.suggest, &mut out, &mut any_failed)?;
            }
        }
    } else {
        for word in &args.words {
            check_one(&engine, word, args.suggest, &mut out, &mut any_failed)?;
        }
    }

    info!("Done, exiting");
    Ok(if any_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Read and concatenate one or more `.dic` files into the single text
/// blob `Engine::new` expects, replacing each file's own entry count
/// with the combined total (§4.P: multiple dictionaries merge into one).
fn merge_dictionaries(paths: &[std::path::PathBuf]) -> Result<String> {
    let mut entries = Vec::new();
    for path in paths {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading word list at {path:?}"))?;
        let mut lines = text.lines();
        lines.next(); // the file's own count line, recomputed below
        entries.extend(lines.map(str::to_string));
    }

    let mut merged = format!("{}\n", entries.len());
    for entry in entries {
        merged.push_str(&entry);
        merged.push('\n');
    }
    Ok(merged)
}

fn check_one(
    engine: &Engine,
    word: &str,
    suggest: bool,
    out: &mut impl Write,
    any_failed: &mut bool,
) -> Result<()> {
    if suggest {
        let suggestions = engine.suggest(word);
        if suggestions.is_empty() {
            writeln!(out, "{word}: (no suggestions)")?;
        } else {
            writeln!(out, "{word}: {}", suggestions.join(", "))?;
        }
        return Ok(());
    }

    let result = engine.check(word);
    if result.correct {
        writeln!(out, "{word}: OK")?;
    } else {
        *any_failed = true;
        writeln!(out, "{word}: FAIL")?;
    }
    Ok(())
}
