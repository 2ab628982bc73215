//! The `annotate` command: run the diff engine without the model.

use crate::cli::AnnotateArgs;
use crate::config::Config;
use crate::diff::{process_diff, EngineOptions, PathMatcher};
use crate::error::{Result, RevetError};
use std::io::Read;

/// Annotate a diff read from a file or stdin and print it, reporting
/// exclusions on stderr.
pub fn cmd_annotate(args: AnnotateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(".")?,
    };
    if let Some(max_diff_chars) = args.max_diff_chars {
        config.max_diff_chars = max_diff_chars;
    }
    config.validate()?;

    let diff = read_input(&args)?;

    let options = if args.no_filter {
        EngineOptions {
            max_chars: config.max_diff_chars,
            matcher: PathMatcher::empty(),
            filter_blank: false,
        }
    } else {
        config.engine_options()?
    };

    let processed = process_diff(&diff, &options);

    if processed.truncated {
        eprintln!(
            "note: diff is large ({} chars), truncated to {} chars",
            diff.chars().count(),
            options.max_chars
        );
    }
    for path in &processed.excluded_tests {
        eprintln!("excluded test file: {}", path);
    }
    for path in &processed.excluded_blank {
        eprintln!("excluded whitespace-only change: {}", path);
    }

    println!("{}", processed.annotated);
    Ok(())
}

fn read_input(args: &AnnotateArgs) -> Result<String> {
    match &args.path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            RevetError::UserError(format!(
                "failed to read diff file '{}': {}",
                path.display(),
                e
            ))
        }),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| RevetError::UserError(format!("failed to read stdin: {}", e)))?;
            Ok(buffer)
        }
    }
}
