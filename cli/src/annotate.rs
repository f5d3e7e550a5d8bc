#![deny(missing_docs)]

//! # Annotate Command
//!
//! Adds explicit types to awaited-call bindings and keeps the matching
//! imports in order. The rule set defaults to the built-in table for the
//! generated client this tool maintains; `--rules` swaps in a JSON file.

use crate::corpus::{enumerate_sources, SourceFile};
use crate::error::CliResult;
use regraft_core::{annotate_bindings, AnnotationRules};
use std::fs;
use std::path::PathBuf;

/// Arguments for the annotate command.
#[derive(clap::Args, Debug, Clone)]
pub struct AnnotateArgs {
    /// Directory scanned for source files.
    #[clap(long)]
    pub dir: PathBuf,

    /// Path to a rules JSON file; omitted means the built-in rule set.
    #[clap(long)]
    pub rules: Option<PathBuf>,

    /// Filename suffix of the files to process.
    #[clap(long, default_value = "rs")]
    pub suffix: String,
}

/// Executes the annotate pass over the enumerated corpus.
pub fn execute(args: &AnnotateArgs) -> CliResult<()> {
    let rules = match &args.rules {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            AnnotationRules::from_json(&text)?
        }
        None => AnnotationRules::builtin(),
    };

    let mut changed = 0;
    for path in enumerate_sources(&args.dir, &args.suffix)? {
        let mut file = SourceFile::load(&path)?;
        file.apply(|text| annotate_bindings(text, &rules));
        if file.store()? {
            println!("Changed {}", path.display());
            changed += 1;
        }
    }

    println!("Annotate pass complete: {} file(s) changed.", changed);
    Ok(())
}
