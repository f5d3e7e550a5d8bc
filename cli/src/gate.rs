#![deny(missing_docs)]

//! # Gate Command
//!
//! Injects `#[cfg(feature = "...")]` above every declaration that names
//! the optional backend, across a directory of source files.

use crate::corpus::{enumerate_sources, SourceFile};
use crate::error::{CliError, CliResult};
use regraft_core::{gate_declarations, BlockPattern, DeclKind, GateSpec};
use std::path::PathBuf;

/// Arguments shared by the gate and retract commands.
#[derive(clap::Args, Debug, Clone)]
pub struct GateArgs {
    /// Directory scanned for source files.
    #[clap(long)]
    pub dir: PathBuf,

    /// Feature name used verbatim inside the injected guard.
    #[clap(long, default_value = "vertex")]
    pub feature: String,

    /// Substring flagging the declarations to act on.
    #[clap(long)]
    pub marker: String,

    /// Opening line of the block whose members participate
    /// (e.g. "pub enum Error {").
    #[clap(long)]
    pub block: Option<String>,

    /// Restrict to declaration kinds, comma separated
    /// (import, enum-variant, struct-field, struct-init, fn, impl, test-fn).
    #[clap(long, value_delimiter = ',')]
    pub kind: Vec<String>,

    /// Filename suffix of the files to process.
    #[clap(long, default_value = "rs")]
    pub suffix: String,
}

/// Maps a command-line kind name to the locator's kind.
pub(crate) fn parse_kind(name: &str) -> CliResult<DeclKind> {
    match name {
        "import" => Ok(DeclKind::Import),
        "enum-variant" => Ok(DeclKind::EnumVariant),
        "struct-field" => Ok(DeclKind::StructField),
        "struct-init" => Ok(DeclKind::StructInit),
        "fn" => Ok(DeclKind::FnSignature),
        "impl" => Ok(DeclKind::ImplBlock),
        "test-fn" => Ok(DeclKind::TestFn),
        other => Err(CliError::General(format!(
            "Unknown declaration kind: {}",
            other
        ))),
    }
}

/// Builds the selection spec from the shared arguments.
pub(crate) fn build_spec(args: &GateArgs) -> CliResult<GateSpec> {
    let kinds = if args.kind.is_empty() {
        None
    } else {
        Some(
            args.kind
                .iter()
                .map(|k| parse_kind(k))
                .collect::<CliResult<Vec<_>>>()?,
        )
    };
    Ok(GateSpec {
        marker: args.marker.clone(),
        kinds,
        block: args.block.as_deref().map(BlockPattern::new),
    })
}

/// Executes the gate pass over the enumerated corpus.
pub fn execute(args: &GateArgs) -> CliResult<()> {
    let spec = build_spec(args)?;

    let mut changed = 0;
    for path in enumerate_sources(&args.dir, &args.suffix)? {
        let mut file = SourceFile::load(&path)?;
        file.apply(|text| gate_declarations(text, &args.feature, &spec));
        if file.store()? {
            println!("Changed {}", path.display());
            changed += 1;
        }
    }

    println!("Gate pass complete: {} file(s) changed.", changed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn args_for(dir: PathBuf) -> GateArgs {
        GateArgs {
            dir,
            feature: "vertex".into(),
            marker: "Cloud".into(),
            block: Some("pub enum Error {".into()),
            kind: vec!["enum-variant".into()],
            suffix: "rs".into(),
        }
    }

    #[test]
    fn test_execute_gates_and_reports_idempotently() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("error.rs");
        fs::write(
            &path,
            "pub enum Error {\n    CloudAuth { source: auth::Error },\n}\n",
        )
        .unwrap();

        execute(&args_for(dir.path().to_path_buf())).unwrap();
        let gated = fs::read_to_string(&path).unwrap();
        assert!(gated.contains("    #[cfg(feature = \"vertex\")]\n    CloudAuth"));

        // Second run leaves the corpus untouched.
        execute(&args_for(dir.path().to_path_buf())).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), gated);
    }

    #[test]
    fn test_parse_kind_rejects_unknown() {
        assert!(parse_kind("enum-variant").is_ok());
        assert!(parse_kind("statement").is_err());
    }

    #[test]
    fn test_execute_missing_dir_errors() {
        let args = args_for(PathBuf::from("/nonexistent/dir"));
        assert!(execute(&args).is_err());
    }
}
