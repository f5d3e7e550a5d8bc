#![deny(missing_docs)]

//! # Retract Command
//!
//! Removes guards a previous gate run placed on the wrong line, using the
//! bounded backward scan. Selection works exactly like `gate`, so a
//! mis-targeted run can be undone by repeating its arguments.

use crate::corpus::{enumerate_sources, SourceFile};
use crate::error::CliResult;
use crate::gate::{build_spec, GateArgs};
use regraft_core::retract_guards;

/// Arguments for the retract command; identical in shape to `gate`.
pub type RetractArgs = GateArgs;

/// Executes the retract pass over the enumerated corpus.
pub fn execute(args: &RetractArgs) -> CliResult<()> {
    let spec = build_spec(args)?;

    let mut changed = 0;
    for path in enumerate_sources(&args.dir, &args.suffix)? {
        let mut file = SourceFile::load(&path)?;
        file.apply(|text| retract_guards(text, &args.feature, &spec));
        if file.store()? {
            println!("Changed {}", path.display());
            changed += 1;
        }
    }

    println!("Retract pass complete: {} file(s) changed.", changed);
    Ok(())
}
