#![deny(missing_docs)]

//! # Regraft Core
//!
//! Core library for the source-rewriting passes that evolve a generated
//! client library in place: feature-gate injection and retraction, binding
//! type annotation, and import upkeep. Every pass is a pure text-in /
//! text-out function; file access lives in the CLI crate.

/// Shared error types.
pub mod error;

/// Declaration scanning logic.
pub mod locator;

/// Feature-gate injection and retraction.
pub mod guard;

/// Binding type annotation.
pub mod annotate;

/// Import bookkeeping.
pub mod imports;

pub use annotate::{annotate_bindings, scan_bindings, AnnotationRules, MarkerRule, TypeBinding};
pub use error::{AppError, AppResult};
pub use guard::{
    gate_declarations, inject_guard, retract_guard, retract_guards, GateSpec, GuardAttribute,
};
pub use imports::{ensure_imported, find_import, symbol_in_use, ImportForm, ImportRecord};
pub use locator::{
    scan_declarations, scan_states, BlockKind, BlockPattern, DeclKind, Declaration, ScanState,
};
