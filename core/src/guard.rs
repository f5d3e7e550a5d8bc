//! # Feature Guards
//!
//! Injects and retracts `#[cfg(feature = "...")]` lines above located
//! declarations. Injection is idempotent; retraction removes at most one
//! guard per declaration and leaves every other attribute untouched.
//!
//! Batch application walks the located declarations in reverse document
//! order. Line indices computed by the scan are positional, and an
//! insertion above a not-yet-processed match would shift them; bottom-up
//! application keeps every pending index valid.

use crate::locator::classify::{is_attr_line, is_guard_line};
use crate::locator::{scan_declarations, split_lines, BlockPattern, DeclKind, Declaration};

/// Selects which located declarations a gating pass applies to.
#[derive(Debug, Clone)]
pub struct GateSpec {
    /// Substring that flags a declaration (matched against every line of
    /// its range).
    pub marker: String,
    /// Restricts the pass to these kinds; `None` means all kinds.
    pub kinds: Option<Vec<DeclKind>>,
    /// Target block whose members participate in the scan.
    pub block: Option<BlockPattern>,
}

impl GateSpec {
    /// A spec gating every declaration kind that names `marker`.
    pub fn for_marker(marker: impl Into<String>) -> Self {
        GateSpec {
            marker: marker.into(),
            kinds: None,
            block: None,
        }
    }

    fn selects(&self, decl: &Declaration, lines: &[&str]) -> bool {
        if let Some(kinds) = &self.kinds {
            if !kinds.contains(&decl.kind) {
                return false;
            }
        }
        lines[decl.start..=decl.end]
            .iter()
            .any(|l| l.contains(&self.marker))
    }
}

/// A guard placed by the injector.
///
/// The line index is positional, not a durable identity: any change to
/// the line count above it invalidates the reference. It is only
/// meaningful against the exact text the injection produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardAttribute {
    /// Feature named in the guard.
    pub feature: String,
    /// Line index the guard occupies at application time.
    pub line: usize,
}

/// Formats the guard line for `feature` at `indent`.
fn guard_line(indent: &str, feature: &str) -> String {
    format!("{}#[cfg(feature = \"{}\")]", indent, feature)
}

/// Inserts a guard above the declaration's attribute stack, unless one
/// for the same feature is already present in that stack. Returns the
/// insertion index when a line was inserted.
fn inject_at(lines: &mut Vec<String>, decl: &Declaration, feature: &str) -> Option<usize> {
    let mut top = decl.start;
    while top > 0 && is_attr_line(&lines[top - 1]) {
        if is_guard_line(&lines[top - 1], feature) {
            return None;
        }
        top -= 1;
    }
    lines.insert(top, guard_line(&decl.indent, feature));
    Some(top)
}

/// Walks strictly backward from the declaration through blank and
/// attribute lines; deletes the first guard for `feature` found in that
/// run. A line outside the allowed set halts the walk with no change.
/// Returns whether a line was deleted.
fn retract_at(lines: &mut Vec<String>, decl: &Declaration, feature: &str) -> bool {
    let mut i = decl.start;
    while i > 0 {
        let line = &lines[i - 1];
        if is_guard_line(line, feature) {
            lines.remove(i - 1);
            return true;
        }
        if line.trim().is_empty() || is_attr_line(line) {
            i -= 1;
            continue;
        }
        return false;
    }
    false
}

/// Injects a guard for `feature` above a single declaration. No-op when
/// the declaration's attribute stack already carries that guard; the
/// record describes the inserted line otherwise.
pub fn inject_guard(
    source: &str,
    decl: &Declaration,
    feature: &str,
) -> (String, Option<GuardAttribute>) {
    let mut lines: Vec<String> = split_lines(source).iter().map(|l| l.to_string()).collect();
    let placed = inject_at(&mut lines, decl, feature).map(|line| GuardAttribute {
        feature: feature.to_string(),
        line,
    });
    (lines.join("\n"), placed)
}

/// Removes a previously injected guard above a single declaration, if the
/// backward scan finds one. Returns whether a line was deleted.
pub fn retract_guard(source: &str, decl: &Declaration, feature: &str) -> (String, bool) {
    let mut lines: Vec<String> = split_lines(source).iter().map(|l| l.to_string()).collect();
    let removed = retract_at(&mut lines, decl, feature);
    (lines.join("\n"), removed)
}

/// Gates every declaration selected by `spec` with `feature`, bottom to
/// top. Re-running the pass over its own output changes nothing.
pub fn gate_declarations(source: &str, feature: &str, spec: &GateSpec) -> String {
    apply_batch(source, spec, |lines, decl| {
        inject_at(lines, decl, feature);
    })
}

/// Retracts the guard for `feature` from every declaration selected by
/// `spec`, bottom to top.
pub fn retract_guards(source: &str, feature: &str, spec: &GateSpec) -> String {
    apply_batch(source, spec, |lines, decl| {
        retract_at(lines, decl, feature);
    })
}

fn apply_batch<F>(source: &str, spec: &GateSpec, mut op: F) -> String
where
    F: FnMut(&mut Vec<String>, &Declaration),
{
    let borrowed = split_lines(source);
    let selected: Vec<Declaration> = scan_declarations(source, spec.block.as_ref())
        .into_iter()
        .filter(|d| spec.selects(d, &borrowed))
        .collect();

    let mut lines: Vec<String> = borrowed.iter().map(|l| l.to_string()).collect();
    for decl in selected.iter().rev() {
        op(&mut lines, decl);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ENUM_SNIPPET: &str = "\
pub enum Error {
    Http { source: io::Error },
    CloudAuth { source: auth::Error },
    CloudUnsupported { operation: &'static str },
}
";

    fn cloud_variants_spec() -> GateSpec {
        GateSpec {
            marker: "Cloud".into(),
            kinds: Some(vec![DeclKind::EnumVariant]),
            block: Some(BlockPattern::new("pub enum Error {")),
        }
    }

    #[test]
    fn test_gate_flagged_variants_at_their_indent() {
        let out = gate_declarations(ENUM_SNIPPET, "vertex", &cloud_variants_spec());
        assert_eq!(
            out,
            "\
pub enum Error {
    Http { source: io::Error },
    #[cfg(feature = \"vertex\")]
    CloudAuth { source: auth::Error },
    #[cfg(feature = \"vertex\")]
    CloudUnsupported { operation: &'static str },
}
"
        );
    }

    #[test]
    fn test_gate_is_idempotent() {
        let spec = cloud_variants_spec();
        let once = gate_declarations(ENUM_SNIPPET, "vertex", &spec);
        let twice = gate_declarations(&once, "vertex", &spec);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_gate_then_retract_round_trips() {
        let spec = cloud_variants_spec();
        let gated = gate_declarations(ENUM_SNIPPET, "vertex", &spec);
        let restored = retract_guards(&gated, "vertex", &spec);
        assert_eq!(restored, ENUM_SNIPPET);
    }

    #[test]
    fn test_inject_goes_above_attribute_stack() {
        let code = "\
pub struct Builder {
    #[serde(skip)]
    #[allow(dead_code)]
    cloud: Option<CloudConfig>,
}
";
        let field_spec = GateSpec {
            marker: "cloud".into(),
            kinds: Some(vec![DeclKind::StructField]),
            block: Some(BlockPattern::new("pub struct Builder {")),
        };
        let out = gate_declarations(code, "vertex", &field_spec);
        // Above the whole stack, never between stacked attributes and the
        // declaration.
        assert!(out.contains(
            "    #[cfg(feature = \"vertex\")]\n    #[serde(skip)]\n    #[allow(dead_code)]\n    cloud: Option<CloudConfig>,"
        ));
    }

    #[test]
    fn test_inject_skips_stacked_attributes_when_checking() {
        let code = "\
#[cfg(feature = \"vertex\")]
#[serde(skip)]
use cloud::Credentials;
";
        let spec = GateSpec::for_marker("Credentials");
        let out = gate_declarations(code, "vertex", &spec);
        assert_eq!(out, code);
    }

    #[test]
    fn test_retract_stops_at_non_attribute_line() {
        let code = "\
#[cfg(feature = \"vertex\")]
fn unrelated() {}

use cloud::Credentials;
";
        let spec = GateSpec::for_marker("Credentials");
        let out = retract_guards(code, "vertex", &spec);
        assert_eq!(out, code);
    }

    #[test]
    fn test_retract_removes_exactly_one_line() {
        let code = "\
#[cfg(feature = \"vertex\")]
#[serde(rename = \"auth\")]
CloudAuth { source: auth::Error },
";
        // Built by hand: the variant sits at line 2.
        let decl = Declaration {
            kind: DeclKind::EnumVariant,
            start: 2,
            end: 2,
            indent: String::new(),
            in_target_block: false,
        };
        let (out, removed) = retract_guard(code, &decl, "vertex");
        assert!(removed);
        assert_eq!(
            out,
            "\
#[serde(rename = \"auth\")]
CloudAuth { source: auth::Error },
"
        );
    }

    #[test]
    fn test_inject_records_placement() {
        let code = "use cloud::Credentials;\n";
        let decls = scan_declarations(code, None);
        let (out, placed) = inject_guard(code, &decls[0], "vertex");
        assert_eq!(
            placed,
            Some(GuardAttribute {
                feature: "vertex".into(),
                line: 0,
            })
        );

        // Positional indices are stale after the insertion; rescan before
        // touching the same declaration again.
        let rescanned = scan_declarations(&out, None);
        let (same, placed_again) = inject_guard(&out, &rescanned[0], "vertex");
        assert_eq!(placed_again, None);
        assert_eq!(same, out);
    }

    #[test]
    fn test_retract_ignores_other_features() {
        let code = "\
#[cfg(feature = \"other\")]
use cloud::Credentials;
";
        let spec = GateSpec::for_marker("Credentials");
        let out = retract_guards(code, "vertex", &spec);
        assert_eq!(out, code);
    }

    #[test]
    fn test_gate_import_and_fn_outside_block() {
        let code = "\
use cloud::PredictionService;

fn build_prediction_service() {
}
";
        let spec = GateSpec::for_marker("prediction");
        let out = gate_declarations(code, "vertex", &GateSpec::for_marker("PredictionService"));
        assert!(out.starts_with("#[cfg(feature = \"vertex\")]\nuse cloud::PredictionService;"));
        let out2 = gate_declarations(&out, "vertex", &spec);
        assert!(out2.contains("#[cfg(feature = \"vertex\")]\nfn build_prediction_service() {"));
    }

    #[test]
    fn test_multiline_signature_marker_on_later_line() {
        let code = "\
pub fn with_credentials(
    service: PredictionService,
) -> Result<Self, Error> {
";
        let spec = GateSpec::for_marker("PredictionService");
        let out = gate_declarations(code, "vertex", &spec);
        assert!(out.starts_with("#[cfg(feature = \"vertex\")]\npub fn with_credentials("));
    }
}
