//! # Type Annotation Engine
//!
//! Rewrites `let NAME = EXPR;` bindings into explicitly typed form when
//! EXPR ends in a known awaited-call suffix and the rules can resolve a
//! type. Bindings that already carry an annotation never match, which is
//! what makes a second run over the same file a no-op.
//!
//! The rule set is data, not code: callers pass an [`AnnotationRules`]
//! value (JSON-loadable), so synthetic rule tables can drive the engine
//! in tests without touching the built-in defaults.

use crate::error::AppResult;
use crate::imports::ensure_imported;
use crate::locator::split_lines;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A substring marker resolving an initializer expression to a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerRule {
    /// Substring looked for inside the initializer expression.
    pub contains: String,
    /// Type the binding is annotated with on a match.
    pub ty: String,
}

/// The rule set driving the annotation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRules {
    /// Trailing call-chain shape flagging an awaited network call whose
    /// return type the surrounding text cannot name.
    pub call_suffix: String,
    /// Expression markers, checked in order; the first hit wins.
    pub markers: Vec<MarkerRule>,
    /// Binding-name fallback table, consulted when no marker matches.
    pub names: IndexMap<String, String>,
    /// Module path each introduced type is imported from.
    pub modules: IndexMap<String, String>,
}

impl AnnotationRules {
    /// The default rule set for the generated Gemini client this tool
    /// maintains. The batch marker is ordered first so batch call chains
    /// never fall through to the plain response type.
    pub fn builtin() -> Self {
        let mut names = IndexMap::new();
        for name in [
            "response",
            "response1",
            "response2",
            "response3",
            "final_response",
            "complex_response",
            "base_response",
            "edit_response1",
            "edit_response2",
            "edit_response3",
            "token_usage_response",
            "followup_response",
        ] {
            names.insert(name.to_string(), "GenerationResponse".to_string());
        }
        names.insert("batch".to_string(), "Batch".to_string());

        let mut modules = IndexMap::new();
        modules.insert("GenerationResponse".to_string(), "gemini_client".to_string());
        modules.insert("Batch".to_string(), "gemini_client".to_string());

        AnnotationRules {
            call_suffix: ".execute().await?".to_string(),
            markers: vec![
                MarkerRule {
                    contains: "batch_generate_content".to_string(),
                    ty: "Batch".to_string(),
                },
                MarkerRule {
                    contains: "generate_content".to_string(),
                    ty: "GenerationResponse".to_string(),
                },
            ],
            names,
            modules,
        }
    }

    /// Deserializes a rule set from JSON text.
    pub fn from_json(text: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    fn resolve(&self, name: &str, expr: &str) -> Option<String> {
        for marker in &self.markers {
            if expr.contains(&marker.contains) {
                return Some(marker.ty.clone());
            }
        }
        self.names.get(name).cloned()
    }
}

/// A located untyped binding whose initializer ends in the call suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBinding {
    /// Binding name.
    pub name: String,
    /// Initializer expression text, trailing terminator stripped,
    /// newlines preserved for multi-line chains.
    pub expr: String,
    /// Resolved type, when the rules produced one.
    pub ty: Option<String>,
    /// Line index of the `let` keyword.
    pub line: usize,
}

fn let_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // An annotated binding has `:` after the identifier instead of `=`,
    // so it cannot match.
    RE.get_or_init(|| {
        Regex::new(r"^(\s*)let\s+(mut\s+)?([A-Za-z_][A-Za-z0-9_]*) = (\S.*)$")
            .expect("Invalid regex")
    })
}

/// Scans for untyped bindings whose initializer ends in the rules' call
/// suffix, resolving a type for each where possible.
pub fn scan_bindings(source: &str, rules: &AnnotationRules) -> Vec<TypeBinding> {
    let lines = split_lines(source);
    let mut found = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let caps = match let_line_re().captures(lines[i]) {
            Some(c) => c,
            None => {
                i += 1;
                continue;
            }
        };

        // Collect the expression through the first line that terminates
        // the statement.
        let mut parts = vec![caps[4].to_string()];
        let mut end = i;
        while !parts.last().map(|p| p.trim_end().ends_with(';')).unwrap_or(false) {
            end += 1;
            if end >= lines.len() {
                break;
            }
            parts.push(lines[end].to_string());
        }

        let joined = parts.join("\n");
        let trimmed = joined.trim_end();
        if let Some(expr) = trimmed.strip_suffix(';') {
            // A chain broken across lines still ends in the suffix once
            // the layout whitespace is ignored.
            let compact: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
            let suffix: String = rules
                .call_suffix
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            if compact.ends_with(&suffix) {
                let name = caps[3].to_string();
                let ty = rules.resolve(&name, expr);
                found.push(TypeBinding {
                    name,
                    expr: expr.to_string(),
                    ty,
                    line: i,
                });
            }
        }

        i = end + 1;
    }

    found
}

/// Annotates every resolvable binding and records one import per
/// introduced type. Bindings the rules cannot resolve are left exactly
/// as they were.
pub fn annotate_bindings(source: &str, rules: &AnnotationRules) -> String {
    let bindings = scan_bindings(source, rules);

    let mut lines: Vec<String> = split_lines(source).iter().map(|l| l.to_string()).collect();
    let mut introduced: Vec<String> = Vec::new();

    for binding in bindings.iter().rev() {
        let ty = match &binding.ty {
            Some(t) => t,
            None => continue,
        };
        let rebuilt = match let_line_re().captures(&lines[binding.line]) {
            Some(caps) => format!(
                "{}let {}{}: {} = {}",
                &caps[1],
                caps.get(2).map(|m| m.as_str()).unwrap_or(""),
                &caps[3],
                ty,
                &caps[4],
            ),
            None => continue,
        };
        lines[binding.line] = rebuilt;
        if !introduced.contains(ty) {
            introduced.push(ty.clone());
        }
    }

    let mut text = lines.join("\n");
    // Bottom-up rewrite order means `introduced` is in reverse document
    // order; restore it so import insertion follows first use.
    for ty in introduced.iter().rev() {
        if let Some(module) = rules.modules.get(ty) {
            text = ensure_imported(&text, module, ty).0;
        }
    }

    text
}
