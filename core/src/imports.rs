//! # Import Ledger
//!
//! Keeps `use` statements consistent with the types the other passes
//! introduce: a type that is used somewhere in the file gets exactly one
//! import, and a type that is used nowhere gets none.

use crate::locator::classify::is_import;
use crate::locator::split_lines;
use regex::Regex;

/// How an existing import spells the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportForm {
    /// Part of a grouped `use module::{A, B};` statement.
    Aggregated,
    /// A standalone `use module::Symbol;` statement.
    Standalone,
}

/// An import statement located in (or inserted into) a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    /// Module path the symbol is imported from.
    pub module: String,
    /// The imported symbol.
    pub symbol: String,
    /// Grouped or standalone spelling.
    pub form: ImportForm,
}

/// Whether `symbol` is used anywhere outside import lines, in any of the
/// syntactic contexts the ledger recognizes: type annotation,
/// path-qualified use, generic parameter, brace initializer, tuple call,
/// or a bare token followed by a statement delimiter.
pub fn symbol_in_use(source: &str, symbol: &str) -> bool {
    let s = regex::escape(symbol);
    let pattern = format!(
        r"(:\s*{0}\b)|(\b{0}::)|(<\s*{0}\s*[,>])|(,\s*{0}\s*>)|(\b{0}\s*\{{)|(\b{0}\()|(\b{0}\s*[;,])",
        s
    );
    let re = Regex::new(&pattern).expect("Invalid regex");

    split_lines(source)
        .iter()
        .filter(|line| !is_import(line))
        .any(|line| re.is_match(line))
}

/// Finds an existing import of `symbol` from `module`, in either form.
pub fn find_import(source: &str, module: &str, symbol: &str) -> Option<ImportRecord> {
    let group_re = Regex::new(&format!(
        r"^(pub\s+)?use\s+{}::\{{(.*)\}};$",
        regex::escape(module)
    ))
    .expect("Invalid regex");

    for line in split_lines(source) {
        let trimmed = line.trim();
        if let Some(caps) = group_re.captures(trimmed) {
            if caps[2].split(',').any(|item| item.trim() == symbol) {
                return Some(ImportRecord {
                    module: module.to_string(),
                    symbol: symbol.to_string(),
                    form: ImportForm::Aggregated,
                });
            }
        }
        if trimmed == format!("use {}::{};", module, symbol)
            || trimmed == format!("pub use {}::{};", module, symbol)
        {
            return Some(ImportRecord {
                module: module.to_string(),
                symbol: symbol.to_string(),
                form: ImportForm::Standalone,
            });
        }
    }
    None
}

/// Ensures `symbol` is imported from `module` exactly once, provided the
/// file actually uses it. Returns the (possibly rewritten) text and
/// whether a mutation occurred.
pub fn ensure_imported(source: &str, module: &str, symbol: &str) -> (String, bool) {
    if !symbol_in_use(source, symbol) {
        return (source.to_string(), false);
    }
    if find_import(source, module, symbol).is_some() {
        return (source.to_string(), false);
    }

    let mut lines: Vec<String> = split_lines(source).iter().map(|l| l.to_string()).collect();

    // Prefer merging into an existing group for the same module.
    let group_open = format!("use {}::{{", module);
    let group_at = lines
        .iter()
        .position(|l| l.trim_start().starts_with(&group_open) && l.trim_end().ends_with("};"));
    if let Some(idx) = group_at {
        let merged = lines[idx].replacen(&group_open, &format!("use {}::{{{}, ", module, symbol), 1);
        lines[idx] = merged;
        return (lines.join("\n"), true);
    }

    // Otherwise a standalone line after the leading file header.
    let mut at = 0;
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();
        let is_header = (i == 0 && trimmed.starts_with("#!/"))
            || trimmed.starts_with("//!")
            || trimmed.starts_with("#![");
        if !is_header {
            break;
        }
        at = i + 1;
    }
    lines.insert(at, format!("use {}::{};", module, symbol));
    (lines.join("\n"), true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_usage_means_no_import() {
        let code = "fn main() {\n    let x = 1;\n}\n";
        let (out, changed) = ensure_imported(code, "gemini_client", "Foo");
        assert!(!changed);
        assert_eq!(out, code);
    }

    #[test]
    fn test_usage_contexts() {
        for line in [
            "let r: GenerationResponse = x;",
            "let r = GenerationResponse::default();",
            "fn f(v: Vec<GenerationResponse>) {}",
            "let m: Map<String, GenerationResponse> = m;",
            "let r = GenerationResponse { parts };",
            "let r = GenerationResponse(inner);",
            "fn fetch() -> GenerationResponse;",
        ] {
            assert!(symbol_in_use(line, "GenerationResponse"), "missed: {}", line);
        }
        assert!(!symbol_in_use(
            "use gemini_client::GenerationResponse;",
            "GenerationResponse"
        ));
        assert!(!symbol_in_use("let r = other_response;", "GenerationResponse"));
    }

    #[test]
    fn test_single_import_for_many_usages() {
        let code = "\
fn f(a: Batch, b: Batch) -> Batch {
    Batch::default()
}
";
        let (out, changed) = ensure_imported(code, "gemini_client", "Batch");
        assert!(changed);
        assert_eq!(out.matches("use gemini_client::Batch;").count(), 1);

        let (again, changed_again) = ensure_imported(&out, "gemini_client", "Batch");
        assert!(!changed_again);
        assert_eq!(again, out);
    }

    #[test]
    fn test_merges_into_existing_group() {
        let code = "\
use gemini_client::{Client, Part};

fn f(r: GenerationResponse) {}
";
        let (out, changed) = ensure_imported(code, "gemini_client", "GenerationResponse");
        assert!(changed);
        assert_eq!(
            out,
            "\
use gemini_client::{GenerationResponse, Client, Part};

fn f(r: GenerationResponse) {}
"
        );
    }

    #[test]
    fn test_group_member_already_present_is_noop() {
        let code = "\
use gemini_client::{Client, GenerationResponse};

fn f(r: GenerationResponse) {}
";
        let (out, changed) = ensure_imported(code, "gemini_client", "GenerationResponse");
        assert!(!changed);
        assert_eq!(out, code);
    }

    #[test]
    fn test_standalone_lands_after_file_header() {
        let code = "\
//! Demo of streaming generation.
#![allow(unused)]

fn f(r: GenerationResponse) {}
";
        let (out, changed) = ensure_imported(code, "gemini_client", "GenerationResponse");
        assert!(changed);
        assert_eq!(
            out,
            "\
//! Demo of streaming generation.
#![allow(unused)]
use gemini_client::GenerationResponse;

fn f(r: GenerationResponse) {}
"
        );
    }

    #[test]
    fn test_find_import_reports_form() {
        let grouped = "use gemini_client::{Batch, Client};\nfn f(b: Batch) {}\n";
        assert_eq!(
            find_import(grouped, "gemini_client", "Batch").map(|r| r.form),
            Some(ImportForm::Aggregated)
        );
        let standalone = "use gemini_client::Batch;\nfn f(b: Batch) {}\n";
        assert_eq!(
            find_import(standalone, "gemini_client", "Batch").map(|r| r.form),
            Some(ImportForm::Standalone)
        );
        assert_eq!(find_import("fn f() {}\n", "gemini_client", "Batch"), None);
    }

    #[test]
    fn test_different_module_group_not_merged() {
        let code = "\
use other_crate::{Client};

fn f(r: Batch) {}
";
        let (out, changed) = ensure_imported(code, "gemini_client", "Batch");
        assert!(changed);
        assert!(out.starts_with("use gemini_client::Batch;\n"));
        assert!(out.contains("use other_crate::{Client};"));
    }
}
