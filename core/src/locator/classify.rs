//! # Line Classification
//!
//! Internal regex-based predicates over single source lines. All matching
//! is shape-based; nothing here understands the grammar beyond the line
//! it is given.

use regex::Regex;
use std::sync::OnceLock;

/// Leading whitespace of a line.
pub(crate) fn indent_of(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}

/// Whether the line is blank or whitespace only.
pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Whether the line is an outer attribute (`#[...]`).
pub(crate) fn is_attr_line(line: &str) -> bool {
    line.trim_start().starts_with("#[")
}

/// Whether the line is a feature guard for `feature`.
pub(crate) fn is_guard_line(line: &str, feature: &str) -> bool {
    line.trim() == format!("#[cfg(feature = \"{}\")]", feature)
}

/// Whether the attribute line marks the following `fn` as a test.
pub(crate) fn is_test_marker(line: &str) -> bool {
    let t = line.trim();
    t == "#[test]" || t.starts_with("#[tokio::test")
}

/// Whether the line is a single-line `use` statement.
pub(crate) fn is_import(line: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^(pub(\([^)]*\))?\s+)?use\s+\S.*;$").expect("Invalid regex")
    });
    re.is_match(line.trim())
}

/// Whether the line starts a `fn` signature.
pub(crate) fn is_fn_signature(line: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^(pub(\([^)]*\))?\s+)?(const\s+)?(async\s+)?(unsafe\s+)?fn\s+[A-Za-z_]")
            .expect("Invalid regex")
    });
    re.is_match(line.trim())
}

/// Whether the line is an `impl` block header.
pub(crate) fn is_impl_header(line: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^impl(\s|<).*\{$").expect("Invalid regex"));
    re.is_match(line.trim())
}

/// Whether the line is an enum variant inside a definition block.
///
/// Covers unit (`Missing,`), tuple (`Cat(CatStruct),`) and record
/// (`Auth { source: Error },`) variants written on one line.
pub(crate) fn is_enum_variant(line: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^[A-Z][A-Za-z0-9_]*(\s*\{.*\}|\(.*\))?,?$").expect("Invalid regex")
    });
    re.is_match(line.trim())
}

/// Whether the line is a named field inside a struct definition block.
pub(crate) fn is_struct_field(line: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^(pub(\([^)]*\))?\s+)?[a-z_][A-Za-z0-9_]*\s*:\s*\S.*,?$")
            .expect("Invalid regex")
    });
    re.is_match(line.trim())
}

/// Whether the line is a field inside a struct-literal initializer block.
///
/// Shorthand fields (`tools,`) count; the trailing comma is required
/// because an initializer member is never the block's last token on its
/// own line in the corpus this tool maintains.
pub(crate) fn is_init_field(line: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^[a-z_][A-Za-z0-9_]*(\s*:\s*\S.*)?,$").expect("Invalid regex")
    });
    re.is_match(line.trim())
}

/// Whether the line is a lone closing delimiter for a block opened at
/// `indent`: a `}` possibly followed by expression punctuation.
pub(crate) fn closes_block_at(line: &str, indent: &str) -> bool {
    let trimmed = line.trim();
    if !trimmed.starts_with('}') {
        return false;
    }
    if !trimmed[1..].chars().all(|c| matches!(c, ')' | ',' | ';')) {
        return false;
    }
    indent_of(line) == indent
}
