#![deny(missing_docs)]

//! # Declaration Locator
//!
//! Classifies contiguous line-ranges of a source file into declaration
//! kinds without parsing the grammar. The scan is an explicit state
//! machine over lines; context tracking is limited to a single target
//! block supplied by the caller.
//!
//! A nested construct that reuses the closing-delimiter shape at the
//! target block's indentation closes the context early. That imprecision
//! is an accepted property of the line-oriented model, and malformed
//! input simply yields zero matches; the scan itself never fails.

pub(crate) mod classify;
pub mod models;

pub use models::{BlockKind, BlockPattern, DeclKind, Declaration};

use classify::{
    closes_block_at, indent_of, is_attr_line, is_blank, is_enum_variant, is_fn_signature,
    is_impl_header, is_import, is_init_field, is_struct_field, is_test_marker,
};

/// The scan position relative to attribute runs and the target block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Between declarations, outside the target block.
    Outside,
    /// Inside the caller's target block.
    InDeclarationBlock,
    /// Inside a run of stacked attribute lines.
    InAttributeRun,
}

/// Splits source text into lines, index-compatible with every pass in
/// this crate. A trailing newline yields a final empty element so that
/// joining with `\n` reproduces the input byte-for-byte.
pub(crate) fn split_lines(source: &str) -> Vec<&str> {
    source.split('\n').collect()
}

/// Scans `source` and returns every located declaration in document
/// order. `target`, when given, opens the single block whose members are
/// classified as variants, fields, or initializer fields.
pub fn scan_declarations(source: &str, target: Option<&BlockPattern>) -> Vec<Declaration> {
    run_scan(&split_lines(source), target).0
}

/// Like [`scan_declarations`], but returns the machine state after each
/// line instead of the declarations. Exists so transition rules can be
/// asserted directly in tests.
pub fn scan_states(source: &str, target: Option<&BlockPattern>) -> Vec<ScanState> {
    run_scan(&split_lines(source), target).1
}

fn run_scan(
    lines: &[&str],
    target: Option<&BlockPattern>,
) -> (Vec<Declaration>, Vec<ScanState>) {
    let mut decls = Vec::new();
    let mut states = Vec::with_capacity(lines.len());

    let mut block: Option<(String, BlockKind)> = None;
    let mut attr_has_test = false;

    let base = |block: &Option<(String, BlockKind)>| {
        if block.is_some() {
            ScanState::InDeclarationBlock
        } else {
            ScanState::Outside
        }
    };

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        // Block context: one level, closed by a lone delimiter at the
        // opener's indentation. Deeper delimiters pass through untouched.
        if let Some((block_indent, _)) = &block {
            if closes_block_at(line, block_indent) {
                block = None;
                attr_has_test = false;
                states.push(ScanState::Outside);
                i += 1;
                continue;
            }
        } else if let Some(pattern) = target {
            if pattern.matches(line) {
                block = Some((indent_of(line).to_string(), pattern.kind()));
                attr_has_test = false;
                states.push(ScanState::InDeclarationBlock);
                i += 1;
                continue;
            }
        }

        if is_attr_line(line) {
            attr_has_test = attr_has_test || is_test_marker(line);
            states.push(ScanState::InAttributeRun);
            i += 1;
            continue;
        }

        if is_blank(line) {
            attr_has_test = false;
            states.push(base(&block));
            i += 1;
            continue;
        }

        let in_target_block = block.is_some();
        let indent = indent_of(line).to_string();
        let trimmed_kind = classify_line(line, &block);

        match trimmed_kind {
            Some(LineShape::Import) => {
                decls.push(Declaration {
                    kind: DeclKind::Import,
                    start: i,
                    end: i,
                    indent,
                    in_target_block,
                });
            }
            Some(LineShape::Fn) => {
                // The signature may span lines; extend to the line that
                // opens the body or terminates the item.
                if let Some(end) = signature_end(lines, i) {
                    let kind = if attr_has_test {
                        DeclKind::TestFn
                    } else {
                        DeclKind::FnSignature
                    };
                    decls.push(Declaration {
                        kind,
                        start: i,
                        end,
                        indent,
                        in_target_block,
                    });
                    for _ in i..=end {
                        states.push(base(&block));
                    }
                    attr_has_test = false;
                    i = end + 1;
                    continue;
                }
            }
            Some(LineShape::Impl) => {
                decls.push(Declaration {
                    kind: DeclKind::ImplBlock,
                    start: i,
                    end: i,
                    indent,
                    in_target_block,
                });
            }
            Some(LineShape::Member(kind)) => {
                decls.push(Declaration {
                    kind,
                    start: i,
                    end: i,
                    indent,
                    in_target_block,
                });
            }
            None => {}
        }

        attr_has_test = false;
        states.push(base(&block));
        i += 1;
    }

    (decls, states)
}

enum LineShape {
    Import,
    Fn,
    Impl,
    Member(DeclKind),
}

fn classify_line(line: &str, block: &Option<(String, BlockKind)>) -> Option<LineShape> {
    if is_import(line) {
        return Some(LineShape::Import);
    }
    if is_fn_signature(line) {
        return Some(LineShape::Fn);
    }
    if is_impl_header(line) {
        return Some(LineShape::Impl);
    }
    if let Some((_, kind)) = block {
        let member = match kind {
            BlockKind::Enum if is_enum_variant(line) => Some(DeclKind::EnumVariant),
            BlockKind::Struct if is_struct_field(line) => Some(DeclKind::StructField),
            BlockKind::Literal if is_init_field(line) => Some(DeclKind::StructInit),
            _ => None,
        };
        return member.map(LineShape::Member);
    }
    None
}

/// Last line of a signature starting at `start`: the first line that
/// opens the body or terminates the item. Returns `None` when the file
/// ends first, in which case the candidate is dropped rather than
/// reported.
fn signature_end(lines: &[&str], start: usize) -> Option<usize> {
    for (offset, line) in lines[start..].iter().enumerate() {
        let t = line.trim_end();
        if t.contains('{') || t.ends_with(';') {
            return Some(start + offset);
        }
    }
    None
}
