//! # Data Models
//!
//! Definition of the structures produced by the declaration scan.

/// The structural shapes the locator recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    /// A single-line `use` statement.
    Import,
    /// A variant line inside the target enum block.
    EnumVariant,
    /// A named field inside the target struct block.
    StructField,
    /// A field inside a struct-literal initializer block.
    StructInit,
    /// A free or associated `fn` signature.
    FnSignature,
    /// An `impl` block header line.
    ImplBlock,
    /// A `fn` whose attribute run carries a test marker.
    TestFn,
}

/// A located declaration.
///
/// Line indices are 0-based and inclusive, valid only for the exact text
/// the scan ran over. Any insertion or deletion above `start` invalidates
/// them. Declarations produced by one scan never overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Structural kind.
    pub kind: DeclKind,
    /// First line of the declaration proper (attributes excluded).
    pub start: usize,
    /// Last line of the declaration.
    pub end: usize,
    /// Leading whitespace of the first line.
    pub indent: String,
    /// Whether the declaration sits inside the caller's target block.
    pub in_target_block: bool,
}

/// What kind of members a target block contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// An `enum` definition block; members are variants.
    Enum,
    /// A `struct` definition block; members are fields.
    Struct,
    /// A struct-literal expression block; members are initializer fields.
    Literal,
}

/// The opening-line pattern of the single block the scan tracks context for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPattern {
    opener: String,
    kind: BlockKind,
}

impl BlockPattern {
    /// Builds a pattern from the text of the block's opening line.
    ///
    /// The member kind is derived from the opener's shape: `enum` and
    /// `struct` definitions yield variant/field members, anything else is
    /// treated as a struct-literal initializer.
    pub fn new(opener: impl Into<String>) -> Self {
        let opener = opener.into();
        let kind = if opener.contains("enum ") {
            BlockKind::Enum
        } else if opener.contains("struct ") {
            BlockKind::Struct
        } else {
            BlockKind::Literal
        };
        BlockPattern { opener, kind }
    }

    /// Whether `line` opens this block.
    pub fn matches(&self, line: &str) -> bool {
        line.trim_start().starts_with(self.opener.trim_start())
    }

    /// The member kind of the block.
    pub fn kind(&self) -> BlockKind {
        self.kind
    }
}
