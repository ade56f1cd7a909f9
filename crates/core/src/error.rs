//! Error types for conversion-font builds.

use std::result;

/// Errors that can occur while transforming a font document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "glyph capacity exceeded: {glyph_count} glyphs + {word_entries} placeholders > {max}",
        max = crate::MAX_GLYPH_COUNT
    )]
    GlyphCapacity {
        glyph_count: usize,
        word_entries: usize,
    },

    #[error("unsupported GSUB lookup type {kind:?} in lookup {lookup:?} during reachability analysis")]
    UnsupportedGsubLookup { lookup: String, kind: String },

    #[error("no glyph mapped for codepoint U+{0:04X} despite coverage filtering")]
    MissingGlyph(u32),

    #[error("word table not sorted longest-source-first at line {line}")]
    UnsortedWordTable { line: usize },

    #[error("malformed dictionary line {line}: expected source<TAB>target")]
    BadDictionaryLine { line: usize },

    #[error("no GSUB table in font")]
    NoGsub,

    #[error("{tool} failed with {status}")]
    Tool { tool: &'static str, status: std::process::ExitStatus },

    #[error("failed to parse font document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = result::Result<T, Error>;
