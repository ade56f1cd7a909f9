//! The in-memory model of an otfcc font dump.
//!
//! Only the tables the engine edits are typed; every other table (and
//! every unmodeled field inside a typed table) is captured in a
//! flattened remainder so the document re-serializes losslessly for the
//! encoder.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Result, error::Error, lookup::Lookup};

/// An OpenType font can hold at most this many glyphs.
pub const MAX_GLYPH_COUNT: usize = 65535;

/// A decoded font, exclusively owned by one build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontDocument {
    /// Codepoint to glyph name. Serialized with decimal-string keys.
    #[serde(default)]
    pub cmap: IndexMap<u32, String>,

    /// Glyph name to the codepoints that reference it. Derived by
    /// [`decorate`](Self::decorate) after decode; never serialized.
    #[serde(skip)]
    pub cmap_rev: IndexMap<String, Vec<u32>>,

    /// Glyph index assignment. Names are distinct.
    #[serde(default)]
    pub glyph_order: Vec<String>,

    /// Glyph metrics and outline records.
    #[serde(default)]
    pub glyf: IndexMap<String, Glyph>,

    #[serde(rename = "GSUB", default, skip_serializing_if = "Option::is_none")]
    pub gsub: Option<LayoutTable>,

    #[serde(rename = "GPOS", default, skip_serializing_if = "Option::is_none")]
    pub gpos: Option<LayoutTable>,

    /// Baseline table, traversed generically for glyph-keyed anchors.
    #[serde(rename = "BASE", default, skip_serializing_if = "Option::is_none")]
    pub base: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<NameRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Head>,

    /// All tables the engine never touches (CFF/glyf outlines aside,
    /// OS/2, hmtx, and so on).
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// A glyph record. Metrics are typed for placeholder insertion; the
/// outline data stays in the flattened remainder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    #[serde(rename = "advanceWidth", default, skip_serializing_if = "Option::is_none")]
    pub advance_width: Option<f64>,
    #[serde(rename = "advanceHeight", default, skip_serializing_if = "Option::is_none")]
    pub advance_height: Option<f64>,
    #[serde(rename = "verticalOrigin", default, skip_serializing_if = "Option::is_none")]
    pub vertical_origin: Option<f64>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Glyph {
    /// The invisible zero-width glyph used as a word-conversion
    /// placeholder.
    pub fn placeholder() -> Self {
        Self {
            advance_width: Some(0.0),
            advance_height: Some(1000.0),
            vertical_origin: Some(880.0),
            rest: Map::new(),
        }
    }
}

/// GSUB or GPOS: lookups plus the feature/language wiring around them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutTable {
    #[serde(default)]
    pub languages: IndexMap<String, LanguageSystem>,
    #[serde(default)]
    pub features: IndexMap<String, Vec<String>>,
    #[serde(default)]
    pub lookups: IndexMap<String, Lookup>,
    #[serde(rename = "lookupOrder", default)]
    pub lookup_order: Vec<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// One language system and the features active in it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageSystem {
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// One `name` table entry, as dumped by otfcc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameRecord {
    #[serde(rename = "platformID")]
    pub platform_id: u16,
    #[serde(rename = "encodingID")]
    pub encoding_id: u16,
    #[serde(rename = "languageID")]
    pub language_id: u16,
    #[serde(rename = "nameID")]
    pub name_id: u16,
    #[serde(rename = "nameString")]
    pub name_string: String,
}

/// The `head` table; only the revision is edited.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Head {
    #[serde(rename = "fontRevision", default)]
    pub font_revision: f64,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl FontDocument {
    /// Parse an otfcc dump and build the reverse character map.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut doc: FontDocument = serde_json::from_str(text)?;
        doc.decorate();
        Ok(doc)
    }

    /// Build `cmap_rev` from `cmap` in one pass.
    ///
    /// Must run once after decode; every later cmap mutation goes
    /// through [`disassociate`](Self::disassociate) to keep the two maps
    /// consistent.
    pub fn decorate(&mut self) {
        self.cmap_rev.clear();
        for (&codepoint, glyph_name) in &self.cmap {
            self.cmap_rev
                .entry(glyph_name.clone())
                .or_default()
                .push(codepoint);
        }
    }

    /// Remove `codepoint` from `cmap` and from `cmap_rev[glyph_name]`.
    ///
    /// Returns `true` if the codepoint was the glyph's last reference.
    pub fn disassociate(&mut self, codepoint: u32, glyph_name: &str) -> bool {
        self.cmap.shift_remove(&codepoint);

        let is_only_item = self
            .cmap_rev
            .get(glyph_name)
            .is_some_and(|codepoints| codepoints.as_slice() == [codepoint]);

        if is_only_item {
            self.cmap_rev.shift_remove(glyph_name);
        } else if let Some(codepoints) = self.cmap_rev.get_mut(glyph_name) {
            codepoints.retain(|&c| c != codepoint);
        }

        is_only_item
    }

    /// The glyph a codepoint maps to, or [`Error::MissingGlyph`].
    ///
    /// Callers only reach this with coverage-filtered codepoints, so a
    /// miss means the entry list and the live cmap disagree.
    pub fn glyph_name(&self, codepoint: u32) -> Result<&str> {
        self.cmap
            .get(&codepoint)
            .map(String::as_str)
            .ok_or(Error::MissingGlyph(codepoint))
    }

    /// Append a fresh empty glyph under `name`.
    pub fn insert_empty_glyph(&mut self, name: &str) {
        self.glyf.insert(name.to_owned(), Glyph::placeholder());
        self.glyph_order.push(name.to_owned());
    }

    pub fn glyph_count(&self) -> usize {
        self.glyph_order.len()
    }

    /// All codepoints the font currently covers.
    pub fn codepoints(&self) -> std::collections::HashSet<u32> {
        self.cmap.keys().copied().collect()
    }

    pub fn gsub(&self) -> Result<&LayoutTable> {
        self.gsub.as_ref().ok_or(Error::NoGsub)
    }

    pub fn gsub_mut(&mut self) -> Result<&mut LayoutTable> {
        self.gsub.as_mut().ok_or(Error::NoGsub)
    }

    /// Serialize for the encoder. `cmap_rev` is skipped by construction.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
