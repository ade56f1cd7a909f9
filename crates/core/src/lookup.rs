//! Typed GSUB/GPOS lookup records.
//!
//! The otfcc dump represents a lookup as a dictionary whose `type` tag
//! decides the shape of its `subtables` list. Lookup kinds this engine
//! edits are modeled structurally; any other kind is carried through
//! [`Lookup::Unknown`] unchanged so it round-trips to the encoder.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named substitution or positioning rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lookup {
    Known(KnownLookup),
    Unknown(Value),
}

impl Lookup {
    /// The `type` tag, for diagnostics.
    pub fn kind(&self) -> &str {
        match self {
            Lookup::Known(known) => known.kind(),
            Lookup::Unknown(value) => value
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("<untyped>"),
        }
    }
}

/// The lookup kinds with a modeled subtable shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum KnownLookup {
    #[serde(rename = "gsub_single")]
    GsubSingle(LookupBody<IndexMap<String, String>>),
    #[serde(rename = "gsub_multiple")]
    GsubMultiple(LookupBody<IndexMap<String, Vec<String>>>),
    #[serde(rename = "gsub_alternate")]
    GsubAlternate(LookupBody<IndexMap<String, Vec<String>>>),
    #[serde(rename = "gsub_ligature")]
    GsubLigature(LookupBody<LigatureSubtable>),
    #[serde(rename = "gpos_single")]
    GposSingle(LookupBody<IndexMap<String, Value>>),
    #[serde(rename = "gpos_pair")]
    GposPair(LookupBody<PairSubtable>),
    #[serde(rename = "gpos_mark_to_base")]
    GposMarkToBase(LookupBody<MarkToBaseSubtable>),
    #[serde(rename = "gpos_mark_to_mark")]
    GposMarkToMark(LookupBody<MarkToMarkSubtable>),
    #[serde(rename = "gpos_mark_to_ligature")]
    GposMarkToLigature(LookupBody<MarkToLigatureSubtable>),
    #[serde(rename = "gpos_cursive")]
    GposCursive(LookupBody<IndexMap<String, Value>>),
    #[serde(rename = "gpos_context")]
    GposContext(LookupBody<ContextSubtable>),
    #[serde(rename = "gpos_chaining")]
    GposChaining(LookupBody<ChainingSubtable>),
}

impl KnownLookup {
    pub fn kind(&self) -> &'static str {
        match self {
            KnownLookup::GsubSingle(_) => "gsub_single",
            KnownLookup::GsubMultiple(_) => "gsub_multiple",
            KnownLookup::GsubAlternate(_) => "gsub_alternate",
            KnownLookup::GsubLigature(_) => "gsub_ligature",
            KnownLookup::GposSingle(_) => "gpos_single",
            KnownLookup::GposPair(_) => "gpos_pair",
            KnownLookup::GposMarkToBase(_) => "gpos_mark_to_base",
            KnownLookup::GposMarkToMark(_) => "gpos_mark_to_mark",
            KnownLookup::GposMarkToLigature(_) => "gpos_mark_to_ligature",
            KnownLookup::GposCursive(_) => "gpos_cursive",
            KnownLookup::GposContext(_) => "gpos_context",
            KnownLookup::GposChaining(_) => "gpos_chaining",
        }
    }
}

/// The fields every lookup carries around its typed subtable list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupBody<T> {
    #[serde(default)]
    pub flags: Map<String, Value>,
    pub subtables: Vec<T>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl<T> LookupBody<T> {
    pub fn new(subtables: Vec<T>) -> Self {
        Self {
            flags: Map::new(),
            subtables,
            rest: Map::new(),
        }
    }
}

/// One subtable of a ligature lookup: ordered many-to-one rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LigatureSubtable {
    pub substitutions: Vec<LigatureRule>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl LigatureSubtable {
    pub fn new(substitutions: Vec<LigatureRule>) -> Self {
        Self {
            substitutions,
            rest: Map::new(),
        }
    }
}

/// A ligature rule consuming the `from` glyph sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LigatureRule {
    #[serde(rename = "from")]
    pub components: Vec<String>,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSubtable {
    pub first: IndexMap<String, Value>,
    pub second: IndexMap<String, Value>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkToBaseSubtable {
    pub marks: IndexMap<String, Value>,
    pub bases: IndexMap<String, Value>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkToMarkSubtable {
    pub marks: IndexMap<String, Value>,
    pub mark2s: IndexMap<String, Value>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Mark-to-ligature attachment: `bases` maps a ligature glyph to its
/// per-component anchor maps, which are themselves keyed by glyph name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkToLigatureSubtable {
    pub marks: IndexMap<String, Value>,
    pub bases: IndexMap<String, IndexMap<String, IndexMap<String, Value>>>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Contextual positioning subtables come in three shapes, distinguished
/// by which fields are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextSubtable {
    Rules(RuleContext),
    CoveragePos(CoverageContext),
    Classes(ClassContext),
    Other(Value),
}

/// Chained contextual subtables: only the rule-list shape is edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainingSubtable {
    Rules(RuleContext),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleContext {
    pub rules: Vec<ContextRule>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Coverage format: `coverage[i]` pairs with `pos[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageContext {
    pub coverage: Vec<String>,
    pub pos: Vec<Value>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassContext {
    pub classes: Vec<Vec<String>>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// One contextual rule. All participant lists may be absent in the dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextRule {
    #[serde(default)]
    pub input: Vec<String>,
    #[serde(default)]
    pub backtrack: Vec<String>,
    #[serde(default)]
    pub lookahead: Vec<String>,
    #[serde(default)]
    pub lookups: Vec<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl ContextRule {
    /// Whether the rule names `glyph` in any participant position.
    pub fn references(&self, glyph: &str) -> bool {
        self.input.iter().any(|g| g == glyph)
            || self.backtrack.iter().any(|g| g == glyph)
            || self.lookahead.iter().any(|g| g == glyph)
            || self.lookups.iter().any(|g| g == glyph)
    }
}
