//! Codepoint and glyph removal with cross-table integrity.
//!
//! A glyph name can appear in `glyph_order`, `glyf`, every GSUB/GPOS
//! lookup subtable, and BASE coordinate maps. Removal must visit all of
//! them, in variant-specific positions, or a later encode fails on a
//! dangling reference.

use indexmap::IndexMap;
use log::warn;
use serde_json::Value;

use crate::{
    document::FontDocument,
    lookup::{ChainingSubtable, ContextSubtable, KnownLookup, Lookup},
};

impl FontDocument {
    /// Remove a codepoint, cascading into glyph removal when the glyph
    /// lost its last reference. Absent codepoints are a no-op.
    pub fn remove_codepoint(&mut self, codepoint: u32) {
        let Some(glyph_name) = self.cmap.get(&codepoint).cloned() else {
            return;
        };

        if self.disassociate(codepoint, &glyph_name) {
            self.remove_glyph(&glyph_name);
        }
    }

    /// Remove a set of codepoints. Disjoint codepoints do not interact,
    /// so the iteration order is irrelevant.
    pub fn remove_codepoints(&mut self, codepoints: impl IntoIterator<Item = u32>) {
        for codepoint in codepoints {
            self.remove_codepoint(codepoint);
        }
    }

    /// Delete every codepoint mapping to `glyph_name`, both directions.
    ///
    /// Runs before [`remove_glyph`](Self::remove_glyph) when the glyph is
    /// the deletion driver, while the reverse index still knows its
    /// codepoints.
    pub fn remove_associated_codepoints_of_glyph(&mut self, glyph_name: &str) {
        if let Some(codepoints) = self.cmap_rev.shift_remove(glyph_name) {
            for codepoint in codepoints {
                self.cmap.shift_remove(&codepoint);
            }
        }
    }

    /// Strip `glyph_name` from every table except the cmap.
    pub fn remove_glyph(&mut self, glyph_name: &str) {
        // Already-removed glyphs leave glyph_order untouched.
        self.glyph_order.retain(|name| name != glyph_name);
        self.glyf.shift_remove(glyph_name);

        if let Some(gsub) = &mut self.gsub {
            remove_from_lookups(&mut gsub.lookups, glyph_name);
        }
        if let Some(gpos) = &mut self.gpos {
            remove_from_lookups(&mut gpos.lookups, glyph_name);
        }
        if let Some(base) = &mut self.base {
            remove_from_base(base, glyph_name);
        }
    }
}

fn remove_from_lookups(lookups: &mut IndexMap<String, Lookup>, glyph_name: &str) {
    for (lookup_name, lookup) in lookups.iter_mut() {
        match lookup {
            Lookup::Known(known) => remove_from_lookup(known, lookup_name, glyph_name),
            // Other lookups still get cleaned, so an unknown type is
            // reported rather than raised.
            Lookup::Unknown(_) => warn!(
                "unknown lookup type {:?} in {lookup_name}: not cleaned for glyph {glyph_name}",
                lookup.kind()
            ),
        }
    }
}

fn remove_from_lookup(lookup: &mut KnownLookup, lookup_name: &str, glyph: &str) {
    match lookup {
        KnownLookup::GsubSingle(body) => {
            for subtable in &mut body.subtables {
                subtable.shift_remove(glyph);
                // The glyph may also be a substitution target.
                subtable.retain(|_, to| to != glyph);
            }
        }
        KnownLookup::GsubAlternate(body) => {
            for subtable in &mut body.subtables {
                subtable.shift_remove(glyph);
                for alternates in subtable.values_mut() {
                    alternates.retain(|name| name != glyph);
                }
            }
        }
        KnownLookup::GsubLigature(body) => {
            for subtable in &mut body.subtables {
                subtable.substitutions.retain(|rule| {
                    rule.to != glyph && !rule.components.iter().any(|name| name == glyph)
                });
            }
        }
        KnownLookup::GsubMultiple(body) => {
            for subtable in &mut body.subtables {
                subtable.shift_remove(glyph);
            }
        }
        KnownLookup::GposSingle(body) => {
            for subtable in &mut body.subtables {
                subtable.shift_remove(glyph);
            }
        }
        KnownLookup::GposPair(body) => {
            for subtable in &mut body.subtables {
                subtable.first.shift_remove(glyph);
                subtable.second.shift_remove(glyph);
            }
        }
        KnownLookup::GposMarkToBase(body) => {
            for subtable in &mut body.subtables {
                subtable.marks.shift_remove(glyph);
                subtable.bases.shift_remove(glyph);
            }
        }
        KnownLookup::GposMarkToMark(body) => {
            for subtable in &mut body.subtables {
                subtable.marks.shift_remove(glyph);
                subtable.mark2s.shift_remove(glyph);
            }
        }
        KnownLookup::GposMarkToLigature(body) => {
            for subtable in &mut body.subtables {
                subtable.marks.shift_remove(glyph);
                for components in subtable.bases.values_mut() {
                    for anchors in components.values_mut() {
                        anchors.shift_remove(glyph);
                    }
                }
            }
        }
        KnownLookup::GposCursive(body) => {
            for subtable in &mut body.subtables {
                subtable.shift_remove(glyph);
            }
        }
        KnownLookup::GposContext(body) => {
            for subtable in &mut body.subtables {
                match subtable {
                    ContextSubtable::Rules(context) => {
                        context.rules.retain(|rule| {
                            !rule.input.iter().any(|name| name == glyph)
                                && !rule.lookups.iter().any(|name| name == glyph)
                        });
                    }
                    ContextSubtable::CoveragePos(context) => {
                        if let Some(index) =
                            context.coverage.iter().position(|name| name == glyph)
                        {
                            context.coverage.remove(index);
                            if index < context.pos.len() {
                                context.pos.remove(index);
                            }
                        }
                    }
                    ContextSubtable::Classes(context) => {
                        for class_list in &mut context.classes {
                            class_list.retain(|name| name != glyph);
                        }
                    }
                    ContextSubtable::Other(_) => {
                        warn!("unknown subtable shape in gpos_context lookup {lookup_name}")
                    }
                }
            }
        }
        KnownLookup::GposChaining(body) => {
            for subtable in &mut body.subtables {
                match subtable {
                    ChainingSubtable::Rules(context) => {
                        context.rules.retain(|rule| !rule.references(glyph));
                    }
                    ChainingSubtable::Other(_) => {
                        warn!("unknown subtable shape in gpos_chaining lookup {lookup_name}")
                    }
                }
            }
        }
    }
}

/// Drop `glyph_name` from every `BaseCoord` map anywhere under BASE.
fn remove_from_base(value: &mut Value, glyph_name: &str) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if key == "BaseCoord" {
                    if let Value::Object(coords) = child {
                        coords.remove(glyph_name);
                    }
                } else {
                    remove_from_base(child, glyph_name);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                remove_from_base(item, glyph_name);
            }
        }
        _ => {}
    }
}
