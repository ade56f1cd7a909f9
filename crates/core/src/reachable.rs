//! Reachability analysis over the retained character map.

use std::collections::HashSet;

use crate::{
    Result,
    document::FontDocument,
    error::Error,
    lookup::{KnownLookup, Lookup},
};

impl FontDocument {
    /// The closure of glyphs reachable from the cmap through GSUB
    /// substitution.
    ///
    /// Only `gsub_single`, `gsub_alternate`, and `gsub_ligature` are
    /// followed; these are the shapes the generator produces and expects
    /// in its input corpus. Any other GSUB lookup type makes the closure
    /// unsound, so it fails instead of proceeding silently.
    pub fn reachable_glyphs(&self) -> Result<HashSet<String>> {
        let mut reachable: HashSet<String> =
            [".notdef".to_string(), ".null".to_string()].into();

        let cmap_glyphs: HashSet<&str> = self.cmap.values().map(String::as_str).collect();
        reachable.extend(cmap_glyphs.iter().map(|name| name.to_string()));

        let Some(gsub) = &self.gsub else {
            return Ok(reachable);
        };

        for (lookup_name, lookup) in &gsub.lookups {
            match lookup {
                Lookup::Known(KnownLookup::GsubSingle(body)) => {
                    for subtable in &body.subtables {
                        for (from, to) in subtable {
                            if cmap_glyphs.contains(from.as_str()) {
                                reachable.insert(to.clone());
                            }
                        }
                    }
                }
                Lookup::Known(KnownLookup::GsubAlternate(body)) => {
                    for subtable in &body.subtables {
                        for (from, alternates) in subtable {
                            if cmap_glyphs.contains(from.as_str()) {
                                reachable.extend(alternates.iter().cloned());
                            }
                        }
                    }
                }
                Lookup::Known(KnownLookup::GsubLigature(body)) => {
                    for subtable in &body.subtables {
                        for rule in &subtable.substitutions {
                            if rule
                                .components
                                .iter()
                                .any(|name| cmap_glyphs.contains(name.as_str()))
                            {
                                reachable.insert(rule.to.clone());
                            }
                        }
                    }
                }
                other => {
                    return Err(Error::UnsupportedGsubLookup {
                        lookup: lookup_name.clone(),
                        kind: other.kind().to_string(),
                    });
                }
            }
        }

        Ok(reachable)
    }

    /// Remove every glyph outside the reachability closure.
    ///
    /// Reachability is computed once from the retained cmap, so glyphs
    /// referenced only by other unreachable glyphs fall in the same
    /// sweep.
    pub fn clean_unused_glyphs(&mut self) -> Result<()> {
        let reachable = self.reachable_glyphs()?;
        let unused: Vec<String> = self
            .glyph_order
            .iter()
            .filter(|name| !reachable.contains(*name))
            .cloned()
            .collect();

        for glyph_name in &unused {
            self.remove_associated_codepoints_of_glyph(glyph_name);
            self.remove_glyph(glyph_name);
        }

        Ok(())
    }
}
