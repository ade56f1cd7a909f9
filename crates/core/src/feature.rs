//! Assembly of the three-stage conversion feature.
//!
//! Word conversion runs as a ligature pass into per-word placeholder
//! glyphs, then a single-substitution pass over leftover characters,
//! then a multiple-substitution pass expanding placeholders into the
//! converted words. The ligature pass must come first so multi-character
//! spans are consumed before any single character is converted.

use indexmap::IndexMap;

use crate::{
    MAX_GLYPH_COUNT, Result,
    chunk::{SUBTABLE_MAX_COUNT, chunk, chunk_by_key},
    convert::{CharEntry, WordEntry},
    document::FontDocument,
    error::Error,
    lookup::{KnownLookup, LigatureRule, LigatureSubtable, Lookup, LookupBody},
};

/// Lookup names of the three conversion stages, in application order.
pub const WORD_TO_PLACEHOLDER: &str = "word2pseu";
pub const CHAR_TO_CHAR: &str = "char2char";
pub const PLACEHOLDER_TO_WORD: &str = "pseu2word";

impl FontDocument {
    /// Register `feature_name` with no lookups, active in every
    /// language system so the feature is selectable regardless of
    /// script/language.
    pub fn insert_empty_feature(&mut self, feature_name: &str) -> Result<()> {
        let gsub = self.gsub_mut()?;
        for language in gsub.languages.values_mut() {
            language.features.push(feature_name.to_owned());
        }
        gsub.features.insert(feature_name.to_owned(), Vec::new());
        Ok(())
    }

    /// Synthesize the conversion lookups and register them under
    /// `feature_name`.
    ///
    /// Allocates one zero-width placeholder glyph per word entry, then
    /// builds `word2pseu` (ligature), `char2char` (single), and
    /// `pseu2word` (multiple), appending them to the feature and the
    /// global lookup order in exactly that sequence.
    pub fn synthesize_conversion_lookups(
        &mut self,
        feature_name: &str,
        word_entries: &[WordEntry],
        char_entries: &[CharEntry],
    ) -> Result<()> {
        let glyph_count = self.glyph_count();
        if MAX_GLYPH_COUNT - glyph_count < word_entries.len() {
            return Err(Error::GlyphCapacity {
                glyph_count,
                word_entries: word_entries.len(),
            });
        }

        let mut word_to_placeholder: Vec<(Vec<String>, String)> =
            Vec::with_capacity(word_entries.len());
        let mut placeholder_to_word: Vec<(String, Vec<String>)> =
            Vec::with_capacity(word_entries.len());

        for (index, entry) in word_entries.iter().enumerate() {
            let placeholder = format!("pseu{index:X}");
            let source = self.glyph_names(&entry.source)?;
            let target = self.glyph_names(&entry.target)?;
            self.insert_empty_glyph(&placeholder);
            word_to_placeholder.push((source, placeholder.clone()));
            placeholder_to_word.push((placeholder, target));
        }

        let char_pairs: Vec<(String, String)> = char_entries
            .iter()
            .map(|entry| {
                Ok((
                    self.glyph_name(entry.source)?.to_owned(),
                    self.glyph_name(entry.target)?.to_owned(),
                ))
            })
            .collect::<Result<_>>()?;

        self.register_lookup(
            feature_name,
            WORD_TO_PLACEHOLDER,
            word_to_placeholder_lookup(&word_to_placeholder),
        )?;
        self.register_lookup(feature_name, CHAR_TO_CHAR, char_to_char_lookup(&char_pairs))?;
        self.register_lookup(
            feature_name,
            PLACEHOLDER_TO_WORD,
            placeholder_to_word_lookup(&placeholder_to_word),
        )?;

        Ok(())
    }

    fn glyph_names(&self, codepoints: &[u32]) -> Result<Vec<String>> {
        codepoints
            .iter()
            .map(|&codepoint| self.glyph_name(codepoint).map(str::to_owned))
            .collect()
    }

    fn register_lookup(
        &mut self,
        feature_name: &str,
        lookup_name: &str,
        lookup: Lookup,
    ) -> Result<()> {
        let gsub = self.gsub_mut()?;
        gsub.features
            .entry(feature_name.to_owned())
            .or_default()
            .push(lookup_name.to_owned());
        gsub.lookups.insert(lookup_name.to_owned(), lookup);
        gsub.lookup_order.push(lookup_name.to_owned());
        Ok(())
    }
}

/// Ligature lookup consuming word glyph sequences. Chunked by source
/// length so a subtable never mixes sequence lengths; the input arrives
/// longest-first and the ligature matcher takes the first satisfying
/// rule in subtable order, which yields longest-match semantics.
fn word_to_placeholder_lookup(conversions: &[(Vec<String>, String)]) -> Lookup {
    let subtables = chunk_by_key(conversions, SUBTABLE_MAX_COUNT, |(source, _)| source.len())
        .map(|group| {
            LigatureSubtable::new(
                group
                    .iter()
                    .map(|(source, placeholder)| LigatureRule {
                        components: source.clone(),
                        to: placeholder.clone(),
                    })
                    .collect(),
            )
        })
        .collect();
    Lookup::Known(KnownLookup::GsubLigature(LookupBody::new(subtables)))
}

fn char_to_char_lookup(conversions: &[(String, String)]) -> Lookup {
    let subtables = chunk(conversions, SUBTABLE_MAX_COUNT)
        .map(|group| group.iter().cloned().collect::<IndexMap<_, _>>())
        .collect();
    Lookup::Known(KnownLookup::GsubSingle(LookupBody::new(subtables)))
}

fn placeholder_to_word_lookup(conversions: &[(String, Vec<String>)]) -> Lookup {
    let subtables = chunk_by_key(conversions, SUBTABLE_MAX_COUNT, |(_, target)| target.len())
        .map(|group| group.iter().cloned().collect::<IndexMap<_, _>>())
        .collect();
    Lookup::Known(KnownLookup::GsubMultiple(LookupBody::new(subtables)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> FontDocument {
        let mut doc: FontDocument = serde_json::from_value(json!({
            "cmap": {"97": "a", "98": "b", "99": "c", "120": "x", "121": "y"},
            "glyph_order": [".notdef", "a", "b", "c", "x", "y"],
            "glyf": {
                ".notdef": {}, "a": {}, "b": {}, "c": {}, "x": {}, "y": {}
            },
            "GSUB": {
                "languages": {
                    "hani_dflt": {"features": ["ccmp_00000"]},
                    "hani_ZHH ": {"features": []}
                },
                "features": {"ccmp_00000": []},
                "lookups": {},
                "lookupOrder": []
            }
        }))
        .unwrap();
        doc.decorate();
        doc
    }

    fn word(source: &[u32], target: &[u32]) -> WordEntry {
        WordEntry {
            source: source.to_vec(),
            target: target.to_vec(),
        }
    }

    #[test]
    fn test_feature_attached_to_every_language() {
        let mut doc = sample();
        doc.insert_empty_feature("liga_s2t").unwrap();
        let gsub = doc.gsub.as_ref().unwrap();
        for language in gsub.languages.values() {
            assert!(language.features.contains(&"liga_s2t".to_string()));
        }
        assert_eq!(gsub.features["liga_s2t"], Vec::<String>::new());
    }

    #[test]
    fn test_three_lookups_in_fixed_order() {
        let mut doc = sample();
        doc.insert_empty_feature("liga_s2t").unwrap();
        doc.synthesize_conversion_lookups(
            "liga_s2t",
            &[word(&[97, 98], &[120, 121])],
            &[CharEntry {
                source: 97,
                target: 120,
            }],
        )
        .unwrap();

        let gsub = doc.gsub.as_ref().unwrap();
        let expected = ["word2pseu", "char2char", "pseu2word"];
        assert_eq!(gsub.features["liga_s2t"], expected);
        assert_eq!(gsub.lookup_order, expected);
    }

    #[test]
    fn test_placeholder_glyphs_are_allocated() {
        let mut doc = sample();
        doc.insert_empty_feature("liga_s2t").unwrap();
        doc.synthesize_conversion_lookups(
            "liga_s2t",
            &[word(&[97, 98], &[120]), word(&[98, 99], &[121])],
            &[],
        )
        .unwrap();

        assert!(doc.glyph_order.ends_with(&["pseu0".into(), "pseu1".into()]));
        assert_eq!(doc.glyf["pseu0"].advance_width, Some(0.0));

        let gsub = doc.gsub.as_ref().unwrap();
        let Lookup::Known(KnownLookup::GsubMultiple(body)) = &gsub.lookups["pseu2word"] else {
            panic!("pseu2word missing");
        };
        assert_eq!(body.subtables[0]["pseu0"], vec!["x".to_string()]);
        assert_eq!(body.subtables[0]["pseu1"], vec!["y".to_string()]);
    }

    #[test]
    fn test_longest_match_rule_ordering() {
        let mut doc = sample();
        doc.insert_empty_feature("liga_s2t").unwrap();
        // Already sorted longest-source-first, as the loader guarantees.
        doc.synthesize_conversion_lookups(
            "liga_s2t",
            &[word(&[97, 98, 99], &[120]), word(&[97, 98], &[121])],
            &[],
        )
        .unwrap();

        let gsub = doc.gsub.as_ref().unwrap();
        let Lookup::Known(KnownLookup::GsubLigature(body)) = &gsub.lookups["word2pseu"] else {
            panic!("word2pseu missing");
        };
        // Different source lengths never share a subtable, and the
        // 3-glyph rule comes before the 2-glyph rule.
        assert_eq!(body.subtables.len(), 2);
        assert_eq!(body.subtables[0].substitutions[0].components, ["a", "b", "c"]);
        assert_eq!(body.subtables[1].substitutions[0].components, ["a", "b"]);
    }

    #[test]
    fn test_char_only_build_leaves_word_lookups_empty() {
        let mut doc = sample();
        doc.insert_empty_feature("liga_s2t").unwrap();
        doc.synthesize_conversion_lookups(
            "liga_s2t",
            &[],
            &[CharEntry {
                source: 97,
                target: 120,
            }],
        )
        .unwrap();

        let gsub = doc.gsub.as_ref().unwrap();
        let Lookup::Known(KnownLookup::GsubLigature(body)) = &gsub.lookups["word2pseu"] else {
            panic!("word2pseu missing");
        };
        assert!(body.subtables.is_empty());
        let Lookup::Known(KnownLookup::GsubSingle(body)) = &gsub.lookups["char2char"] else {
            panic!("char2char missing");
        };
        assert_eq!(body.subtables[0]["a"], "x");
    }

    #[test]
    fn test_glyph_capacity_is_fatal() {
        let mut doc = sample();
        doc.insert_empty_feature("liga_s2t").unwrap();
        doc.glyph_order = (0..MAX_GLYPH_COUNT - 1).map(|i| format!("g{i}")).collect();

        let err = doc
            .synthesize_conversion_lookups(
                "liga_s2t",
                &[word(&[97], &[120]), word(&[98], &[121])],
                &[],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::GlyphCapacity {
                glyph_count,
                word_entries: 2
            } if glyph_count == MAX_GLYPH_COUNT - 1
        ));
    }

    #[test]
    fn test_missing_cmap_entry_is_invariant_violation() {
        let mut doc = sample();
        doc.insert_empty_feature("liga_s2t").unwrap();
        let err = doc
            .synthesize_conversion_lookups("liga_s2t", &[word(&[0x4E00], &[120])], &[])
            .unwrap_err();
        assert!(matches!(err, Error::MissingGlyph(0x4E00)));
    }
}
