//! End-to-end engine scenario on an in-memory document, covering the
//! full stage sequence between decode and encode.

use std::collections::HashSet;

use hanconv_core::{
    FontDocument,
    convert::{load_char_table, load_word_table},
    lookup::{KnownLookup, Lookup},
};
use serde_json::json;

/// A font covering "大" (U+5927), "小" (U+5C0F), "国" (U+56FD), Latin
/// "A", and one glyph reachable only from a codepoint that gets
/// trimmed.
fn decoded_font() -> FontDocument {
    let mut doc: FontDocument = serde_json::from_value(json!({
        "cmap": {
            "22823": "uni5927",
            "23567": "uni5C0F",
            "22269": "uni56FD",
            "65": "A",
            "1488": "alef"
        },
        "glyph_order": [".notdef", "A", "alef", "uni5927", "uni5C0F", "uni56FD"],
        "glyf": {
            ".notdef": {"advanceWidth": 500},
            "A": {"advanceWidth": 600},
            "alef": {"advanceWidth": 600},
            "uni5927": {"advanceWidth": 1000},
            "uni5C0F": {"advanceWidth": 1000},
            "uni56FD": {"advanceWidth": 1000}
        },
        "GSUB": {
            "languages": {
                "hani_dflt": {"features": []},
                "latn_dflt": {"features": []}
            },
            "features": {},
            "lookups": {},
            "lookupOrder": []
        },
        "head": {"fontRevision": 0.5, "unitsPerEm": 1000}
    }))
    .unwrap();
    doc.decorate();
    doc
}

#[test]
fn test_char_only_conversion_build() {
    let mut font = decoded_font();

    let codepoints_font = font.codepoints();
    let entries_char = load_char_table("大\t小\n".as_bytes(), &codepoints_font).unwrap();
    let entries_word = load_word_table("".as_bytes(), &codepoints_font).unwrap();
    assert_eq!(entries_char.len(), 1);
    assert!(entries_word.is_empty());

    // Retain Han targets plus basic Latin; U+05D0 falls outside every
    // allowed range.
    let codepoints_final: HashSet<u32> =
        HashSet::from([0x5927, 0x5C0F, 0x56FD, 0x41]);
    let trimmed: Vec<u32> = codepoints_font
        .difference(&codepoints_final)
        .copied()
        .collect();
    font.remove_codepoints(trimmed);
    font.clean_unused_glyphs().unwrap();

    assert!(!font.glyph_order.contains(&"alef".to_string()));
    assert!(font.glyph_order.contains(&"A".to_string()));

    font.insert_empty_feature("liga_s2t").unwrap();
    font.synthesize_conversion_lookups("liga_s2t", &entries_word, &entries_char)
        .unwrap();

    let gsub = font.gsub.as_ref().unwrap();

    // The feature is active in every language system.
    for language in gsub.languages.values() {
        assert!(language.features.contains(&"liga_s2t".to_string()));
    }
    assert_eq!(
        gsub.features["liga_s2t"],
        ["word2pseu", "char2char", "pseu2word"]
    );
    assert_eq!(gsub.lookup_order, ["word2pseu", "char2char", "pseu2word"]);

    // The character stage maps the 大 glyph to the 小 glyph.
    let Lookup::Known(KnownLookup::GsubSingle(body)) = &gsub.lookups["char2char"] else {
        panic!("char2char missing");
    };
    assert_eq!(body.subtables.len(), 1);
    assert_eq!(body.subtables[0]["uni5927"], "uni5C0F");

    // No word entries, so both word stages are empty.
    let Lookup::Known(KnownLookup::GsubLigature(body)) = &gsub.lookups["word2pseu"] else {
        panic!("word2pseu missing");
    };
    assert!(body.subtables.is_empty());
    let Lookup::Known(KnownLookup::GsubMultiple(body)) = &gsub.lookups["pseu2word"] else {
        panic!("pseu2word missing");
    };
    assert!(body.subtables.is_empty());
    assert!(!font.glyph_order.iter().any(|name| name.starts_with("pseu")));
}

#[test]
fn test_word_conversion_build_round_trips_to_encoder_form() {
    let mut font = decoded_font();

    let codepoints_font = font.codepoints();
    // 大国 → 小国 as a word, plus 大 → 小 alone.
    let entries_word =
        load_word_table("大国\t小国\n".as_bytes(), &codepoints_font).unwrap();
    let entries_char = load_char_table("大\t小\n".as_bytes(), &codepoints_font).unwrap();

    font.insert_empty_feature("liga_s2t").unwrap();
    font.synthesize_conversion_lookups("liga_s2t", &entries_word, &entries_char)
        .unwrap();

    assert!(font.glyph_order.contains(&"pseu0".to_string()));
    assert_eq!(font.glyf["pseu0"].advance_width, Some(0.0));

    let gsub = font.gsub.as_ref().unwrap();
    let Lookup::Known(KnownLookup::GsubLigature(body)) = &gsub.lookups["word2pseu"] else {
        panic!("word2pseu missing");
    };
    assert_eq!(body.subtables[0].substitutions[0].components, ["uni5927", "uni56FD"]);
    assert_eq!(body.subtables[0].substitutions[0].to, "pseu0");

    // The document the encoder receives has no cmap_rev and parses
    // back identically.
    let encoded = font.to_json().unwrap();
    assert!(!encoded.contains("cmap_rev"));
    let reparsed = FontDocument::from_json(&encoded).unwrap();
    assert_eq!(reparsed.glyph_order, font.glyph_order);
    assert_eq!(reparsed.cmap, font.cmap);
    assert_eq!(
        reparsed.gsub.as_ref().unwrap().lookup_order,
        ["word2pseu", "char2char", "pseu2word"]
    );
}
