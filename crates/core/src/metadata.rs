//! Name table and revision patching.
//!
//! The output name table comes from a JSON template of name records
//! whose strings carry placeholder tokens for the style, version, and
//! build date.

use std::path::Path;

use chrono::Local;

use crate::{Result, document::{FontDocument, Head, NameRecord}};

const STYLE_TOKEN: &str = "<Typographic Subfamily Name>";
const VERSION_TOKEN: &str = "<Version>";
const DATE_TOKEN: &str = "<Date>";

/// Parse a name-header template and substitute the placeholder tokens.
pub fn render_name_header(
    template: &str,
    style: &str,
    version: &str,
    date: &str,
) -> Result<Vec<NameRecord>> {
    let mut records: Vec<NameRecord> = serde_json::from_str(template)?;
    for record in &mut records {
        record.name_string = record
            .name_string
            .replace(STYLE_TOKEN, style)
            .replace(VERSION_TOKEN, version)
            .replace(DATE_TOKEN, date);
    }
    Ok(records)
}

/// Version rendered the way the template expects: always with a
/// fractional part.
fn version_string(font_version: f64) -> String {
    if font_version.fract() == 0.0 {
        format!("{font_version:.1}")
    } else {
        font_version.to_string()
    }
}

impl FontDocument {
    /// Style string for the name header: the first typographic
    /// subfamily (ID 17) or subfamily (ID 2) record, in table order.
    pub fn style_name(&self) -> &str {
        self.name
            .iter()
            .find(|record| matches!(record.name_id, 17 | 2))
            .map(|record| record.name_string.as_str())
            .unwrap_or("Regular")
    }

    /// Replace the name table from the template and stamp the revision.
    pub fn apply_metadata(&mut self, name_header: &Path, font_version: f64) -> Result<()> {
        let template = std::fs::read_to_string(name_header)?;
        let today = Local::now().format("%b %d, %Y").to_string();
        let records = render_name_header(
            &template,
            self.style_name(),
            &version_string(font_version),
            &today,
        )?;

        self.head.get_or_insert_with(Head::default).font_revision = font_version;
        self.name = records;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_substitutes_all_tokens() {
        let template = json!([
            {
                "platformID": 3, "encodingID": 1, "languageID": 1033, "nameID": 5,
                "nameString": "Version <Version>; <Date>"
            },
            {
                "platformID": 3, "encodingID": 1, "languageID": 1033, "nameID": 17,
                "nameString": "<Typographic Subfamily Name>"
            }
        ])
        .to_string();

        let records = render_name_header(&template, "Bold", "2.1", "Aug 30, 2026").unwrap();
        assert_eq!(records[0].name_string, "Version 2.1; Aug 30, 2026");
        assert_eq!(records[1].name_string, "Bold");
    }

    #[test]
    fn test_style_name_prefers_first_17_or_2() {
        let mut doc: FontDocument = serde_json::from_value(json!({
            "cmap": {},
            "glyph_order": [],
            "glyf": {},
            "name": [
                {"platformID": 3, "encodingID": 1, "languageID": 1033, "nameID": 1,
                 "nameString": "Family"},
                {"platformID": 3, "encodingID": 1, "languageID": 1033, "nameID": 2,
                 "nameString": "Bold"},
                {"platformID": 3, "encodingID": 1, "languageID": 1033, "nameID": 17,
                 "nameString": "Heavy"}
            ]
        }))
        .unwrap();
        assert_eq!(doc.style_name(), "Bold");

        doc.name.clear();
        assert_eq!(doc.style_name(), "Regular");
    }

    #[test]
    fn test_version_string_keeps_fraction() {
        assert_eq!(version_string(1.0), "1.0");
        assert_eq!(version_string(2.031), "2.031");
    }
}
