//! The end-to-end build: one font in, one conversion font out.

use std::{collections::HashSet, path::PathBuf};

use log::info;

use crate::{
    Result,
    convert::{Dialect, load_char_table_file, load_word_table_file},
    coverage::{han_codepoints_file, non_han_codepoints},
    otfcc::{load_font, save_font},
};

/// The feature the conversion lookups register under. otfcc feature
/// keys are free-form; the leading four characters become the OpenType
/// tag on build.
pub const FEATURE_NAME: &str = "liga_s2t";

/// Everything one build needs. Each build owns its document exclusively;
/// multiple variants may run in parallel on separate options.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// JSON name-record template with style/version/date tokens.
    pub name_header: PathBuf,
    /// Directory holding the conversion dictionaries and the Han
    /// codepoint allow-list.
    pub data_dir: PathBuf,
    pub version: f64,
    /// Index into a font collection, for TTC inputs.
    pub ttc_index: Option<u32>,
    pub dialect: Dialect,
}

/// Build one conversion font.
pub fn build_font(options: &BuildOptions) -> Result<()> {
    let mut font = load_font(&options.input, options.ttc_index)?;

    // The final Unicode range is decided by the original font coverage
    // and the conversion tables.
    let codepoints_font = font.codepoints();
    let entries_char = load_char_table_file(&options.data_dir, options.dialect, &codepoints_font)?;
    let entries_word = load_word_table_file(&options.data_dir, options.dialect, &codepoints_font)?;
    info!(
        "Conversion entries: {} characters, {} words",
        entries_char.len(),
        entries_word.len()
    );

    let mut codepoints_final: HashSet<u32> = non_han_codepoints();
    codepoints_final.extend(han_codepoints_file(&options.data_dir)?);
    codepoints_final.retain(|codepoint| codepoints_font.contains(codepoint));

    let trimmed: Vec<u32> = codepoints_font
        .difference(&codepoints_final)
        .copied()
        .collect();
    info!("Trimming {} codepoints outside the target ranges", trimmed.len());
    font.remove_codepoints(trimmed);

    let glyphs_before = font.glyph_count();
    font.clean_unused_glyphs()?;
    info!(
        "Removed {} unreachable glyphs, {} remain",
        glyphs_before - font.glyph_count(),
        font.glyph_count()
    );

    font.insert_empty_feature(FEATURE_NAME)?;
    font.synthesize_conversion_lookups(FEATURE_NAME, &entries_word, &entries_char)?;

    font.apply_metadata(&options.name_header, options.version)?;
    save_font(&font, &options.output)
}
