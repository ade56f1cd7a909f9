//! Conversion dictionary loading.
//!
//! The dictionaries are flat UTF-8 files of `source<TAB>target` lines,
//! one per conversion pair, produced from OpenCC data. Entries whose
//! codepoints the font cannot display on either side are dropped, so
//! everything downstream can map codepoints to glyphs unconditionally.

use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::{Result, error::Error};

/// Which OpenCC conversion flavor to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    /// Plain Traditional Chinese.
    #[default]
    Standard,
    /// Traditional Chinese with Taiwan phrase conversion.
    TaiwanPhrases,
}

impl Dialect {
    /// Suffix on the dictionary file names.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Dialect::Standard => "",
            Dialect::TaiwanPhrases => "_twp",
        }
    }

    pub fn char_table_path(self, data_dir: &Path) -> PathBuf {
        data_dir.join(format!("convert_table_chars{}.txt", self.file_suffix()))
    }

    pub fn word_table_path(self, data_dir: &Path) -> PathBuf {
        data_dir.join(format!("convert_table_words{}.txt", self.file_suffix()))
    }
}

/// A single-character conversion pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharEntry {
    pub source: u32,
    pub target: u32,
}

/// A word-level conversion pair. Both sides are codepoint sequences of
/// length ≥ 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub source: Vec<u32>,
    pub target: Vec<u32>,
}

/// Load single-character conversion pairs, keeping only entries whose
/// source and target the font covers.
pub fn load_char_table(
    reader: impl BufRead,
    coverage: &HashSet<u32>,
) -> Result<Vec<CharEntry>> {
    let mut entries = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let (source, target) = split_pair(&line, index + 1)?;
        let source = single_codepoint(source, index + 1)?;
        let target = single_codepoint(target, index + 1)?;

        if coverage.contains(&source) && coverage.contains(&target) {
            entries.push(CharEntry { source, target });
        }
    }

    Ok(entries)
}

/// Load word conversion pairs, keeping only entries fully covered by the
/// font on both sides.
///
/// The file must be sorted longest-source-first; that ordering is what
/// gives the ligature lookup its longest-match behavior downstream, so a
/// violation fails the load instead of producing a wrong font.
pub fn load_word_table(
    reader: impl BufRead,
    coverage: &HashSet<u32>,
) -> Result<Vec<WordEntry>> {
    let mut entries = Vec::new();
    let mut previous_len = usize::MAX;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let (source, target) = split_pair(&line, index + 1)?;
        let source: Vec<u32> = source.chars().map(u32::from).collect();
        let target: Vec<u32> = target.chars().map(u32::from).collect();
        if source.is_empty() || target.is_empty() {
            return Err(Error::BadDictionaryLine { line: index + 1 });
        }

        if source.len() > previous_len {
            return Err(Error::UnsortedWordTable { line: index + 1 });
        }
        previous_len = source.len();

        if source.iter().all(|codepoint| coverage.contains(codepoint))
            && target.iter().all(|codepoint| coverage.contains(codepoint))
        {
            entries.push(WordEntry { source, target });
        }
    }

    Ok(entries)
}

pub fn load_char_table_file(
    data_dir: &Path,
    dialect: Dialect,
    coverage: &HashSet<u32>,
) -> Result<Vec<CharEntry>> {
    let file = File::open(dialect.char_table_path(data_dir))?;
    load_char_table(BufReader::new(file), coverage)
}

pub fn load_word_table_file(
    data_dir: &Path,
    dialect: Dialect,
    coverage: &HashSet<u32>,
) -> Result<Vec<WordEntry>> {
    let file = File::open(dialect.word_table_path(data_dir))?;
    load_word_table(BufReader::new(file), coverage)
}

fn split_pair(line: &str, number: usize) -> Result<(&str, &str)> {
    line.split_once('\t')
        .ok_or(Error::BadDictionaryLine { line: number })
}

fn single_codepoint(text: &str, number: usize) -> Result<u32> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(u32::from(c)),
        _ => Err(Error::BadDictionaryLine { line: number }),
    }
}
