//! Codepoint allow-lists deciding what the output font keeps.

use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::Result;

/// Non-Han ranges retained in the final font: basic Latin and Latin-1,
/// spacing modifiers, general/CJK punctuation and symbols, bopomofo,
/// kanbun, vertical and compatibility forms, and halfwidth/fullwidth
/// forms.
pub const NON_HAN_RANGES: &[(u32, u32)] = &[
    (0x0020, 0x00FF),
    (0x02B0, 0x02FF),
    (0x2002, 0x203B),
    (0x2E00, 0x2E7F),
    (0x2E80, 0x2EFF),
    (0x3000, 0x301C),
    (0x3100, 0x312F),
    (0x3190, 0x31BF),
    (0xFE10, 0xFE1F),
    (0xFE30, 0xFE4F),
    (0xFF01, 0xFF5E),
    (0xFF5F, 0xFF60),
    (0xFF61, 0xFF64),
];

/// The non-Han codepoints needed in the final font.
pub fn non_han_codepoints() -> HashSet<u32> {
    NON_HAN_RANGES
        .iter()
        .flat_map(|&(start, end)| start..=end)
        .collect()
}

/// Parse the newline-delimited decimal Han allow-list.
pub fn han_codepoints(reader: impl BufRead) -> Result<HashSet<u32>> {
    let mut codepoints = HashSet::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            codepoints.insert(trimmed.parse().map_err(|_| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("invalid codepoint in allow-list: {trimmed:?}"),
                )
            })?);
        }
    }
    Ok(codepoints)
}

pub fn han_codepoints_file(data_dir: &Path) -> Result<HashSet<u32>> {
    let file = File::open(data_dir.join("code_points_han.txt"))?;
    han_codepoints(BufReader::new(file))
}
