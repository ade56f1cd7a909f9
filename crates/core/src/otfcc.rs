//! The otfcc decode/encode process boundary.
//!
//! Binary font parsing is delegated entirely to `otfccdump` and
//! `otfccbuild`; the engine only ever sees the textual document. Each
//! call either yields a full document (or output file) or fails the
//! build. No retry: font inputs are deterministic, a tool failure will
//! not change on a second run.

use std::{
    io::Write,
    path::Path,
    process::{Command, Stdio},
};

use log::info;

use crate::{Result, document::FontDocument, error::Error};

/// Decode a font file into a document, with the reverse character map
/// already built.
pub fn load_font(path: &Path, ttc_index: Option<u32>) -> Result<FontDocument> {
    let mut command = Command::new("otfccdump");
    command.arg(path);
    if let Some(index) = ttc_index {
        command.args(["--ttc-index", &index.to_string()]);
    }

    info!("Decoding {}", path.display());
    let output = command.stderr(Stdio::inherit()).output()?;
    if !output.status.success() {
        return Err(Error::Tool {
            tool: "otfccdump",
            status: output.status,
        });
    }

    let mut doc: FontDocument = serde_json::from_slice(&output.stdout)?;
    doc.decorate();
    Ok(doc)
}

/// Encode a document to a font file.
pub fn save_font(doc: &FontDocument, path: &Path) -> Result<()> {
    let payload = doc.to_json()?;

    info!("Encoding {}", path.display());
    let mut child = Command::new("otfccbuild")
        .arg("-o")
        .arg(path)
        .stdin(Stdio::piped())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(payload.as_bytes())?;
    }

    let status = child.wait()?;
    if !status.success() {
        return Err(Error::Tool {
            tool: "otfccbuild",
            status,
        });
    }
    Ok(())
}
