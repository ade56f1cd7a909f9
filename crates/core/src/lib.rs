//! # hanconv-core
//!
//! Font table transformation engine for building conversion fonts:
//! fonts whose GSUB machinery performs Simplified↔Traditional Chinese
//! conversion, so toggling one typographic feature converts the text
//! with no external software.
//!
//! The engine operates on the otfcc textual font representation.
//! Decoding and encoding binary fonts is delegated to the `otfccdump`
//! and `otfccbuild` external tools (see [`otfcc`]). Everything in
//! between, from coverage trimming to synthesis of the three-stage
//! conversion feature, happens on the typed in-memory [`FontDocument`].
//!
//! ## Example
//!
//! ```no_run
//! use hanconv_core::{BuildOptions, Dialect, build_font};
//!
//! build_font(&BuildOptions {
//!     input: "SourceHanSans.ttf".into(),
//!     output: "SourceHanSansConv.ttf".into(),
//!     name_header: "name_header.json".into(),
//!     data_dir: "cache".into(),
//!     version: 1.0,
//!     ttc_index: None,
//!     dialect: Dialect::Standard,
//! })?;
//! # Ok::<(), hanconv_core::Error>(())
//! ```

pub mod chunk;
pub mod convert;
pub mod coverage;
pub mod document;
pub mod error;
pub mod feature;
pub mod lookup;
pub mod metadata;
pub mod otfcc;
pub mod pipeline;
mod prune;
mod reachable;

pub use convert::{CharEntry, Dialect, WordEntry};
pub use document::{FontDocument, Glyph, LayoutTable, MAX_GLYPH_COUNT};
pub use error::{Error, Result};
pub use pipeline::{BuildOptions, FEATURE_NAME, build_font};
