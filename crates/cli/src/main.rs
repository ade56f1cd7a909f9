use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use hanconv_core::{BuildOptions, Dialect, build_font};

#[derive(Parser)]
#[command(name = "hanconv-fonts")]
#[command(about = "Build a font whose GSUB feature converts Simplified to Traditional Chinese")]
struct Cli {
    /// Input font file (TTF/OTF/TTC)
    input: PathBuf,

    /// Output font file
    output: PathBuf,

    /// Name-table template with style/version/date placeholder tokens
    #[arg(long, default_value = "name_header.json")]
    name_header: PathBuf,

    /// Directory holding the conversion dictionaries and the Han
    /// codepoint allow-list
    #[arg(long, default_value = "cache")]
    data_dir: PathBuf,

    /// Font version, written to head.fontRevision and the name table
    #[arg(short, long)]
    version: f64,

    /// Font index for TTC inputs
    #[arg(long)]
    ttc_index: Option<u32>,

    /// Use the Taiwan phrase conversion tables
    #[arg(long)]
    twp: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let dialect = if cli.twp {
        Dialect::TaiwanPhrases
    } else {
        Dialect::Standard
    };

    build_font(&BuildOptions {
        input: cli.input,
        output: cli.output,
        name_header: cli.name_header,
        data_dir: cli.data_dir,
        version: cli.version,
        ttc_index: cli.ttc_index,
        dialect,
    })?;
    Ok(())
}
