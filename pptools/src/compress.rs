use clap::Args;
use pokepack::{compression_ratio, CodecGateway, Format};
use std::path::PathBuf;

use crate::text_io::{read_input, write_output};

#[derive(Debug, Args)]
pub struct Opts {
    /// Paste to compress, stdin if omitted
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Where to write the payload, stdout if omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(short, long)]
    pub format: Option<Format>,
}

pub fn run(
    opts: Opts,
    gateway: &CodecGateway,
    default_format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let paste = read_input(opts.input.as_deref())?;
    if paste.trim().is_empty() {
        return Err("Nothing to compress, the paste is empty".into());
    }

    let format = opts.format.unwrap_or(default_format);
    let encoded = gateway.encode(&paste, format)?;
    write_output(opts.output.as_deref(), encoded.as_str())?;

    eprintln!(
        "Compression Ratio: {:.2}:1",
        compression_ratio(&paste, encoded.as_str())
    );
    Ok(())
}
