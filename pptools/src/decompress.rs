use clap::Args;
use pokepack::{CodecGateway, DecodeError};
use std::path::PathBuf;

use crate::text_io::{read_input, write_output};

#[derive(Debug, Args)]
pub struct Opts {
    /// Hex or Base64 payload, stdin if omitted
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Where to write the paste, stdout if omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(opts: Opts, gateway: &CodecGateway) -> Result<(), Box<dyn std::error::Error>> {
    let payload = read_input(opts.input.as_deref())?;
    if payload.trim().is_empty() {
        return Err("Nothing to decode, the payload is empty".into());
    }
    let decoded = gateway.decode_detailed(&payload).map_err(|err| {
        log_attempts(&err);
        err
    })?;
    log::info!("Payload was {}", decoded.format);
    write_output(opts.output.as_deref(), &decoded.text)?;
    Ok(())
}

pub(crate) fn log_attempts(err: &DecodeError) {
    if let Some((hex, base64)) = err.attempts() {
        log::debug!("hex: {hex}");
        log::debug!("base64: {base64}");
    }
}
