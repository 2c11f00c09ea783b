use clap::Args;
use pokepack::{binary, compression_ratio, CodecGateway, Decoded, Scheme};
use prettytable::{format, row, Table};
use std::path::PathBuf;

use crate::{decompress::log_attempts, text_io::read_input};

#[derive(Debug, Args)]
pub struct Opts {
    /// Hex or Base64 payload, stdin if omitted
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Also print the decoded paste
    #[arg(long)]
    pub show_paste: bool,
}

pub fn run(
    opts: Opts,
    gateway: &CodecGateway,
    scheme: Scheme,
) -> Result<(), Box<dyn std::error::Error>> {
    let payload = read_input(opts.input.as_deref())?;
    if payload.trim().is_empty() {
        return Err("Nothing to decode, the payload is empty".into());
    }
    let decoded = gateway.decode_detailed(&payload).map_err(|err| {
        log_attempts(&err);
        err
    })?;

    summary_table(&payload, &decoded, scheme).printstd();
    if scheme == Scheme::Packed {
        println!();
        records_table(&decoded)?.printstd();
    }
    if opts.show_paste {
        println!("\n{}", decoded.text);
    }
    Ok(())
}

pub fn summary_table(payload: &str, decoded: &Decoded, scheme: Scheme) -> Table {
    let payload_chars = payload.chars().filter(|c| !c.is_whitespace()).count();
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.add_row(row!["FORMAT", decoded.format]);
    table.add_row(row!["SCHEME", scheme]);
    table.add_row(row!["PAYLOAD CHARS", payload_chars]);
    table.add_row(row!["COMPRESSED BYTES", decoded.bytes.len()]);
    table.add_row(row!["TEXT BYTES", decoded.text.len()]);
    table.add_row(row![
        "RATIO",
        format!("{:.2}:1", compression_ratio(&decoded.text, payload.trim()))
    ]);
    table
}

/// One row per packed record, showing the raw table indices.
pub fn records_table(decoded: &Decoded) -> Result<Table, pokepack::CorruptPayload> {
    let records = binary::unpack_records(&decoded.bytes)?;
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row![
        "SLOT", "SPECIES", "GENDER", "ITEM", "ABILITY", "LEVEL", "SHINY", "TERA", "NATURE",
        "EVS", "IVS", "MOVES"
    ]);
    for (slot, pbin) in records.iter().enumerate() {
        table.add_row(row![
            slot,
            pbin.species,
            pbin.gender,
            pbin.item,
            pbin.ability,
            pbin.level,
            pbin.shiny,
            pbin.tera,
            pbin.nature,
            format!("{:?}", pbin.evs),
            format!("{:?}", pbin.ivs),
            format!("{:?}", pbin.moves),
        ]);
    }
    Ok(table)
}
