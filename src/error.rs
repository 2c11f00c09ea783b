use std::{io, path::PathBuf};

use thiserror::Error;

use crate::gateway::Format;

/// Problems found while reading a paste, before anything is packed.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Input paste was empty")]
    EmptyInput,
    #[error("Could not find a Pokemon name in this block:\n{block}")]
    MissingName { block: String },
    #[error("Malformed EV/IV string: '{line}'")]
    MalformedStats { line: String },
    #[error("Unrecognized or malformed line: '{line}'")]
    MalformedLine { line: String },
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Nothing to encode, the paste is blank")]
    EmptyInput,
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("'{name}' is not a known entry in the {table} table")]
    UnknownEntry { table: &'static str, name: String },
    #[error("{field} value {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("{species} has {count} moves, at most 4 can be packed")]
    TooManyMoves { species: String, count: usize },
    #[error("Paste is larger than the {limit} byte limit")]
    TooLarge { limit: usize },
    #[error("The {format} payload also reads as a different hex payload, use hex instead")]
    Ambiguous { format: Format },
    #[error("Compression failed: {0}")]
    Compression(#[from] io::Error),
}

/// The decoded bytes were in a valid alphabet but do not hold a compressed paste.
#[derive(Debug, Error)]
pub enum CorruptPayload {
    #[error("payload is not valid deflate data: {0}")]
    Inflate(io::Error),
    #[error("payload expands past {limit} bytes")]
    TooLarge { limit: usize },
    #[error("payload holds no text")]
    Empty,
    #[error("payload ends inside an escape sequence")]
    DanglingEscape,
    #[error("decompressed text is not UTF-8")]
    NotUtf8,
    #[error("payload length {len} is not a multiple of the {record_len} byte record size")]
    RecordLength { len: usize, record_len: usize },
    #[error("record {record} has an invalid {field} value {value}")]
    BadField {
        record: usize,
        field: &'static str,
        value: u32,
    },
}

/// Why a single decode attempt under one alphabet did not produce text.
#[derive(Debug, Error)]
pub enum AttemptFailure {
    #[error("not valid {format}: {reason}")]
    Alphabet { format: Format, reason: String },
    #[error("valid {format} but corrupt content: {source}")]
    Corrupt {
        format: Format,
        #[source]
        source: CorruptPayload,
    },
}

impl AttemptFailure {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, AttemptFailure::Corrupt { .. })
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Nothing to decode, the payload is blank")]
    EmptyInput,
    #[error("Failed to decode. Input must be a valid Hex or Base64 string.")]
    Unrecognized {
        hex: AttemptFailure,
        base64: AttemptFailure,
    },
}

impl DecodeError {
    /// True when at least one alphabet matched but the content behind it was damaged.
    pub fn is_corrupt(&self) -> bool {
        match self {
            DecodeError::EmptyInput => false,
            DecodeError::Unrecognized { hex, base64 } => hex.is_corrupt() || base64.is_corrupt(),
        }
    }

    pub fn attempts(&self) -> Option<(&AttemptFailure, &AttemptFailure)> {
        match self {
            DecodeError::EmptyInput => None,
            DecodeError::Unrecognized { hex, base64 } => Some((hex, base64)),
        }
    }
}

#[derive(Debug, Error)]
pub enum DexError {
    #[error("Unable to read dex table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("The {table} table has {len} entries, the packed record holds at most {max}")]
    TableTooLarge {
        table: &'static str,
        len: usize,
        max: usize,
    },
}
