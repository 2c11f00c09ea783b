use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{CorruptPayload, EncodeError};

mod packed;
mod vocab;

pub use packed::PackedCompressor;
pub use vocab::VocabularyCompressor;

/// Turns paste text into bytes and back. The gateway owns exactly one of these.
pub trait Compressor {
    fn compress(&self, source: &str) -> Result<Vec<u8>, EncodeError>;

    fn decompress(&self, packed: &[u8]) -> Result<String, CorruptPayload>;

    /// Size of each record when the output is a sequence of fixed size records.
    fn record_len(&self) -> Option<usize> {
        None
    }
}

/// Which [`Compressor`] a host should build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Vocabulary,
    Stored,
    Packed,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Scheme::Vocabulary => "vocabulary",
            Scheme::Stored => "stored",
            Scheme::Packed => "packed",
        })
    }
}

impl FromStr for Scheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vocabulary" | "vocab" => Ok(Scheme::Vocabulary),
            "stored" | "none" => Ok(Scheme::Stored),
            "packed" => Ok(Scheme::Packed),
            other => Err(format!(
                "Unknown scheme '{other}', expected vocabulary, stored or packed"
            )),
        }
    }
}

/// Plain UTF-8, no compression at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct StoredCompressor;

impl Compressor for StoredCompressor {
    fn compress(&self, source: &str) -> Result<Vec<u8>, EncodeError> {
        Ok(source.as_bytes().to_vec())
    }

    fn decompress(&self, packed: &[u8]) -> Result<String, CorruptPayload> {
        if packed.is_empty() {
            return Err(CorruptPayload::Empty);
        }
        String::from_utf8(packed.to_vec()).map_err(|_| CorruptPayload::NotUtf8)
    }
}
