use std::io::{Read, Write};

use flate2::{read::DeflateDecoder, write::DeflateEncoder, Compression};

use super::Compressor;
use crate::error::{CorruptPayload, EncodeError};

/// Marks the next byte as a literal, even if it looks like a phrase code.
const ESCAPE: u8 = 0x00;

/// Largest paste we are willing to expand a payload into.
pub const MAX_TEXT_BYTES: usize = 1 << 20;
// Every escaped literal takes two bytes
const MAX_TOKEN_BYTES: usize = 2 * MAX_TEXT_BYTES;

// Control bytes that never show up in a paste, except tab, LF and CR which do.
const CODES: [u8; 29] = [
    0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x0b, 0x0c, 0x0e, 0x0f, 0x10, 0x11, 0x12,
    0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b, 0x1c, 0x1d, 0x1e, 0x1f, 0x7f,
];

const PHRASES: [&str; 29] = [
    "Ability: ",
    "Tera Type: ",
    "EVs: ",
    "IVs: ",
    " Nature\n",
    "Level: ",
    "Shiny: Yes\n",
    "\n- ",
    " / ",
    " @ ",
    " HP",
    " Atk",
    " Def",
    " SpA",
    " SpD",
    " Spe",
    "252",
    "Protect",
    "Adamant",
    "Jolly",
    "Timid",
    "Modest",
    "Choice ",
    "Booster Energy",
    "Leftovers",
    "Focus Sash",
    "Assault Vest",
    "Fake Out",
    "Heavy-Duty Boots",
];

/// Swaps common paste phrases for single byte codes, then deflates the result.
#[derive(Clone, Debug)]
pub struct VocabularyCompressor {
    level: Compression,
}

impl VocabularyCompressor {
    pub fn with_level(level: u32) -> Self {
        VocabularyCompressor {
            level: Compression::new(level.min(9)),
        }
    }
}

impl Default for VocabularyCompressor {
    fn default() -> Self {
        VocabularyCompressor {
            level: Compression::best(),
        }
    }
}

impl Compressor for VocabularyCompressor {
    fn compress(&self, source: &str) -> Result<Vec<u8>, EncodeError> {
        if source.len() > MAX_TEXT_BYTES {
            return Err(EncodeError::TooLarge {
                limit: MAX_TEXT_BYTES,
            });
        }
        let tokens = substitute(source);
        log::trace!(
            "Phrase substitution took {} bytes down to {}",
            source.len(),
            tokens.len()
        );

        let mut encoder = DeflateEncoder::new(Vec::new(), self.level);
        encoder.write_all(&tokens)?;
        Ok(encoder.finish()?)
    }

    fn decompress(&self, packed: &[u8]) -> Result<String, CorruptPayload> {
        let mut tokens = Vec::new();
        DeflateDecoder::new(packed)
            .take(MAX_TOKEN_BYTES as u64 + 1)
            .read_to_end(&mut tokens)
            .map_err(CorruptPayload::Inflate)?;
        if tokens.len() > MAX_TOKEN_BYTES {
            return Err(CorruptPayload::TooLarge {
                limit: MAX_TEXT_BYTES,
            });
        }
        if tokens.is_empty() {
            return Err(CorruptPayload::Empty);
        }

        let text = expand(&tokens)?;
        if text.len() > MAX_TEXT_BYTES {
            return Err(CorruptPayload::TooLarge {
                limit: MAX_TEXT_BYTES,
            });
        }
        String::from_utf8(text).map_err(|_| CorruptPayload::NotUtf8)
    }
}

fn phrase_for(code: u8) -> Option<&'static str> {
    CODES
        .iter()
        .position(|c| *c == code)
        .map(|idx| PHRASES[idx])
}

fn longest_match(rest: &[u8]) -> Option<(u8, &'static str)> {
    CODES
        .iter()
        .zip(PHRASES)
        .filter(|(_, phrase)| rest.starts_with(phrase.as_bytes()))
        .max_by_key(|(_, phrase)| phrase.len())
        .map(|(code, phrase)| (*code, phrase))
}

fn substitute(source: &str) -> Vec<u8> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::with_capacity(bytes.len());
    let mut pos = 0;
    while pos < bytes.len() {
        if let Some((code, phrase)) = longest_match(&bytes[pos..]) {
            tokens.push(code);
            pos += phrase.len();
            continue;
        }

        let byte = bytes[pos];
        if byte == ESCAPE || phrase_for(byte).is_some() {
            tokens.push(ESCAPE);
        }
        tokens.push(byte);
        pos += 1;
    }
    tokens
}

fn expand(tokens: &[u8]) -> Result<Vec<u8>, CorruptPayload> {
    let mut text = Vec::with_capacity(tokens.len() * 2);
    let mut iter = tokens.iter();
    while let Some(&token) = iter.next() {
        if token == ESCAPE {
            let literal = iter.next().ok_or(CorruptPayload::DanglingEscape)?;
            text.push(*literal);
        } else if let Some(phrase) = phrase_for(token) {
            text.extend_from_slice(phrase.as_bytes());
        } else {
            text.push(token);
        }
    }
    Ok(text)
}
