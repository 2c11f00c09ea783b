//! The boundary between paste text and the short strings people actually share.
//!
//! A [`CodecGateway`] owns one [`Compressor`] and renders its output as hex or Base64 text.
//! Decoding does not need to be told which alphabet was used: hex is tried first, then
//! Base64, and the first interpretation that yields a paste wins. Because the hex alphabet
//! is a subset of the Base64 one, that order is part of the format and must not change.
use std::{fmt, str::FromStr};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::{
    compress::Compressor,
    error::{AttemptFailure, DecodeError, EncodeError},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Base64,
    Hex,
}

impl Format {
    fn render(&self, bytes: &[u8]) -> String {
        match self {
            Format::Base64 => STANDARD.encode(bytes),
            Format::Hex => hex::encode_upper(bytes),
        }
    }

    fn parse(&self, text: &str) -> Result<Vec<u8>, String> {
        match self {
            Format::Base64 => STANDARD.decode(text).map_err(|err| err.to_string()),
            Format::Hex => hex::decode(text).map_err(|err| err.to_string()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Format::Base64 => "base64",
            Format::Hex => "hex",
        })
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base64" | "b64" => Ok(Format::Base64),
            "hex" => Ok(Format::Hex),
            other => Err(format!("Unknown format '{other}', expected base64 or hex")),
        }
    }
}

/// Compressed paste rendered in one alphabet. The alphabet is not written into the text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedPayload {
    text: String,
    format: Format,
}

impl EncodedPayload {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for EncodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A successful decode, along with what was learned on the way.
#[derive(Clone, Debug)]
pub struct Decoded {
    pub text: String,
    pub format: Format,
    pub bytes: Vec<u8>,
}

/// Byte length of the paste over byte length of its encoded form.
pub fn compression_ratio(source: &str, encoded: &str) -> f64 {
    if encoded.is_empty() {
        return 0.0;
    }
    source.len() as f64 / encoded.len() as f64
}

pub struct CodecGateway {
    compressor: Box<dyn Compressor + Send + Sync>,
}

impl CodecGateway {
    pub fn new(compressor: impl Compressor + Send + Sync + 'static) -> Self {
        CodecGateway {
            compressor: Box::new(compressor),
        }
    }

    pub fn from_boxed(compressor: Box<dyn Compressor + Send + Sync>) -> Self {
        CodecGateway { compressor }
    }

    pub fn encode(&self, source: &str, format: Format) -> Result<EncodedPayload, EncodeError> {
        if source.trim().is_empty() {
            return Err(EncodeError::EmptyInput);
        }

        let bytes = self.compressor.compress(source)?;
        log::debug!(
            "Compressed {} bytes of paste into {} bytes",
            source.len(),
            bytes.len()
        );

        // Fixed size records go one per line so a team reads as one line per Pokemon
        let text = match self.compressor.record_len() {
            Some(record_len) if record_len > 0 => bytes
                .chunks(record_len)
                .map(|record| format.render(record))
                .collect::<Vec<_>>()
                .join("\n"),
            _ => format.render(&bytes),
        };

        // Decoding tries hex first, so Base64 made only of hex digits must still mean the same
        if format == Format::Base64 {
            self.check_unambiguous(&text)?;
        }

        Ok(EncodedPayload { text, format })
    }

    pub fn decode(&self, payload: &str) -> Result<String, DecodeError> {
        self.decode_detailed(payload).map(|decoded| decoded.text)
    }

    pub fn decode_detailed(&self, payload: &str) -> Result<Decoded, DecodeError> {
        let compact = compact(payload);
        if compact.is_empty() {
            return Err(DecodeError::EmptyInput);
        }

        let hex = match self.attempt(&compact, Format::Hex) {
            Ok(decoded) => return Ok(decoded),
            Err(failure) => failure,
        };
        log::trace!("Hex decode failed ({hex}), trying base64");

        match self.attempt(&compact, Format::Base64) {
            Ok(decoded) => Ok(decoded),
            Err(base64) => {
                let err = DecodeError::Unrecognized { hex, base64 };
                if err.is_corrupt() {
                    log::warn!("Payload matched an alphabet but its content is corrupt");
                }
                Err(err)
            }
        }
    }

    /// Decode with the alphabet already known, skipping detection.
    pub fn decode_as(&self, payload: &str, format: Format) -> Result<Decoded, AttemptFailure> {
        self.attempt(&compact(payload), format)
    }

    pub fn to_base64(&self, source: &str) -> Result<String, EncodeError> {
        self.encode(source, Format::Base64)
            .map(EncodedPayload::into_string)
    }

    pub fn to_hex(&self, source: &str) -> Result<String, EncodeError> {
        self.encode(source, Format::Hex).map(EncodedPayload::into_string)
    }

    pub fn from_base64(&self, payload: &str) -> Result<String, AttemptFailure> {
        self.decode_as(payload, Format::Base64)
            .map(|decoded| decoded.text)
    }

    pub fn from_hex(&self, payload: &str) -> Result<String, AttemptFailure> {
        self.decode_as(payload, Format::Hex).map(|decoded| decoded.text)
    }

    fn check_unambiguous(&self, text: &str) -> Result<(), EncodeError> {
        let compact = compact(text);
        let Ok(as_hex) = self.attempt(&compact, Format::Hex) else {
            return Ok(());
        };
        match self.attempt(&compact, Format::Base64) {
            Ok(as_base64) if as_base64.text == as_hex.text => Ok(()),
            _ => {
                log::warn!("Base64 payload {compact} also decodes as hex");
                Err(EncodeError::Ambiguous {
                    format: Format::Base64,
                })
            }
        }
    }

    fn attempt(&self, compact: &str, format: Format) -> Result<Decoded, AttemptFailure> {
        let bytes = format
            .parse(compact)
            .map_err(|reason| AttemptFailure::Alphabet { format, reason })?;
        let text = self
            .compressor
            .decompress(&bytes)
            .map_err(|source| AttemptFailure::Corrupt { format, source })?;
        Ok(Decoded {
            text,
            format,
            bytes,
        })
    }
}

impl Default for CodecGateway {
    fn default() -> Self {
        CodecGateway::new(crate::compress::VocabularyCompressor::default())
    }
}

// Record payloads span several lines and people paste with stray spaces
fn compact(payload: &str) -> String {
    payload.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compress::StoredCompressor, error::CorruptPayload};

    const PIKACHU: &str = "Pikachu @ Light Ball\nAbility: Static";

    #[test]
    fn test_round_trip_both_formats() {
        let gateway = CodecGateway::default();
        for format in [Format::Base64, Format::Hex] {
            let encoded = gateway.encode(PIKACHU, format).unwrap();
            assert_eq!(encoded.format(), format);
            assert_eq!(gateway.decode(encoded.as_str()).unwrap(), PIKACHU);
        }
    }

    #[test]
    fn test_base64_output_alphabet() {
        let gateway = CodecGateway::default();
        let encoded = gateway.encode(PIKACHU, Format::Base64).unwrap();
        assert!(encoded
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '='));

        let decoded = gateway.decode_detailed(encoded.as_str()).unwrap();
        assert_eq!(decoded.format, Format::Base64);
        assert_eq!(decoded.text, PIKACHU);
    }

    #[test]
    fn test_hex_output_alphabet() {
        let gateway = CodecGateway::default();
        let encoded = gateway.to_hex(PIKACHU).unwrap();
        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        assert_eq!(gateway.from_hex(&encoded).unwrap(), PIKACHU);
    }

    #[test]
    fn test_ambiguous_payload_prefers_hex() {
        // "0441" is hex for "\u{4}A" and Base64 for "\u{4ce}5"
        let gateway = CodecGateway::new(StoredCompressor);
        assert_eq!(gateway.from_base64("0441").unwrap(), "\u{4ce}5");
        assert_eq!(gateway.decode("0441").unwrap(), "\u{4}A");
        assert_eq!(gateway.decode_detailed("0441").unwrap().format, Format::Hex);
    }

    #[test]
    fn test_base64_that_reads_as_hex_is_refused() {
        // "pOt" is "cE90" in Base64, which is also hex for "\u{390}"
        let gateway = CodecGateway::new(StoredCompressor);
        assert!(matches!(
            gateway.encode("pOt", Format::Base64),
            Err(EncodeError::Ambiguous {
                format: Format::Base64
            })
        ));

        let encoded = gateway.encode("pOt", Format::Hex).unwrap();
        assert_eq!(gateway.decode(encoded.as_str()).unwrap(), "pOt");

        let encoded = gateway.encode("pOt!", Format::Base64).unwrap();
        assert_eq!(gateway.decode(encoded.as_str()).unwrap(), "pOt!");
    }

    #[test]
    fn test_boxed_compressor() {
        let compressor: Box<dyn Compressor + Send + Sync> = Box::new(StoredCompressor);
        let gateway = CodecGateway::from_boxed(compressor);
        assert_eq!(gateway.to_hex("AB").unwrap(), "4142");
    }

    #[test]
    fn test_falls_back_to_base64_when_hex_content_is_corrupt() {
        // Valid hex, but 0xAA is never UTF-8, so only the Base64 reading survives
        let gateway = CodecGateway::new(StoredCompressor);
        let decoded = gateway.decode_detailed("AAAA").unwrap();
        assert_eq!(decoded.format, Format::Base64);
        assert_eq!(decoded.text, "\0\0\0");

        let hex_failure = gateway.decode_as("AAAA", Format::Hex).unwrap_err();
        assert!(matches!(
            hex_failure,
            AttemptFailure::Corrupt {
                format: Format::Hex,
                source: CorruptPayload::NotUtf8
            }
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let gateway = CodecGateway::default();
        let err = gateway.decode("not-valid-hex-or-base64!!").unwrap_err();
        assert!(matches!(err, DecodeError::Unrecognized { .. }));
        assert!(!err.is_corrupt());
        assert_eq!(
            err.to_string(),
            "Failed to decode. Input must be a valid Hex or Base64 string."
        );
    }

    #[test]
    fn test_corrupt_content_is_distinguished() {
        let gateway = CodecGateway::default();
        // Both alphabets accept this, neither reading inflates to a paste
        let err = gateway.decode("FFFFFFFF").unwrap_err();
        let (hex, base64) = err.attempts().unwrap();
        assert!(hex.is_corrupt());
        assert!(base64.is_corrupt());
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_blank_input_rejected() {
        let gateway = CodecGateway::default();
        assert!(matches!(
            gateway.encode("  \n\t", Format::Hex),
            Err(EncodeError::EmptyInput)
        ));
        assert!(matches!(gateway.decode("   "), Err(DecodeError::EmptyInput)));
    }

    #[test]
    fn test_failed_decode_does_not_affect_next_call() {
        let gateway = CodecGateway::default();
        let encoded = gateway.to_base64(PIKACHU).unwrap();
        assert!(gateway.decode("zz!!").is_err());
        assert_eq!(gateway.decode(&encoded).unwrap(), PIKACHU);
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let gateway = CodecGateway::default();
        let encoded = gateway.to_hex(PIKACHU).unwrap();
        let padded = format!("\n  {}  \n", encoded);
        assert_eq!(gateway.decode(&padded).unwrap(), PIKACHU);
    }

    #[test]
    fn test_compression_ratio() {
        let gateway = CodecGateway::new(StoredCompressor);
        let encoded = gateway.encode("AB", Format::Hex).unwrap();
        assert_eq!(encoded.as_str(), "4142");
        assert!((compression_ratio("AB", encoded.as_str()) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("HEX".parse::<Format>().unwrap(), Format::Hex);
        assert_eq!("base64".parse::<Format>().unwrap(), Format::Base64);
        assert!("base32".parse::<Format>().is_err());
    }
}
