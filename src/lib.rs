//! Short, shareable strings for Pokemon Showdown team pastes.
//!
//! ```
//! use pokepack::{CodecGateway, Format};
//!
//! let gateway = CodecGateway::default();
//! let paste = "Pikachu @ Light Ball\nAbility: Static";
//! let encoded = gateway.encode(paste, Format::Base64).unwrap();
//! assert_eq!(gateway.decode(encoded.as_str()).unwrap(), paste);
//! ```
pub mod binary;
pub mod compress;
pub mod dex;
pub mod error;
pub mod gateway;
pub mod paste;

#[cfg(feature = "wasm")]
pub mod web;

pub use compress::{Compressor, PackedCompressor, Scheme, StoredCompressor, VocabularyCompressor};
pub use dex::Dex;
pub use error::{AttemptFailure, CorruptPayload, DecodeError, DexError, EncodeError, ParseError};
pub use gateway::{compression_ratio, CodecGateway, Decoded, EncodedPayload, Format};
