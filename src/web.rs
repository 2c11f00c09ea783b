//! Browser bindings. The page creates a [`PokePack`] and calls into it, nothing is global.
use wasm_bindgen::prelude::*;

use crate::{
    compress::PackedCompressor, dex::Dex, gateway::compression_ratio, CodecGateway, Format,
};

#[wasm_bindgen]
pub struct PokePack {
    gateway: CodecGateway,
}

impl Default for PokePack {
    fn default() -> Self {
        PokePack::new()
    }
}

#[wasm_bindgen]
impl PokePack {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PokePack {
        PokePack {
            gateway: CodecGateway::default(),
        }
    }

    /// Use the packed record format with tables supplied by the page.
    #[wasm_bindgen(js_name = withDex)]
    pub fn with_dex(
        names: &str,
        items: &str,
        abilities: &str,
        moves: &str,
        natures: &str,
        teras: &str,
    ) -> Result<PokePack, JsValue> {
        let dex = Dex::from_texts(names, items, abilities, moves, natures, teras)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(PokePack {
            gateway: CodecGateway::new(PackedCompressor::new(dex)),
        })
    }

    pub fn compress(&self, paste: &str, format: &str) -> Result<String, JsValue> {
        let format = format.parse::<Format>().map_err(|err| JsValue::from_str(&err))?;
        self.gateway
            .encode(paste, format)
            .map(|encoded| encoded.into_string())
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    pub fn decompress(&self, payload: &str) -> Result<String, JsValue> {
        self.gateway
            .decode(payload)
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    #[wasm_bindgen(js_name = compressionRatio)]
    pub fn compression_ratio(paste: &str, encoded: &str) -> f64 {
        compression_ratio(paste, encoded)
    }
}
