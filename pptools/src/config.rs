//! Settings read from `pokepack.json` in the config directory.
use anyhow::{anyhow, Context};
use pokepack::{
    CodecGateway, Compressor, Dex, Format, PackedCompressor, Scheme, StoredCompressor,
    VocabularyCompressor,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "pokepack.json";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Alphabet used when compressing. Decompression always detects it.
    pub format: Format,
    pub scheme: Scheme,
    /// Directory holding the table files for the packed scheme.
    pub dex_dir: Option<PathBuf>,
}

impl Config {
    /// A missing file is the default config, a malformed one is an error.
    pub fn load(config_dir: &Path) -> anyhow::Result<Self> {
        let path = config_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Malformed config {}", path.display()))
    }

    pub fn save(&self, config_dir: &Path) -> anyhow::Result<()> {
        let path = config_dir.join(CONFIG_FILE_NAME);
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn build_gateway(&self) -> anyhow::Result<CodecGateway> {
        let compressor: Box<dyn Compressor + Send + Sync> = match self.scheme {
            Scheme::Vocabulary => Box::new(VocabularyCompressor::default()),
            Scheme::Stored => Box::new(StoredCompressor),
            Scheme::Packed => {
                let dex_dir = self.dex_dir.as_ref().ok_or_else(|| {
                    anyhow!("The packed scheme needs a dex directory, set dex_dir or pass --dex-dir")
                })?;
                let dex = Dex::from_dir(dex_dir)
                    .with_context(|| format!("Failed to load dex from {}", dex_dir.display()))?;
                Box::new(PackedCompressor::new(dex))
            }
        };
        log::info!("Using the {} scheme", self.scheme);
        Ok(CodecGateway::from_boxed(compressor))
    }
}
