use std::path::{Path, PathBuf};

pub const CONFIG_DIR_ENV: &str = "POKEPACK_CONFIG_DIR";

/// Where pptools keeps `pokepack.json` and its logs.
pub struct AppPaths {
    config_dir: PathBuf,
}

impl AppPaths {
    /// Takes the first of `explicit`, `$POKEPACK_CONFIG_DIR` and the platform's local data
    /// directory, creating it if needed.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self, String> {
        let config_dir = explicit
            .or_else(|| {
                std::env::var_os(CONFIG_DIR_ENV)
                    .filter(|dir| !dir.is_empty())
                    .map(PathBuf::from)
            })
            .or_else(|| {
                directories::BaseDirs::new().map(|dirs| dirs.data_local_dir().join("pokepack"))
            })
            .ok_or_else(|| String::from("No suitable configuration directory found"))?;

        std::fs::create_dir_all(&config_dir)
            .map_err(|err| format!("Unable to create {}: {err}", config_dir.display()))?;
        Ok(AppPaths { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn log_dir(&self) -> std::io::Result<PathBuf> {
        let log_dir = self.config_dir.join("logs");
        std::fs::create_dir_all(&log_dir)?;
        Ok(log_dir)
    }
}
