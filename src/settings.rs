use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_API_URL;

const SETTINGS_DIR: &str = ".taskflow";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_url: Option<String>,
}

impl Settings {
    /// Reads `.taskflow/settings.json` from `std::env::current_dir()`.
    /// Returns defaults if the file is missing or malformed.
    pub fn load() -> Self {
        Self::load_from(std::env::current_dir().ok())
    }

    fn load_from(cwd: Option<PathBuf>) -> Self {
        let Some(cwd) = cwd else {
            return Self::default();
        };
        Self::read_file(&Self::path_in(&cwd)).unwrap_or_default()
    }

    fn read_file(path: &Path) -> Option<Self> {
        let data = fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(SETTINGS_DIR).join(SETTINGS_FILE)
    }

    /// Picks the API base URL: an explicit flag (or `TASKFLOW_API_URL`, which
    /// clap folds into the flag) wins over the settings file, which wins over
    /// the built-in default.
    pub fn resolve_api_url(&self, flag: Option<&str>) -> String {
        [flag, self.api_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .to_string()
    }

    #[cfg(test)]
    fn save_to(dir: &Path, api_url: &str) -> std::io::Result<()> {
        let settings_dir = dir.join(SETTINGS_DIR);
        fs::create_dir_all(&settings_dir)?;

        let settings = Settings {
            api_url: Some(api_url.to_string()),
        };
        let json = serde_json::to_string_pretty(&settings).map_err(std::io::Error::other)?;
        fs::write(settings_dir.join(SETTINGS_FILE), json.as_bytes())
    }
}
