use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::model::Credential;

pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const BASE_URL_ENV: &str = "OPENWEATHER_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// Configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// base_url = "https://api.openweathermap.org/data/2.5"
/// bind = "127.0.0.1:5000"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Listen address for the web server.
    pub bind: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }
}

/// Runtime settings, resolved once at startup and passed to every lookup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credential: Option<Credential>,
    pub base_url: String,
    pub bind: String,
}

impl Settings {
    /// Resolve from the process environment, then a `.env` file, layered over `config`.
    pub fn resolve(config: &Config) -> Self {
        let dotenv = read_dotenv();
        Self::resolve_with(config, with_dotenv(|name| std::env::var(name).ok(), &dotenv))
    }

    /// Resolve with an explicit environment lookup. Environment values win over the file.
    pub fn resolve_with(config: &Config, env: impl Fn(&str) -> Option<String>) -> Self {
        let credential = env(API_KEY_ENV)
            .and_then(Credential::new)
            .or_else(|| config.api_key.clone().and_then(Credential::new));

        let base_url = env(BASE_URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .or_else(|| config.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let bind = config.bind.clone().unwrap_or_else(|| DEFAULT_BIND.to_string());

        Self { credential, base_url, bind }
    }
}

/// Read `KEY=value` pairs from a dotenv file without touching the process environment.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let iter = dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to open env file: {}", path.display()))?;

    iter.map(|item| item.with_context(|| format!("Failed to parse env file: {}", path.display())))
        .collect()
}

/// `.env` from the working directory or one of its parents; empty if there is none.
fn read_dotenv() -> HashMap<String, String> {
    let iter = match dotenvy::dotenv_iter() {
        Ok(iter) => iter,
        Err(err) if err.not_found() => return HashMap::new(),
        Err(err) => {
            warn!(error = %err, "failed to open .env");
            return HashMap::new();
        }
    };

    let vars: HashMap<String, String> = iter
        .filter_map(|item| {
            item.map_err(|err| warn!(error = %err, "skipping unreadable .env line")).ok()
        })
        .collect();

    debug!(count = vars.len(), "loaded .env");
    vars
}

/// Layer `dotenv` under `env`: real environment variables win.
pub fn with_dotenv<'a>(
    env: impl Fn(&str) -> Option<String> + 'a,
    dotenv: &'a HashMap<String, String>,
) -> impl Fn(&str) -> Option<String> + 'a {
    move |name| env(name).or_else(|| dotenv.get(name).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_configured() {
        let settings = Settings::resolve_with(&Config::default(), env_of(&[]));

        assert!(settings.credential.is_none());
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.bind, DEFAULT_BIND);
    }

    #[test]
    fn env_key_overrides_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let settings = Settings::resolve_with(&cfg, env_of(&[(API_KEY_ENV, "ENV_KEY")]));
        assert_eq!(settings.credential.unwrap().expose(), "ENV_KEY");
    }

    #[test]
    fn blank_env_key_falls_back_to_file() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let settings = Settings::resolve_with(&cfg, env_of(&[(API_KEY_ENV, "  ")]));
        assert_eq!(settings.credential.unwrap().expose(), "FILE_KEY");
    }

    #[test]
    fn parses_toml_file() {
        let cfg = Config::from_toml(
            "api_key = \"abc\"\nbase_url = \"http://localhost:9000\"\nbind = \"0.0.0.0:8080\"\n",
        )
        .expect("valid toml");

        let settings = Settings::resolve_with(&cfg, env_of(&[]));
        assert_eq!(settings.credential.unwrap().expose(), "abc");
        assert_eq!(settings.base_url, "http://localhost:9000");
        assert_eq!(settings.bind, "0.0.0.0:8080");
    }

    #[test]
    fn env_base_url_wins() {
        let mut cfg = Config::default();
        cfg.base_url = Some("http://file".into());

        let settings = Settings::resolve_with(&cfg, env_of(&[(BASE_URL_ENV, "http://env")]));
        assert_eq!(settings.base_url, "http://env");
    }

    #[test]
    fn dotenv_file_supplies_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "# local secrets\nOPENWEATHER_API_KEY=\"DOTENV_KEY\"\n").unwrap();

        let dotenv = read_env_file(&path).expect("valid env file");
        let settings = Settings::resolve_with(&Config::default(), with_dotenv(env_of(&[]), &dotenv));

        assert_eq!(settings.credential.unwrap().expose(), "DOTENV_KEY");
    }

    #[test]
    fn process_env_wins_over_dotenv() {
        let dotenv: HashMap<String, String> =
            [(API_KEY_ENV.to_string(), "DOTENV_KEY".to_string())].into_iter().collect();

        let settings = Settings::resolve_with(
            &Config::default(),
            with_dotenv(env_of(&[(API_KEY_ENV, "ENV_KEY")]), &dotenv),
        );
        assert_eq!(settings.credential.unwrap().expose(), "ENV_KEY");
    }

    #[test]
    fn dotenv_wins_over_config_file() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());
        let dotenv: HashMap<String, String> =
            [(API_KEY_ENV.to_string(), "DOTENV_KEY".to_string())].into_iter().collect();

        let settings = Settings::resolve_with(&cfg, with_dotenv(env_of(&[]), &dotenv));
        assert_eq!(settings.credential.unwrap().expose(), "DOTENV_KEY");
    }

    #[test]
    fn missing_env_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_env_file(&dir.path().join(".env")).is_err());
    }
}
