use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub startup: StartupConfig,
    #[serde(default)]
    pub main: MainConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Splash screen shown before the main UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupConfig {
    #[serde(default = "default_show_startup")]
    pub show: bool,
    /// Minimum time the splash stays on screen.
    #[serde(default = "default_startup_duration_ms")]
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainConfig {
    #[serde(default = "default_show_title")]
    pub show_title: bool,
    #[serde(default = "default_title")]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Base URL of the account API (`/login` and `/login/cellphone` live under it).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,
}

impl StartupConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl AuthConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            show: default_show_startup(),
            duration_ms: default_startup_duration_ms(),
        }
    }
}

impl Default for MainConfig {
    fn default() -> Self {
        Self {
            show_title: default_show_title(),
            title: default_title(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
        }
    }
}

fn default_show_startup() -> bool {
    true
}

fn default_startup_duration_ms() -> u64 {
    2000
}

fn default_show_title() -> bool {
    true
}

fn default_title() -> String {
    "musicbox".to_string()
}

fn default_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_store_dir() -> PathBuf {
    platform::store_dir()
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            startup: StartupConfig::default(),
            main: MainConfig::default(),
            auth: AuthConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.startup.show);
        assert_eq!(config.startup.duration(), Duration::from_secs(2));
        assert!(config.main.show_title);
        assert!(config.auth.base_url.starts_with("http"));
        assert!(config.store.dir.ends_with("musicbox/store"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [startup]
            show = false

            [auth]
            base_url = "https://music.example.com"
            "#,
        )
        .unwrap();
        assert!(!config.startup.show);
        assert_eq!(config.startup.duration_ms, 2000);
        assert_eq!(config.auth.base_url, "https://music.example.com");
        assert_eq!(config.auth.timeout_secs, 10);
        assert_eq!(config.main.title, "musicbox");
    }
}
