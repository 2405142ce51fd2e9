use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::i18n::Locale;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub csrf: CsrfConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

/// Where the site lives and how the session is provisioned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site origin, e.g. `https://motry.example`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the push-notification socket
    #[serde(default = "default_ws_path")]
    pub notifications_path: String,
    /// Raw `Cookie` header value carrying an existing session.
    /// Logging in is handled by the site, not by this client.
    #[serde(default)]
    pub session_cookie: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            notifications_path: default_ws_path(),
            session_cookie: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_ws_path() -> String {
    "/ws/motry/notifications/".to_string()
}

/// Anti-forgery token locations, fixed by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfConfig {
    /// Name of the hidden form input carrying the token
    #[serde(default = "default_csrf_field")]
    pub field_name: String,
    /// Name of the cookie carrying the token
    #[serde(default = "default_csrf_cookie")]
    pub cookie_name: String,
    /// Header the token is sent in
    #[serde(default = "default_csrf_header")]
    pub header_name: String,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            field_name: default_csrf_field(),
            cookie_name: default_csrf_cookie(),
            header_name: default_csrf_header(),
        }
    }
}

fn default_csrf_field() -> String {
    "csrfmiddlewaretoken".to_string()
}

fn default_csrf_cookie() -> String {
    "csrftoken".to_string()
}

fn default_csrf_header() -> String {
    "X-CSRFToken".to_string()
}

/// Push notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Open the push channel when a page session starts
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// How long an alert stays fully visible
    #[serde(default = "default_display_ms")]
    pub display_ms: u64,
    /// Fade-out after the visible period, before removal
    #[serde(default = "default_fade_ms")]
    pub fade_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            display_ms: default_display_ms(),
            fade_ms: default_fade_ms(),
        }
    }
}

impl NotificationConfig {
    pub fn display(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

fn default_true() -> bool {
    true
}

fn default_display_ms() -> u64 {
    3200
}

fn default_fade_ms() -> u64 {
    220
}

/// Client appearance and behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// UI language code
    #[serde(default)]
    pub locale: Locale,
    /// Enable dark theme
    #[serde(default = "default_true")]
    pub dark_theme: bool,
    /// Upper bound for a single request, in seconds (0 disables)
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            dark_theme: true,
            request_timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "motry", "Motry")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a file, using defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?;
            tracing::info!("Loaded configuration from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Set a value by dotted key, e.g. `site.base_url`
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "site.base_url" => {
                url::Url::parse(value).with_context(|| format!("Not a valid URL: {}", value))?;
                self.site.base_url = value.trim_end_matches('/').to_string();
            }
            "site.notifications_path" => self.site.notifications_path = value.to_string(),
            "site.session_cookie" => {
                self.site.session_cookie = (!value.is_empty()).then(|| value.to_string())
            }
            "csrf.field_name" => self.csrf.field_name = value.to_string(),
            "csrf.cookie_name" => self.csrf.cookie_name = value.to_string(),
            "csrf.header_name" => self.csrf.header_name = value.to_string(),
            "notifications.enabled" => self.notifications.enabled = parse_bool(value)?,
            "notifications.display_ms" => self.notifications.display_ms = value.parse()?,
            "notifications.fade_ms" => self.notifications.fade_ms = value.parse()?,
            "client.locale" => self.client.locale = Locale::from_code(value),
            "client.dark_theme" => self.client.dark_theme = parse_bool(value)?,
            "client.request_timeout_secs" => self.client.request_timeout_secs = value.parse()?,
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Read a value by dotted key as display text
    pub fn get_value(&self, key: &str) -> Result<String> {
        let value = match key {
            "site.base_url" => self.site.base_url.clone(),
            "site.notifications_path" => self.site.notifications_path.clone(),
            "site.session_cookie" => self.site.session_cookie.clone().unwrap_or_default(),
            "csrf.field_name" => self.csrf.field_name.clone(),
            "csrf.cookie_name" => self.csrf.cookie_name.clone(),
            "csrf.header_name" => self.csrf.header_name.clone(),
            "notifications.enabled" => self.notifications.enabled.to_string(),
            "notifications.display_ms" => self.notifications.display_ms.to_string(),
            "notifications.fade_ms" => self.notifications.fade_ms.to_string(),
            "client.locale" => self.client.locale.code().to_string(),
            "client.dark_theme" => self.client.dark_theme.to_string(),
            "client.request_timeout_secs" => self.client.request_timeout_secs.to_string(),
            _ => anyhow::bail!("Unknown config key: {}", key),
        };
        Ok(value)
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => anyhow::bail!("Expected a boolean, got {}", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_site_contract() {
        let config = Config::default();
        assert_eq!(config.csrf.field_name, "csrfmiddlewaretoken");
        assert_eq!(config.csrf.cookie_name, "csrftoken");
        assert_eq!(config.csrf.header_name, "X-CSRFToken");
        assert_eq!(config.site.notifications_path, "/ws/motry/notifications/");
        assert_eq!(config.notifications.display(), Duration::from_millis(3200));
        assert_eq!(config.notifications.fade(), Duration::from_millis(220));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [site]
            base_url = "https://motry.example"

            [client]
            locale = "zh-TW"
            "#,
        )
        .unwrap();
        assert_eq!(config.site.base_url, "https://motry.example");
        assert_eq!(config.client.locale, Locale::ZhTw);
        assert!(config.notifications.enabled);
        assert_eq!(config.csrf.cookie_name, "csrftoken");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set_value("site.base_url", "https://motry.example/").unwrap();
        config.set_value("notifications.enabled", "off").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.site.base_url, "https://motry.example");
        assert!(!loaded.notifications.enabled);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.site.base_url, default_base_url());
    }

    #[test]
    fn test_set_value_rejects_unknown_key_and_bad_url() {
        let mut config = Config::default();
        assert!(config.set_value("site.nope", "x").is_err());
        assert!(config.set_value("site.base_url", "not a url").is_err());
        assert!(config.set_value("client.dark_theme", "maybe").is_err());
    }

    #[test]
    fn test_get_value_reads_back_set_value() {
        let mut config = Config::default();
        config.set_value("client.locale", "zh-TW").unwrap();
        assert_eq!(config.get_value("client.locale").unwrap(), "zh-TW");
        config.set_value("site.session_cookie", "").unwrap();
        assert!(config.site.session_cookie.is_none());
    }
}
