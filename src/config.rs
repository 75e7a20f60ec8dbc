use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub whatsapp: WhatsAppConfig,
    pub storage: StorageConfig,
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub model: String,
    pub base_url: String,
    pub max_concurrent: usize,
    #[serde(default = "default_gemini_timeout")]
    pub timeout_secs: u64,
    // Loaded from env; local-only classification when absent
    #[serde(skip)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConfig {
    pub base_url: String,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default = "default_whatsapp_timeout")]
    pub timeout_secs: u64,
    // Loaded from env; notifications are skipped when absent
    #[serde(skip)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_gemini_timeout() -> u64 {
    5
}

fn default_whatsapp_timeout() -> u64 {
    10
}

fn default_country_code() -> String {
    "62".to_string()
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_text =
            std::fs::read_to_string("config.toml").context("Failed to read config.toml")?;
        let mut config = Self::from_toml_str(&config_text)?;

        config.gemini.api_key = non_empty_env("GEMINI_API_KEY");
        config.whatsapp.token = non_empty_env("WHATSAPP_TOKEN");

        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse config.toml")
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shipped_layout_and_fills_defaults() {
        let text = r#"
            [gemini]
            model = "gemini-2.0-flash"
            base_url = "http://localhost:9999"
            max_concurrent = 2

            [whatsapp]
            base_url = "http://localhost:9998/send"

            [storage]
            data_dir = "data"

            [web]
            host = "0.0.0.0"
            port = 8080
        "#;

        let config = AppConfig::from_toml_str(text).unwrap();
        assert_eq!(config.gemini.max_concurrent, 2);
        assert_eq!(config.gemini.timeout_secs, 5);
        assert!(config.gemini.api_key.is_none());
        assert_eq!(config.whatsapp.country_code, "62");
        assert_eq!(config.whatsapp.timeout_secs, 10);
        assert!(config.whatsapp.token.is_none());
        assert_eq!(config.web.port, 8080);
        assert!(config.web.static_dir.is_none());
    }

    #[test]
    fn missing_section_is_an_error() {
        let err = AppConfig::from_toml_str("[web]\nhost = \"x\"\nport = 1\n").unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config.toml"));
    }
}
