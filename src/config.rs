use std::{env, str::FromStr, sync::Arc};

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use yurline_contact::DeliveryFailurePolicy;
use yurline_maps::{GoogleMapsProvider, MapProvider, NullMapProvider};
use yurline_telegram::{
    BotClient, ContactNotifier, DEFAULT_API_URL, DEFAULT_TIMEZONE, ParseMode, SiteInfo,
    is_known_timezone,
};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub maps: MapsConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Bot credentials stay on the server; an empty token or chat id means the
/// relay answers `failed-precondition` instead of refusing to start.
#[derive(Deserialize, Clone)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_parse_mode")]
    pub parse_mode: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_url: default_api_url(),
            parse_mode: default_parse_mode(),
            timezone: default_timezone(),
        }
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &if self.bot_token.is_empty() { "" } else { "***" })
            .field("chat_id", &self.chat_id)
            .field("api_url", &self.api_url)
            .field("parse_mode", &self.parse_mode)
            .field("timezone", &self.timezone)
            .finish()
    }
}

impl TelegramConfig {
    /// Token and chat id, if both are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let token = self.bot_token.trim();
        let chat_id = self.chat_id.trim();
        if token.is_empty() || chat_id.is_empty() {
            return None;
        }
        Some((token, chat_id))
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }

    pub fn parse_mode(&self) -> ParseMode {
        ParseMode::from_str(&self.parse_mode).unwrap_or_default()
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_parse_mode() -> String {
    ParseMode::Markdown.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    #[serde(default = "default_company")]
    pub company: String,
    #[serde(default = "default_origin")]
    pub origin: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            company: default_company(),
            origin: default_origin(),
        }
    }
}

impl From<&SiteConfig> for SiteInfo {
    fn from(value: &SiteConfig) -> Self {
        SiteInfo {
            company: value.company.to_owned(),
            origin: value.origin.to_owned(),
        }
    }
}

fn default_company() -> String {
    "ЮРЛАЙН".to_string()
}

fn default_origin() -> String {
    "konsaltingcentr-yurline.kz".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    #[serde(default = "default_relay_url")]
    pub url: String,
    #[serde(default)]
    pub failure_policy: DeliveryFailurePolicy,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: default_relay_url(),
            failure_policy: DeliveryFailurePolicy::default(),
        }
    }
}

fn default_relay_url() -> String {
    "http://127.0.0.1:3000/api/contact".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct MapsConfig {
    /// Leave empty to serve the address without a map link.
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_maps_enabled")]
    pub enabled: bool,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            address: String::new(),
            enabled: default_maps_enabled(),
        }
    }
}

fn default_maps_enabled() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (YURLINE__TELEGRAM__BOT_TOKEN, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("YURLINE")
                .separator("__")
                .try_parsing(true),
        );

        // Unprefixed names from existing deployments
        if let Ok(bot_token) = env::var("TELEGRAM_BOT_TOKEN") {
            builder = builder.set_override("telegram.bot_token", bot_token)?;
        }
        if let Ok(chat_id) = env::var("TELEGRAM_CHAT_ID") {
            builder = builder.set_override("telegram.chat_id", chat_id)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Notifier for the configured chat, or `None` while credentials are missing.
    pub fn notifier(&self) -> Option<ContactNotifier> {
        let (token, chat_id) = self.telegram.credentials()?;
        let client = BotClient::with_api_url(token, self.telegram.api_url.to_owned());

        Some(
            ContactNotifier::new(client, chat_id, (&self.site).into())
                .parse_mode(self.telegram.parse_mode())
                .timezone(self.telegram.timezone.to_owned()),
        )
    }

    /// Map provider for the office section; `[maps] enabled = false` links nothing.
    pub fn map_provider(&self) -> Arc<dyn MapProvider> {
        if self.maps.enabled {
            Arc::new(GoogleMapsProvider::new(Some(self.maps.api_key.as_str())))
        } else {
            Arc::new(NullMapProvider)
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if ParseMode::from_str(&self.telegram.parse_mode).is_err() {
            return Err(format!(
                "Unknown Telegram parse mode '{}', expected Markdown or HTML",
                self.telegram.parse_mode
            ));
        }
        if !is_known_timezone(&self.telegram.timezone) {
            return Err(format!("Unknown timezone '{}'", self.telegram.timezone));
        }
        if self.telegram.api_url.trim().is_empty() {
            return Err("Telegram api_url must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            telegram: TelegramConfig::default(),
            site: SiteConfig::default(),
            relay: RelayConfig::default(),
            maps: MapsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validation_missing_credentials_is_not_fatal() {
        let config = config();

        assert!(!config.telegram.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_port() {
        let mut config = config();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_unknown_parse_mode() {
        let mut config = config();
        config.telegram.parse_mode = "MarkdownV3".to_string();

        assert!(config.validate().is_err());

        config.telegram.parse_mode = "HTML".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.telegram.parse_mode(), ParseMode::Html);
    }

    #[test]
    fn test_validation_unknown_timezone() {
        let mut config = config();
        config.telegram.timezone = "Mars/Olympus".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_credentials_are_missing() {
        let mut config = config();
        config.telegram.bot_token = "  ".to_string();
        config.telegram.chat_id = "-100".to_string();
        assert_eq!(config.telegram.credentials(), None);

        config.telegram.bot_token = "42:secret".to_string();
        assert_eq!(config.telegram.credentials(), Some(("42:secret", "-100")));
    }

    #[tokio::test]
    async fn test_map_provider_follows_maps_section() {
        let mut config = config();
        assert_eq!(config.map_provider().name(), "google");
        assert_eq!(
            config.map_provider().ensure_loaded().await,
            Err(yurline_maps::Error::MissingApiKey)
        );

        config.maps.enabled = false;
        let provider = config.map_provider();
        assert_eq!(provider.name(), "none");
        assert_eq!(
            provider.ensure_loaded().await,
            Err(yurline_maps::Error::Unavailable)
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let mut config = config();
        config.telegram.bot_token = "42:secret".to_string();

        let debug = format!("{:?}", config.telegram);

        assert!(!debug.contains("42:secret"));
        assert!(debug.contains("***"));
    }
}
