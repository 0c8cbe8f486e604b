//! Server configuration module

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use jiff::tz::TimeZone;
use thiserror::Error;

use giftqr_app::{backend::BackendConfig, cards::CardConfig, context::AppConfig};

use crate::config::{
    backend::BackendSettings,
    cards::CardSettings,
    observability::LoggingConfig,
    server::ServerRuntimeConfig,
};

pub(crate) mod backend;
pub(crate) mod cards;
pub(crate) mod observability;
pub(crate) mod server;

pub(crate) use observability::LogFormat;

/// Errors raised while turning parsed settings into application config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The coupon time zone is not a known IANA name.
    #[error("unknown time zone {name}: {source}")]
    TimeZone {
        /// Configured name.
        name: String,

        /// Lookup failure.
        #[source]
        source: jiff::Error,
    },
}

/// Gift coupon JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "giftqr-json", about = "Gift coupon JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Hosted backend settings.
    #[command(flatten)]
    pub backend: BackendSettings,

    /// Coupon calendar and card printing settings.
    #[command(flatten)]
    pub cards: CardSettings,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Application settings for the service layer.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured time zone cannot be resolved.
    pub fn app_config(&self) -> Result<AppConfig, ConfigError> {
        let time_zone =
            TimeZone::get(&self.cards.time_zone).map_err(|source| ConfigError::TimeZone {
                name: self.cards.time_zone.clone(),
                source,
            })?;

        Ok(AppConfig {
            backend: BackendConfig {
                url: self.backend.url.clone(),
                anon_key: self.backend.anon_key.clone(),
                timeout: Duration::from_secs(self.backend.timeout_seconds),
            },
            time_zone,
            cards: CardConfig {
                title: self.cards.card_title.clone(),
                font_path: self.cards.card_font_path.clone().map(PathBuf::from),
                title_font_path: self.cards.card_title_font_path.clone().map(PathBuf::from),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn parse(args: &[&str]) -> Result<ServerConfig, clap::Error> {
        ServerConfig::try_parse_from(
            ["giftqr-json", "--url", "https://example.supabase.co", "--anon-key", "anon"]
                .iter()
                .chain(args),
        )
    }

    #[test]
    fn defaults_build_an_app_config() -> TestResult {
        let config = parse(&["--time-zone", "UTC"])?;
        let app = config.app_config()?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8698");
        assert_eq!(app.backend.timeout, Duration::from_secs(10));
        assert_eq!(app.cards.title, "Certificado de Regalo");
        assert_eq!(app.cards.font_path, None);

        Ok(())
    }

    #[test]
    fn unknown_time_zone_is_rejected() -> TestResult {
        let config = parse(&["--time-zone", "Mars/Olympus_Mons"])?;

        assert!(matches!(
            config.app_config(),
            Err(ConfigError::TimeZone { .. })
        ));

        Ok(())
    }
}
