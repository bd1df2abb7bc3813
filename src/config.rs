//! Configuration management for PushRelay
//!
//! This module defines the main `Config` struct and its sub-structs,
//! responsible for holding all application settings. It uses the `figment`
//! crate to load configuration from a `pushrelay.toml` file and merge it
//! with environment variables and command-line arguments.

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Settings for http-kind pushers.
    pub http: HttpConfig,
    /// Settings for email-kind pushers.
    pub email: EmailConfig,
}

/// Settings for http-kind pushers.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    /// Timeout for requests to push gateways, in seconds.
    pub request_timeout_seconds: u64,
}

/// Settings for email-kind pushers.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EmailConfig {
    /// Whether email pushers can be created at all. When disabled, the
    /// email registration is invisible to lookups.
    pub enable_notifications: bool,
    /// The From address placed on every outgoing mail.
    pub from_address: String,
    /// Prefix prepended to every mail subject line.
    pub subject_prefix: String,
    /// HTTP mail-API endpoint to deliver through. When absent, composed
    /// mail is logged instead of delivered.
    pub api_endpoint: Option<String>,
}

impl Config {
    /// Loads the application configuration by layering sources:
    /// defaults, TOML file, environment variables, and CLI arguments.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| "pushrelay.toml".into());

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            // Allow overriding with environment variables, e.g.
            // PUSHRELAY_EMAIL__ENABLE_NOTIFICATIONS=true
            .merge(Env::prefixed("PUSHRELAY_").split("__"))
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }
}

// Provide a default implementation for tests and easy setup.
impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            http: HttpConfig {
                request_timeout_seconds: 10,
            },
            email: EmailConfig {
                enable_notifications: false,
                from_address: "notifications@localhost".to_string(),
                subject_prefix: "[pushrelay]".to_string(),
                api_endpoint: None,
            },
        }
    }
}
