//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using
//! the `clap` crate. These arguments are parsed at startup and then merged
//! with the configuration from the `pushrelay.toml` file and environment
//! variables.

use clap::Parser;
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Builds and exercises notification pushers from descriptor records.
#[derive(Parser, Debug, Default, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to a JSON file containing an array of pusher descriptors.
    #[arg(short, long, value_name = "FILE")]
    pub descriptors: Option<PathBuf>,

    /// Send a test notification through every pusher that was created.
    #[arg(long)]
    pub send_test: bool,

    /// Override the configured log level.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Enable or disable email pushers, overriding the config file.
    #[arg(long, value_name = "BOOL")]
    pub email_notifs: Option<bool>,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        if let Some(enabled) = self.email_notifs {
            dict.insert(
                "email.enable_notifications".into(),
                Value::from(enabled),
            );
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
