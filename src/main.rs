//! PushRelay - Notification Pusher Runner
//!
//! Loads configuration, builds the pusher capability table, constructs
//! pushers from a descriptors file, and optionally sends a test
//! notification through each.

use anyhow::{Context as _, Result};
use clap::Parser;
use pushrelay::{
    build_notification,
    cli::Cli,
    config::Config,
    context::PusherContext,
    core::Pusher,
    descriptor::PusherDescriptor,
    factory::{PusherLookup, PusherRegistry},
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = Config::load(&cli).unwrap_or_else(|err| {
        // Manually initialize logging for this specific error
        tracing_subscriber::fmt().init();
        error!("Failed to load configuration: {}", err);
        // Exit if configuration fails, as it's a critical step.
        std::process::exit(1);
    });

    // Initialize logging
    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("PushRelay starting up...");

    // Log the loaded configuration settings for visibility
    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!(
        "HTTP Request Timeout: {}s",
        config.http.request_timeout_seconds
    );
    info!(
        "Email Notifications: {}",
        if config.email.enable_notifications {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    info!("Email From Address: {}", config.email.from_address);
    if let Some(endpoint) = &config.email.api_endpoint {
        info!("Mail API Endpoint: {}", endpoint);
    } else {
        info!("Mail API Endpoint: Not configured (mail is logged)");
    }
    info!("-------------------------------------------------------");

    let context = Arc::new(PusherContext::from_config(&config)?);
    let registry = PusherRegistry::with_default_kinds();

    for (kind, enabled) in registry.audit(&context) {
        info!(kind, enabled, "Registered pusher kind");
    }

    let Some(descriptors_path) = &cli.descriptors else {
        info!("No descriptors file given, nothing to do.");
        return Ok(());
    };

    let raw = std::fs::read_to_string(descriptors_path)
        .with_context(|| format!("failed to read {}", descriptors_path.display()))?;
    let descriptors: Vec<PusherDescriptor> =
        serde_json::from_str(&raw).context("descriptors file is not a JSON array of pushers")?;
    info!("Loaded {} pusher descriptors.", descriptors.len());

    let mut pushers: Vec<Box<dyn Pusher>> = Vec::new();
    for descriptor in &descriptors {
        match registry.create_pusher(&context, descriptor) {
            Ok(PusherLookup::Found(pusher)) => {
                info!(kind = pusher.kind(), "Pusher ready");
                pushers.push(pusher);
            }
            Ok(PusherLookup::NoSuchKind(kind)) => {
                warn!(%kind, "No registered pusher kind matched; skipping descriptor");
            }
            Err(err) => {
                error!(kind = %descriptor.kind, error = %err, "Failed to construct pusher");
            }
        }
    }
    info!(
        "Constructed {} of {} pushers.",
        pushers.len(),
        descriptors.len()
    );

    if cli.send_test {
        let notification = build_notification(
            "pushrelay",
            "Test notification",
            "This is a test notification sent from the pushrelay runner.",
        );
        for pusher in &pushers {
            match pusher.push(&notification).await {
                Ok(()) => info!(kind = pusher.kind(), "Test notification delivered"),
                Err(err) => {
                    error!(kind = pusher.kind(), error = %err, "Test notification failed")
                }
            }
        }
    }

    info!("Done.");
    Ok(())
}
