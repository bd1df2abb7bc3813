//! PushRelay - notification pusher registry and delivery
//!
//! This library maintains a registry of notification-delivery handler
//! kinds and constructs pusher instances from externally supplied
//! descriptor records.

pub mod cli;
pub mod config;
pub mod context;
pub mod core;
pub mod descriptor;
pub mod factory;
pub mod mailer;
pub mod pushers;

// Re-export core types for convenience
pub use self::core::*;

use chrono::Utc;

/// Helper function to build a notification stamped with the current time.
pub fn build_notification(sender: &str, summary: &str, body: &str) -> Notification {
    Notification {
        timestamp: Utc::now().to_rfc3339(),
        sender: sender.to_string(),
        summary: summary.to_string(),
        body: body.to_string(),
    }
}
