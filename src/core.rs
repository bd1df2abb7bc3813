//! Core domain types and trait contracts for PushRelay
//!
//! This module defines the notification payload, the contract every pusher
//! implementation must satisfy, and the error taxonomy shared by pusher
//! constructors and delivery paths.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A notification payload handed to a pusher for delivery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Notification {
    /// ISO 8601 timestamp when the notification was generated
    pub timestamp: String,
    /// Display name of whoever triggered the notification
    pub sender: String,
    /// Short one-line summary
    pub summary: String,
    /// Full notification text
    pub body: String,
}

/// Errors raised by pusher constructors and delivery paths.
///
/// An unknown pusher kind is not represented here: lookup misses are
/// reported through [`crate::factory::PusherLookup::NoSuchKind`], never as
/// an error.
#[derive(Error, Debug)]
pub enum PusherError {
    #[error("descriptor is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("descriptor field `{field}` is invalid: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    #[error("pusher kind `{0}` is already registered")]
    DuplicateKind(String),

    #[error("push gateway returned status {status}: {body}")]
    Gateway { status: u16, body: String },

    #[error("mail delivery failed: {0}")]
    Mail(String),

    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Delivers notifications to an end user over one transport.
///
/// Implementations are constructed by the registry from a
/// [`crate::descriptor::PusherDescriptor`] and must be shareable across
/// tasks.
#[async_trait]
pub trait Pusher: Send + Sync {
    /// The kind identifier this pusher was registered under (e.g. "http").
    /// Used for logging and metrics.
    fn kind(&self) -> &'static str;

    /// Delivers a single notification.
    ///
    /// # Returns
    /// * `Ok(())` if the notification was handed to the transport
    /// * `Err` if delivery failed (gateway error, transport error, etc.)
    async fn push(&self, notification: &Notification) -> Result<(), PusherError>;
}
