//! Pusher descriptor records.
//!
//! A descriptor is the externally supplied record (typically persisted by an
//! account-settings API) that names which pusher kind to build plus whatever
//! handler-specific fields that kind needs. The registry only ever reads
//! `kind`; everything else is opaque until the selected constructor
//! validates it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An externally supplied request to build one pusher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PusherDescriptor {
    /// Which pusher implementation to construct (e.g. "http", "email").
    pub kind: String,
    /// Identifier of the application the pusher belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// Opaque per-device token the receiving service uses to route the
    /// notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pushkey: Option<String>,
    /// Human-readable name of the device that created the pusher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_display_name: Option<String>,
    /// Handler-specific fields, opaque to the registry ("url" for http
    /// pushers, "address" for email pushers).
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl PusherDescriptor {
    /// Creates a descriptor for the given kind with no handler fields.
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            ..Default::default()
        }
    }

    /// Adds one handler-specific string field.
    pub fn with_field(mut self, key: &str, value: &str) -> Self {
        self.data.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Returns a handler-specific field as a string, if present and a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}
