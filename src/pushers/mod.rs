//! Concrete pusher implementations.
//!
//! Each submodule provides one transport. Constructors follow the
//! registry's extension contract: they take the shared context and the
//! caller's descriptor, validate their own handler-specific fields, and
//! return a ready pusher.

pub mod email;
pub mod http;

pub use email::EmailPusher;
pub use http::HttpPusher;
