//! Client error types.
//!
//! Protocol-level problems never surface here: malformed server input is
//! dropped by the codec or ignored by the built-in handlers. What remains
//! are setup and lifecycle failures.

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The client was closed or the outbound receiver was dropped.
    #[error("client is closed")]
    Closed,
}
