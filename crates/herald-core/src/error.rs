//! Error taxonomy for the dispatch pipeline.
//!
//! None of these are process-fatal: gateway failures abort a single
//! run, channel failures are isolated per channel, and token store
//! read problems degrade to "no token" before they ever reach here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeraldError {
    /// No themes registered — nothing to select.
    #[error("theme catalog is empty")]
    EmptyCatalog,

    /// The AI agent call failed (network error, non-2xx, timeout).
    #[error("agent gateway error: {0}")]
    Gateway(String),

    /// The OAuth channel has no usable token pair.
    #[error("not authenticated: no OAuth token available (run `herald authorize` first)")]
    Unauthenticated,

    /// A notification channel rejected or failed a send.
    #[error("channel error ({channel}): {reason}")]
    Channel { channel: String, reason: String },

    /// Token store write failure.
    #[error("token store error: {0}")]
    Store(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl HeraldError {
    /// Shorthand for channel failures, which always carry the
    /// channel name for diagnostics.
    pub fn channel(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Channel {
            channel: channel.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HeraldError>;
