//! # Herald Core
//! Shared configuration, error taxonomy, result types, and the
//! notification channel trait used across the Herald crates.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::HeraldConfig;
pub use error::{HeraldError, Result};
pub use traits::Channel;
pub use types::{ChannelOutcome, DispatchReport};
