//! # Herald Dispatch
//! The scheduled dispatch pipeline: theme selection → agent query →
//! response normalization → independent fan-out to the notification
//! channels, plus the hourly loop that drives it.

pub mod normalize;
pub mod orchestrator;
pub mod scheduler;

pub use normalize::normalize;
pub use orchestrator::Dispatcher;
pub use scheduler::run_hourly;
