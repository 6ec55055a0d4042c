//! The notification channel seam.

use async_trait::async_trait;

use crate::error::Result;

/// An outbound notification destination.
///
/// Channels own their own formatting: the webhook channel renders a
/// rich header/body layout, the messenger channel prefixes the title
/// onto a plain text message. Senders never panic — any transport or
/// API failure comes back as an error for the orchestrator to record.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Stable channel name, used as the key in dispatch reports.
    fn name(&self) -> &str;

    /// Whether the channel has usable configuration. An unconfigured
    /// channel still participates in fan-out; its send fails fast.
    fn is_configured(&self) -> bool {
        true
    }

    /// Deliver one notification.
    async fn notify(&self, title: &str, body: &str) -> Result<()>;
}
