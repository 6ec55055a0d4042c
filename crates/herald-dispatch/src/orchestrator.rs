//! The dispatch orchestrator.
//!
//! One run: select a theme, query the agent, normalize, fan out to
//! the channels independently. A gateway failure aborts the run
//! before any notification goes out; a channel failure is recorded
//! and never blocks the sibling channel. Runs share no mutable state,
//! so a timer tick overlapping a slow manual run is fine.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use herald_catalog::ThemeCatalog;
use herald_core::config::ScheduleConfig;
use herald_core::error::Result;
use herald_core::traits::Channel;
use herald_core::types::{ChannelOutcome, DispatchReport};
use herald_gateway::AgentGateway;

use crate::normalize::normalize;

/// Theme label used for manual custom-prompt runs.
const MANUAL_THEME: &str = "manual";

/// Which channels a run dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fanout {
    /// Webhook + messenger (scheduled and random runs).
    All,
    /// Messenger only (manual custom-prompt runs).
    MessengerOnly,
}

pub struct Dispatcher {
    catalog: Arc<ThemeCatalog>,
    gateway: Arc<dyn AgentGateway>,
    webhook: Arc<dyn Channel>,
    messenger: Arc<dyn Channel>,
    schedule: ScheduleConfig,
}

impl Dispatcher {
    pub fn new(
        catalog: Arc<ThemeCatalog>,
        gateway: Arc<dyn AgentGateway>,
        webhook: Arc<dyn Channel>,
        messenger: Arc<dyn Channel>,
        schedule: ScheduleConfig,
    ) -> Self {
        Self {
            catalog,
            gateway,
            webhook,
            messenger,
            schedule,
        }
    }

    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    /// Timer-triggered run. Returns `Ok(None)` when `hour` falls
    /// outside the active window — the gate is evaluated before any
    /// theme selection or network call.
    pub async fn run_scheduled(&self, hour: u32) -> Result<Option<DispatchReport>> {
        if !self.schedule.in_active_window(hour) {
            tracing::debug!(hour, "outside active window, skipping scheduled run");
            return Ok(None);
        }
        let entry = self.catalog.entry_for_time(hour)?;
        tracing::info!(theme = %entry.theme, agent_mode = entry.agent_mode, "scheduled run");
        let report = self
            .execute(&entry.theme, &entry.prompt, entry.agent_mode, Fanout::All)
            .await?;
        Ok(Some(report))
    }

    /// Manual random-theme run. Bypasses the time gate.
    pub async fn run_random(&self) -> Result<DispatchReport> {
        let entry = self.catalog.random_entry()?;
        tracing::info!(theme = %entry.theme, agent_mode = entry.agent_mode, "manual random run");
        self.execute(&entry.theme, &entry.prompt, entry.agent_mode, Fanout::All)
            .await
    }

    /// Manual custom-prompt run. Always forces autonomous-agent mode
    /// and dispatches only to the messenger channel.
    pub async fn run_custom(&self, prompt: &str) -> Result<DispatchReport> {
        tracing::info!("manual custom-prompt run (agent mode forced)");
        self.execute(MANUAL_THEME, prompt, true, Fanout::MessengerOnly)
            .await
    }

    async fn execute(
        &self,
        theme: &str,
        prompt: &str,
        agent_mode: bool,
        fanout: Fanout,
    ) -> Result<DispatchReport> {
        let started = Instant::now();

        // Gateway failure propagates here and aborts the run — no
        // partial notification is ever sent.
        let raw = self.gateway.ask(prompt, agent_mode, agent_mode).await?;
        tracing::debug!(raw_len = raw.len(), "agent response received");

        let cleaned = normalize(&raw);

        let mut channel_results = BTreeMap::new();
        if fanout == Fanout::All {
            let outcome = self.deliver(self.webhook.as_ref(), theme, &cleaned).await;
            channel_results.insert(self.webhook.name().to_string(), outcome);
        }
        let outcome = self.deliver(self.messenger.as_ref(), theme, &cleaned).await;
        channel_results.insert(self.messenger.name().to_string(), outcome);

        let report = DispatchReport {
            theme: theme.to_string(),
            raw_response: raw,
            cleaned_response: cleaned,
            channel_results,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        tracing::info!(
            theme = %report.theme,
            elapsed_ms = report.elapsed_ms,
            all_succeeded = report.all_succeeded(),
            "dispatch run finished"
        );
        Ok(report)
    }

    async fn deliver(&self, channel: &dyn Channel, title: &str, body: &str) -> ChannelOutcome {
        let outcome = ChannelOutcome::from(channel.notify(title, body).await);
        if let ChannelOutcome::Failure(reason) = &outcome {
            tracing::warn!(channel = channel.name(), %reason, "channel send failed");
        }
        outcome
    }
}
