//! # Herald Gateway
//! Client boundary to the external AI agent.
//!
//! One configurable HTTP client replaces the pile of near-identical
//! per-endpoint clients this service grew out of: the endpoint, the
//! path, and the two timeouts all come from configuration, and the
//! call mode is selected per request.

use std::time::Duration;

use async_trait::async_trait;

use herald_core::config::GatewayConfig;
use herald_core::error::{HeraldError, Result};

/// The agent boundary consumed by the orchestrator.
///
/// `ask` blocks the calling task for the duration of the call —
/// seconds for a plain query, minutes for an autonomous-agent run.
#[async_trait]
pub trait AgentGateway: Send + Sync {
    async fn ask(&self, prompt: &str, use_search: bool, use_agent: bool) -> Result<String>;
}

/// HTTP implementation: GET with `q` / `search` / `agent` query
/// parameters, raw response body returned as text.
pub struct HttpAgentGateway {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl HttpAgentGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn ask_url(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.ask_path
        )
    }

    /// Autonomous-agent calls get the long timeout, plain queries the
    /// short one.
    fn timeout_for(&self, use_agent: bool) -> Duration {
        if use_agent {
            Duration::from_secs(self.config.agent_timeout_secs)
        } else {
            Duration::from_secs(self.config.query_timeout_secs)
        }
    }
}

#[async_trait]
impl AgentGateway for HttpAgentGateway {
    async fn ask(&self, prompt: &str, use_search: bool, use_agent: bool) -> Result<String> {
        let url = self.ask_url();
        tracing::debug!(%url, use_search, use_agent, "querying agent");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", prompt),
                ("search", if use_search { "true" } else { "false" }),
                ("agent", if use_agent { "true" } else { "false" }),
            ])
            .timeout(self.timeout_for(use_agent))
            .send()
            .await
            .map_err(|e| HeraldError::Gateway(format!("agent request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HeraldError::Gateway(format!("agent response read failed: {e}")))?;

        if !status.is_success() {
            return Err(HeraldError::Gateway(format!(
                "agent returned {status}: {body}"
            )));
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> HttpAgentGateway {
        HttpAgentGateway::new(GatewayConfig {
            base_url: "http://localhost:3000/".into(),
            ask_path: "/users".into(),
            query_timeout_secs: 30,
            agent_timeout_secs: 300,
        })
    }

    #[test]
    fn test_ask_url_joins_without_double_slash() {
        assert_eq!(gateway().ask_url(), "http://localhost:3000/users");
    }

    #[test]
    fn test_timeout_selection() {
        let gw = gateway();
        assert_eq!(gw.timeout_for(false), Duration::from_secs(30));
        assert_eq!(gw.timeout_for(true), Duration::from_secs(300));
    }

    #[tokio::test]
    async fn test_unreachable_agent_is_gateway_error() {
        // Port 9 (discard) is never serving HTTP locally.
        let gw = HttpAgentGateway::new(GatewayConfig {
            base_url: "http://127.0.0.1:9".into(),
            ask_path: "/users".into(),
            query_timeout_secs: 1,
            agent_timeout_secs: 1,
        });
        let err = gw.ask("hello", false, false).await.unwrap_err();
        assert!(matches!(err, HeraldError::Gateway(_)));
    }
}
