//! Herald configuration system.
//!
//! TOML file at `~/.herald/config.toml`; every field has a default so
//! an empty file (or none at all) yields a runnable configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{HeraldError, Result};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HeraldConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub kakao: KakaoConfig,
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Extra themes overlaid on the built-in catalog.
    #[serde(default)]
    pub themes: Vec<ThemeSeed>,
}

impl HeraldConfig {
    /// Load config from the default path (~/.herald/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HeraldError::Config(format!("failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| HeraldError::Config(format!("failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| HeraldError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the Herald home directory (~/.herald).
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".herald")
    }
}

/// AI agent gateway configuration. One endpoint for everything; the
/// two timeouts are the only distinction between a plain query and a
/// long-running autonomous-agent call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_url")]
    pub base_url: String,
    #[serde(default = "default_ask_path")]
    pub ask_path: String,
    /// Plain query timeout — seconds.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
    /// Autonomous-agent call timeout — minutes-scale.
    #[serde(default = "default_agent_timeout")]
    pub agent_timeout_secs: u64,
}

fn default_gateway_url() -> String { "http://localhost:3000".into() }
fn default_ask_path() -> String { "/users".into() }
fn default_query_timeout() -> u64 { 30 }
fn default_agent_timeout() -> u64 { 300 }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_gateway_url(),
            ask_path: default_ask_path(),
            query_timeout_secs: default_query_timeout(),
            agent_timeout_secs: default_agent_timeout(),
        }
    }
}

/// Kakao message channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KakaoConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub redirect_uri: String,
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
    #[serde(default = "default_authorize_endpoint")]
    pub authorize_endpoint: String,
    #[serde(default = "default_send_endpoint")]
    pub send_endpoint: String,
    /// Persisted token record. Empty means ~/.herald/kakao-tokens.json.
    #[serde(default)]
    pub token_path: String,
    #[serde(default = "default_link_url")]
    pub web_url: String,
    #[serde(default = "default_link_url")]
    pub mobile_web_url: String,
    #[serde(default = "default_button_title")]
    pub button_title: String,
}

fn default_token_endpoint() -> String { "https://kauth.kakao.com/oauth/token".into() }
fn default_authorize_endpoint() -> String { "https://kauth.kakao.com/oauth/authorize".into() }
fn default_send_endpoint() -> String {
    "https://kapi.kakao.com/v2/api/talk/memo/default/send".into()
}
fn default_link_url() -> String { "https://developers.kakao.com".into() }
fn default_button_title() -> String { "Open".into() }

impl Default for KakaoConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            redirect_uri: String::new(),
            token_endpoint: default_token_endpoint(),
            authorize_endpoint: default_authorize_endpoint(),
            send_endpoint: default_send_endpoint(),
            token_path: String::new(),
            web_url: default_link_url(),
            mobile_web_url: default_link_url(),
            button_title: default_button_title(),
        }
    }
}

impl KakaoConfig {
    /// Resolved token record path.
    pub fn token_file(&self) -> PathBuf {
        if self.token_path.is_empty() {
            HeraldConfig::home_dir().join("kakao-tokens.json")
        } else {
            PathBuf::from(&self.token_path)
        }
    }
}

/// Slack webhook configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SlackConfig {
    #[serde(default)]
    pub webhook_url: String,
}

/// Scheduling policy: active window, check cadence, and the
/// hour-band → theme mapping used by time-based selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// First hour (inclusive) of the active window for timer runs.
    #[serde(default = "default_active_start")]
    pub active_start_hour: u32,
    /// Last hour (inclusive) of the active window.
    #[serde(default = "default_active_end")]
    pub active_end_hour: u32,
    /// How often the loop checks whether a new hour has started.
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,
    #[serde(default = "default_bands")]
    pub bands: Vec<ThemeBand>,
}

fn default_active_start() -> u32 { 9 }
fn default_active_end() -> u32 { 20 }
fn default_check_interval() -> u64 { 60 }

fn default_bands() -> Vec<ThemeBand> {
    vec![
        ThemeBand::new(6, 11, &["news", "weather"]),
        ThemeBand::new(12, 17, &["tech", "trivia"]),
        ThemeBand::new(18, 22, &["quote", "history"]),
        ThemeBand::new(23, 5, &["quote"]),
    ]
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            active_start_hour: default_active_start(),
            active_end_hour: default_active_end(),
            check_interval_secs: default_check_interval(),
            bands: default_bands(),
        }
    }
}

impl ScheduleConfig {
    /// True when a timer-triggered run is allowed at `hour`.
    pub fn in_active_window(&self, hour: u32) -> bool {
        hour >= self.active_start_hour && hour <= self.active_end_hour
    }
}

/// One hour band mapped to a theme subset. `start_hour > end_hour`
/// means the band wraps midnight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeBand {
    pub start_hour: u32,
    pub end_hour: u32,
    pub themes: Vec<String>,
}

impl ThemeBand {
    pub fn new(start_hour: u32, end_hour: u32, themes: &[&str]) -> Self {
        Self {
            start_hour,
            end_hour,
            themes: themes.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour <= self.end_hour
        } else {
            hour >= self.start_hour || hour <= self.end_hour
        }
    }
}

/// A theme entry supplied via config, overlaid on the built-in set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeSeed {
    pub name: String,
    pub prompt: String,
    #[serde(default)]
    pub agent_mode: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HeraldConfig::default();
        assert_eq!(config.gateway.base_url, "http://localhost:3000");
        assert_eq!(config.gateway.query_timeout_secs, 30);
        assert_eq!(config.gateway.agent_timeout_secs, 300);
        assert_eq!(config.schedule.active_start_hour, 9);
        assert_eq!(config.schedule.active_end_hour, 20);
        assert!(config.kakao.token_endpoint.contains("kauth.kakao.com"));
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            [gateway]
            base_url = "http://agent.internal:8080"
            agent_timeout_secs = 600

            [slack]
            webhook_url = "https://hooks.slack.com/services/T0/B0/xyz"

            [[themes]]
            name = "crypto"
            prompt = "Summarize today's crypto market."
            agent_mode = true
        "#;

        let config: HeraldConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gateway.base_url, "http://agent.internal:8080");
        assert_eq!(config.gateway.agent_timeout_secs, 600);
        assert_eq!(config.gateway.query_timeout_secs, 30);
        assert_eq!(config.themes.len(), 1);
        assert!(config.themes[0].agent_mode);
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let toml_str = "";
        let config: HeraldConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.schedule.check_interval_secs, 60);
        assert_eq!(config.schedule.bands.len(), 4);
        assert!(config.slack.webhook_url.is_empty());
    }

    #[test]
    fn test_active_window() {
        let schedule = ScheduleConfig::default();
        assert!(!schedule.in_active_window(3));
        assert!(!schedule.in_active_window(8));
        assert!(schedule.in_active_window(9));
        assert!(schedule.in_active_window(20));
        assert!(!schedule.in_active_window(21));
    }

    #[test]
    fn test_band_wraps_midnight() {
        let band = ThemeBand::new(23, 5, &["quote"]);
        assert!(band.contains(23));
        assert!(band.contains(0));
        assert!(band.contains(5));
        assert!(!band.contains(6));
        assert!(!band.contains(22));
    }

    #[test]
    fn test_default_bands_cover_every_hour() {
        let schedule = ScheduleConfig::default();
        for hour in 0..24 {
            assert!(
                schedule.bands.iter().any(|b| b.contains(hour)),
                "hour {hour} not covered"
            );
        }
    }

    #[test]
    fn test_token_file_default_path() {
        let kakao = KakaoConfig::default();
        assert!(kakao.token_file().ends_with("kakao-tokens.json"));
    }
}
