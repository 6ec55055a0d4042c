//! Kakao "memo to self" channel — OAuth token lifecycle + message send.
//!
//! Token endpoint: form-encoded authorization-code exchange.
//! Send endpoint: `template_object` form payload with a Bearer header;
//! the API reports success as `result_code == 0` in the JSON body.

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use herald_core::config::KakaoConfig;
use herald_core::error::{HeraldError, Result};
use herald_core::traits::Channel;

use crate::token::{TokenPair, TokenStore};

const CHANNEL_NAME: &str = "kakao";

/// Kakao channel with a persisted token pair and an in-memory cache.
///
/// The cache sits behind a mutex held across the whole authorize/send
/// critical section, so a concurrent send never observes a
/// half-updated pair and store writes never interleave.
pub struct KakaoChannel {
    config: KakaoConfig,
    store: TokenStore,
    token: Mutex<Option<TokenPair>>,
    client: reqwest::Client,
}

impl KakaoChannel {
    pub fn new(config: KakaoConfig) -> Self {
        let store = TokenStore::new(config.token_file());
        Self {
            config,
            store,
            token: Mutex::new(None),
            client: reqwest::Client::new(),
        }
    }

    /// The URL a user visits to obtain an authorization code.
    pub fn auth_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code",
            self.config.authorize_endpoint, self.config.client_id, self.config.redirect_uri
        )
    }

    /// Exchange an authorization code for a token pair and persist
    /// it. On any failure the previously stored pair stays untouched.
    pub async fn authorize(&self, code: &str) -> Result<()> {
        let mut guard = self.token.lock().await;

        let response = self
            .client
            .post(&self.config.token_endpoint)
            .form(&[
                ("code", code),
                ("grant_type", "authorization_code"),
                ("client_id", &self.config.client_id),
                ("redirect_uri", &self.config.redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| HeraldError::channel(CHANNEL_NAME, format!("token request failed: {e}")))?;

        let status = response.status();
        let body: Value = response.json().await.map_err(|e| {
            HeraldError::channel(CHANNEL_NAME, format!("invalid token response: {e}"))
        })?;

        if !status.is_success() {
            return Err(HeraldError::channel(
                CHANNEL_NAME,
                format!("token endpoint returned {status}: {body}"),
            ));
        }

        // Parse failures return before any store write, so a bad
        // code never disturbs a previously stored pair.
        let pair = parse_token_pair(&body)?;
        self.store.save(&pair)?;
        *guard = Some(pair);
        tracing::info!("kakao authorization complete");
        Ok(())
    }

    /// Send a text message to the authorized user. Fails immediately
    /// with `Unauthenticated` (no network call) when no token pair is
    /// available from the cache or the store.
    pub async fn send(&self, text: &str) -> Result<()> {
        let mut guard = self.token.lock().await;
        if guard.is_none() {
            *guard = self.store.load();
        }
        let pair = guard.as_ref().ok_or(HeraldError::Unauthenticated)?;

        let template = build_template(text, &self.config);
        let response = self
            .client
            .post(&self.config.send_endpoint)
            .bearer_auth(&pair.access_token)
            .form(&[("template_object", template.to_string())])
            .send()
            .await
            .map_err(|e| HeraldError::channel(CHANNEL_NAME, format!("send failed: {e}")))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| HeraldError::channel(CHANNEL_NAME, format!("invalid send response: {e}")))?;

        if !status.is_success() {
            let msg = body
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(HeraldError::channel(
                CHANNEL_NAME,
                format!("send returned {status}: {msg}"),
            ));
        }

        match result_code(&body) {
            Some(code) if code == "0" => {
                tracing::info!("kakao message sent");
                Ok(())
            }
            Some(code) => {
                let msg = body
                    .get("msg")
                    .and_then(Value::as_str)
                    .unwrap_or("send rejected");
                Err(HeraldError::channel(
                    CHANNEL_NAME,
                    format!("result_code {code}: {msg}"),
                ))
            }
            None => Err(HeraldError::channel(
                CHANNEL_NAME,
                "response missing result_code",
            )),
        }
    }

    /// Whether a token pair is available without making a network call.
    pub async fn is_authorized(&self) -> bool {
        let mut guard = self.token.lock().await;
        if guard.is_none() {
            *guard = self.store.load();
        }
        guard.is_some()
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }
}

#[async_trait]
impl Channel for KakaoChannel {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    fn is_configured(&self) -> bool {
        !self.config.client_id.is_empty()
    }

    async fn notify(&self, title: &str, body: &str) -> Result<()> {
        self.send(&format!("[{title}]\n{body}")).await
    }
}

/// The `template_object` payload for a default "text" template.
fn build_template(text: &str, config: &KakaoConfig) -> Value {
    json!({
        "object_type": "text",
        "text": text,
        "link": {
            "web_url": config.web_url,
            "mobile_web_url": config.mobile_web_url,
        },
        "button_title": config.button_title,
    })
}

/// `result_code` arrives as a JSON number; tolerate a string too.
fn result_code(body: &Value) -> Option<String> {
    match body.get("result_code")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract a token pair from a token-endpoint response, requiring
/// both fields present and non-empty.
fn parse_token_pair(body: &Value) -> Result<TokenPair> {
    let access = non_empty_str(body, "access_token")?;
    let refresh = non_empty_str(body, "refresh_token")?;
    Ok(TokenPair::new(access, refresh))
}

fn non_empty_str(body: &Value, field: &str) -> Result<String> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            HeraldError::channel(CHANNEL_NAME, format!("token response missing {field}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(name: &str) -> KakaoConfig {
        let dir = std::env::temp_dir().join(format!("herald-kakao-test-{name}"));
        std::fs::remove_dir_all(&dir).ok();
        KakaoConfig {
            client_id: "client-123".into(),
            redirect_uri: "http://localhost:8081/kakao/callback".into(),
            token_path: dir.join("tokens.json").to_string_lossy().into_owned(),
            ..KakaoConfig::default()
        }
    }

    #[test]
    fn test_template_payload_shape() {
        let template = build_template("hello there", &KakaoConfig::default());
        assert_eq!(template["object_type"], "text");
        assert_eq!(template["text"], "hello there");
        assert_eq!(template["link"]["web_url"], "https://developers.kakao.com");
        assert_eq!(
            template["link"]["mobile_web_url"],
            "https://developers.kakao.com"
        );
        assert_eq!(template["button_title"], "Open");
    }

    #[test]
    fn test_auth_url_carries_oauth_params() {
        let channel = KakaoChannel::new(config("auth-url"));
        let url = channel.auth_url();
        assert!(url.starts_with("https://kauth.kakao.com/oauth/authorize?"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("response_type=code"));
    }

    #[test]
    fn test_result_code_accepts_number_or_string() {
        assert_eq!(result_code(&json!({"result_code": 0})).as_deref(), Some("0"));
        assert_eq!(
            result_code(&json!({"result_code": "0"})).as_deref(),
            Some("0")
        );
        assert!(result_code(&json!({"msg": "no code"})).is_none());
    }

    #[test]
    fn test_non_empty_str_rejects_empty_token() {
        let body = json!({"access_token": "", "refresh_token": "r"});
        assert!(non_empty_str(&body, "access_token").is_err());
        assert!(non_empty_str(&body, "refresh_token").is_ok());
    }

    #[test]
    fn test_failed_exchange_leaves_stored_pair_untouched() {
        let cfg = config("bad-code");
        let store = TokenStore::new(PathBuf::from(&cfg.token_path));
        let previous = TokenPair::new("old-access", "old-refresh");
        store.save(&previous).unwrap();

        // A token response with no access_token fails at the parse
        // step, before authorize() would touch the store.
        let body = json!({"error": "invalid_grant"});
        assert!(parse_token_pair(&body).is_err());
        assert_eq!(store.load().unwrap(), previous);
    }

    #[test]
    fn test_parse_token_pair_happy_path() {
        let body = json!({
            "access_token": "acc",
            "refresh_token": "ref",
            "expires_in": 21599
        });
        let pair = parse_token_pair(&body).unwrap();
        assert_eq!(pair.access_token, "acc");
        assert_eq!(pair.refresh_token, "ref");
    }

    #[tokio::test]
    async fn test_send_without_token_is_unauthenticated() {
        let channel = KakaoChannel::new(config("unauthenticated"));
        let err = channel.send("hello").await.unwrap_err();
        assert!(matches!(err, HeraldError::Unauthenticated));
        assert!(!channel.is_authorized().await);
    }

    #[tokio::test]
    async fn test_stored_token_is_picked_up() {
        let cfg = config("stored-token");
        let store = TokenStore::new(PathBuf::from(&cfg.token_path));
        store.save(&TokenPair::new("access", "refresh")).unwrap();

        let channel = KakaoChannel::new(cfg);
        assert!(channel.is_authorized().await);
    }
}
