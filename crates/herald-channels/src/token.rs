//! Persisted OAuth token record.
//!
//! A single JSON file holds the access/refresh pair. Absence is a
//! valid state — every read problem (missing file, bad JSON, empty
//! fields) degrades to "no token available" and is only logged, never
//! surfaced to the scheduler. Writes go through a temp file + rename
//! so a reader can't observe a half-written record.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use herald_core::error::{HeraldError, Result};

/// An OAuth access/refresh token pair. Always fully populated — a
/// pair with an empty token never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub updated_at: DateTime<Utc>,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            updated_at: Utc::now(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }
}

/// File-backed token store. Callers serialize writes externally (the
/// Kakao channel holds its token mutex across save calls).
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted pair. Any failure degrades to `None`.
    pub fn load(&self) -> Option<TokenPair> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no token record");
            return None;
        }
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "token record unreadable: {e}");
                return None;
            }
        };
        let pair: TokenPair = match serde_json::from_str(&content) {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "token record malformed: {e}");
                return None;
            }
        };
        if !pair.is_complete() {
            tracing::warn!("token record is missing a token; treating as absent");
            return None;
        }
        Some(pair)
    }

    /// Overwrite the persisted record. Atomic from a reader's point
    /// of view: written to a sibling temp file, then renamed.
    pub fn save(&self, pair: &TokenPair) -> Result<()> {
        if !pair.is_complete() {
            return Err(HeraldError::Store(
                "refusing to persist a partial token pair".into(),
            ));
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| HeraldError::Store(format!("create dir failed: {e}")))?;
        }
        let json = serde_json::to_string_pretty(pair)
            .map_err(|e| HeraldError::Store(format!("serialize failed: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)
            .map_err(|e| HeraldError::Store(format!("write failed: {e}")))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| HeraldError::Store(format!("rename failed: {e}")))?;
        tracing::info!(path = %self.path.display(), "token record saved");
        Ok(())
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Delete the record. Deleting a missing record is success.
    pub fn delete(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(HeraldError::Store(format!("delete failed: {e}"))),
        }
    }
}
