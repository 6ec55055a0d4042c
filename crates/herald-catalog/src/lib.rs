//! # Herald Catalog
//! Theme → prompt registry with time-of-day selection.
//!
//! Append-only within process lifetime; reads stay safe during a
//! concurrent `add` via an interior `RwLock`.

use std::sync::RwLock;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use herald_core::config::{ThemeBand, ThemeSeed};
use herald_core::error::{HeraldError, Result};

/// One registered theme. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeEntry {
    /// Unique key.
    pub theme: String,
    pub prompt: String,
    /// Whether scheduled runs call the gateway in autonomous-agent
    /// (search-augmented) mode for this theme.
    #[serde(default)]
    pub agent_mode: bool,
}

impl ThemeEntry {
    pub fn new(theme: impl Into<String>, prompt: impl Into<String>, agent_mode: bool) -> Self {
        Self {
            theme: theme.into(),
            prompt: prompt.into(),
            agent_mode,
        }
    }
}

/// Registry of themes plus the hour-band mapping used by
/// `entry_for_time`. Bands come from configuration; the catalog never
/// hard-codes hour boundaries.
pub struct ThemeCatalog {
    entries: RwLock<Vec<ThemeEntry>>,
    bands: Vec<ThemeBand>,
}

impl ThemeCatalog {
    /// Empty catalog with the given time bands.
    pub fn new(bands: Vec<ThemeBand>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            bands,
        }
    }

    /// Catalog pre-seeded with the built-in themes, then overlaid
    /// with config-supplied ones (same name replaces the built-in).
    pub fn with_defaults(bands: Vec<ThemeBand>, extra: &[ThemeSeed]) -> Self {
        let catalog = Self::new(bands);
        for entry in builtin_themes() {
            catalog.add(entry.theme, entry.prompt, entry.agent_mode);
        }
        for seed in extra {
            catalog.add(seed.name.clone(), seed.prompt.clone(), seed.agent_mode);
        }
        catalog
    }

    /// Insert or overwrite the entry keyed by `theme`. Overwrites
    /// keep the original registration position.
    pub fn add(&self, theme: impl Into<String>, prompt: impl Into<String>, agent_mode: bool) {
        let entry = ThemeEntry::new(theme, prompt, agent_mode);
        let mut entries = self.entries.write().expect("catalog lock poisoned");
        match entries.iter_mut().find(|e| e.theme == entry.theme) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }

    /// Full snapshot in registration order.
    pub fn all(&self) -> Vec<ThemeEntry> {
        self.entries.read().expect("catalog lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("catalog lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Uniform random entry.
    pub fn random_entry(&self) -> Result<ThemeEntry> {
        let entries = self.entries.read().expect("catalog lock poisoned");
        entries
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(HeraldError::EmptyCatalog)
    }

    /// Entry for the given hour (0..=23): uniform pick within the
    /// matching band's themes, falling back to `random_entry` when no
    /// band matches or none of the band's themes are registered.
    /// Total for every hour as long as the catalog is non-empty.
    pub fn entry_for_time(&self, hour: u32) -> Result<ThemeEntry> {
        let band = self.bands.iter().find(|b| b.contains(hour % 24));
        if let Some(band) = band {
            let entries = self.entries.read().expect("catalog lock poisoned");
            let matching: Vec<&ThemeEntry> = entries
                .iter()
                .filter(|e| band.themes.iter().any(|t| t == &e.theme))
                .collect();
            if let Some(entry) = matching.choose(&mut rand::thread_rng()) {
                return Ok((*entry).clone());
            }
        }
        self.random_entry()
    }
}

/// Built-in themes. Search-dependent ones run in agent mode.
fn builtin_themes() -> Vec<ThemeEntry> {
    vec![
        ThemeEntry::new(
            "news",
            "Summarize the three most important technology news stories right now, \
             one sentence each.",
            true,
        ),
        ThemeEntry::new(
            "weather",
            "What is today's weather outlook for Seoul? Keep it to two sentences.",
            true,
        ),
        ThemeEntry::new(
            "tech",
            "Explain one practical software engineering tip in a few sentences.",
            false,
        ),
        ThemeEntry::new(
            "trivia",
            "Share a surprising fact about computers or the internet.",
            false,
        ),
        ThemeEntry::new(
            "quote",
            "Share an inspiring quote about programming and briefly explain it.",
            false,
        ),
        ThemeEntry::new(
            "history",
            "Describe an interesting event in computing history in a short paragraph.",
            false,
        ),
    ]
}
