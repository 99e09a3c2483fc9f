//! Progress — the persisted part of a learner's state, and export codes.
//!
//! Only long-lived facts are kept here: badges, practiced command names,
//! the level reached and challenge points. Buffer contents, undo history
//! and marks belong to a session and are never persisted.
//!
//! An export code is `VIM_MASTER_PROGRESS_` followed by the standard base64
//! encoding of the snapshot's JSON. Import accepts the code with or without
//! the prefix.

use std::collections::BTreeSet;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use dojo_editor::Usage;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const EXPORT_PREFIX: &str = "VIM_MASTER_PROGRESS_";
pub const FORMAT_VERSION: &str = "1.0";
pub const MAX_LEVEL: usize = 25;
/// Snapshots older than this (one year, in milliseconds) are refused.
pub const MAX_AGE_MS: u64 = 365 * 24 * 60 * 60 * 1000;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("empty import code")]
    Empty,

    #[error("invalid import code encoding")]
    Encoding(#[from] base64::DecodeError),

    #[error("invalid import code data: {0}")]
    Data(#[from] serde_json::Error),

    #[error("version mismatch, expected {expected}, got {found}")]
    VersionMismatch { expected: String, found: String },

    #[error("invalid level number {0}")]
    LevelOutOfRange(usize),

    #[error("progress data is too old")]
    TooOld,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub version: String,
    /// Milliseconds since the Unix epoch when the snapshot was taken.
    pub timestamp: u64,
    pub badges: Vec<String>,
    pub practiced_commands: Vec<String>,
    pub current_level: usize,
    #[serde(default)]
    pub challenge_mode: bool,
    #[serde(default)]
    pub challenge_points: u64,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn new(timestamp: u64) -> Self {
        Self {
            version: FORMAT_VERSION.to_owned(),
            timestamp,
            badges: Vec::new(),
            practiced_commands: Vec::new(),
            current_level: 0,
            challenge_mode: false,
            challenge_points: 0,
        }
    }

    /// Merge the command names a session practiced. The list stays sorted
    /// and free of duplicates.
    pub fn record_usage(&mut self, usage: &Usage) {
        let merged: BTreeSet<String> = self
            .practiced_commands
            .drain(..)
            .chain(usage.practiced.iter().cloned())
            .collect();
        self.practiced_commands = merged.into_iter().collect();
    }

    pub fn award_badge(&mut self, badge: &str) -> bool {
        if self.badges.iter().any(|b| b == badge) {
            return false;
        }
        self.badges.push(badge.to_owned());
        true
    }

    /// # Errors
    ///
    /// Serialization failure.
    pub fn export_code(&self) -> Result<String, ProgressError> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{EXPORT_PREFIX}{}", BASE64.encode(json)))
    }

    /// Decode and validate an export code taken at any time up to `now`
    /// (epoch milliseconds).
    ///
    /// # Errors
    ///
    /// Empty input, bad base64, JSON that is not a snapshot, a different
    /// format version, a level out of range, or a snapshot older than
    /// [`MAX_AGE_MS`].
    pub fn import_code(code: &str, now: u64) -> Result<Self, ProgressError> {
        let code = code.trim();
        let body = code.strip_prefix(EXPORT_PREFIX).unwrap_or(code);
        if body.is_empty() {
            return Err(ProgressError::Empty);
        }
        let json = BASE64.decode(body)?;
        let snapshot: Self = serde_json::from_slice(&json)?;
        snapshot.validate(now)?;
        debug!(
            level = snapshot.current_level,
            badges = snapshot.badges.len(),
            "progress imported"
        );
        Ok(snapshot)
    }

    fn validate(&self, now: u64) -> Result<(), ProgressError> {
        if self.version != FORMAT_VERSION {
            return Err(ProgressError::VersionMismatch {
                expected: FORMAT_VERSION.to_owned(),
                found: self.version.clone(),
            });
        }
        if self.current_level > MAX_LEVEL {
            return Err(ProgressError::LevelOutOfRange(self.current_level));
        }
        if now.saturating_sub(self.timestamp) > MAX_AGE_MS {
            return Err(ProgressError::TooOld);
        }
        Ok(())
    }

    /// One-line description for an import confirmation. Levels count from
    /// one here.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Level {}, {} badges, {} commands practiced, {} challenge points",
            self.current_level + 1,
            self.badges.len(),
            self.practiced_commands.len(),
            self.challenge_points
        )
    }
}
