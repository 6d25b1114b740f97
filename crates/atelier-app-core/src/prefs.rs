// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted preferences for the avatar studio (history depth, toasts, snapshots).

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::Duration;

/// Saved preferences for a studio session.
///
/// Every section defaults independently so older prefs files missing a
/// section still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StudioPrefs {
    /// Undo history limits.
    pub history: HistoryPrefs,
    /// Toast queue behaviour.
    pub notifications: NotificationPrefs,
    /// Snapshot naming and capture.
    pub snapshots: SnapshotPrefs,
}

/// Undo/redo history settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryPrefs {
    /// Maximum number of undo steps kept; `0` means unlimited.
    pub limit: usize,
}

impl Default for HistoryPrefs {
    fn default() -> Self {
        Self { limit: 100 }
    }
}

impl HistoryPrefs {
    /// The configured limit, or `None` when unlimited.
    pub fn limit(&self) -> Option<NonZeroUsize> {
        NonZeroUsize::new(self.limit)
    }
}

/// Toast queue settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPrefs {
    /// Maximum toasts kept in the queue at once.
    pub max_visible: usize,
    /// Lifetime of a toast in milliseconds.
    pub ttl_ms: u64,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            max_visible: 8,
            ttl_ms: 4_000,
        }
    }
}

impl NotificationPrefs {
    /// Toast lifetime as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

/// Snapshot naming and thumbnail capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotPrefs {
    /// Prefix for auto-generated snapshot names (`"<prefix> <n>"`).
    pub name_prefix: String,
    /// Request a thumbnail capture whenever a snapshot is saved.
    pub capture_thumbnails: bool,
}

impl Default for SnapshotPrefs {
    fn default() -> Self {
        Self {
            name_prefix: "Look".to_owned(),
            capture_thumbnails: true,
        }
    }
}
