// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Typed prefs port shared by Atelier hosts.

use crate::config::{ConfigService, ConfigStore};
use crate::prefs::StudioPrefs;
use tracing::warn;

/// Key under which studio preferences are stored.
pub const STUDIO_PREFS_KEY: &str = "studio_prefs";

/// Config-facing port for loading/saving studio preferences.
pub trait ConfigPort {
    /// Load studio preferences (returns None if missing or unreadable).
    fn load_prefs(&self) -> Option<StudioPrefs>;
    /// Persist studio preferences (best-effort; failures are logged).
    fn save_prefs(&self, prefs: &StudioPrefs);
}

impl<S: ConfigStore> ConfigPort for ConfigService<S> {
    fn load_prefs(&self) -> Option<StudioPrefs> {
        match self.load(STUDIO_PREFS_KEY) {
            Ok(prefs) => prefs,
            Err(err) => {
                warn!(%err, "studio prefs unreadable; using defaults");
                None
            }
        }
    }

    fn save_prefs(&self, prefs: &StudioPrefs) {
        if let Err(err) = self.save(STUDIO_PREFS_KEY, prefs) {
            warn!(%err, "failed to persist studio prefs");
        }
    }
}
