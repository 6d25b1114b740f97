// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory config store fake for testing without filesystem I/O.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use atelier_app_core::config::{ConfigError, ConfigStore};

/// In-memory implementation of [`ConfigStore`] for testing.
///
/// Clones share state, so a test can hand one handle to a service or worker
/// thread and inspect writes through another. Failures can be injected per
/// direction; injected failures still count as attempts.
///
/// # Example
///
/// ```
/// use atelier_dry_tests::InMemoryConfigStore;
/// use atelier_app_core::config::ConfigService;
///
/// let store = InMemoryConfigStore::new();
/// let service = ConfigService::new(store.clone());
///
/// service.save("prefs", &serde_json::json!({"limit": 10})).unwrap();
/// assert_eq!(store.saved_keys(), vec!["prefs".to_string()]);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    blobs: BTreeMap<String, Vec<u8>>,
    save_log: Vec<String>,
    loads: usize,
    load_failure: Option<String>,
    save_failure: Option<String>,
}

impl InMemoryConfigStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Seed a raw blob without counting it as a save.
    pub fn insert(&self, key: &str, data: impl Into<Vec<u8>>) {
        self.lock().blobs.insert(key.to_owned(), data.into());
    }

    /// Make every load fail with `reason` (`None` restores normal behaviour).
    pub fn fail_loads(&self, reason: Option<&str>) {
        self.lock().load_failure = reason.map(str::to_owned);
    }

    /// Make every save fail with `reason` (`None` restores normal behaviour).
    pub fn fail_saves(&self, reason: Option<&str>) {
        self.lock().save_failure = reason.map(str::to_owned);
    }

    /// Raw bytes stored under `key`.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().blobs.get(key).cloned()
    }

    /// Keys of every attempted save, in call order.
    pub fn saved_keys(&self) -> Vec<String> {
        self.lock().save_log.clone()
    }

    /// Number of attempted loads.
    pub fn load_count(&self) -> usize {
        self.lock().loads
    }

    /// Keys currently holding data.
    pub fn keys(&self) -> Vec<String> {
        self.lock().blobs.keys().cloned().collect()
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let mut inner = self.lock();
        inner.loads += 1;
        if let Some(reason) = &inner.load_failure {
            return Err(ConfigError::Other(reason.clone()));
        }
        inner.blobs.get(key).cloned().ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let mut inner = self.lock();
        inner.save_log.push(key.to_owned());
        if let Some(reason) = &inner.save_failure {
            return Err(ConfigError::Other(reason.clone()));
        }
        inner.blobs.insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}
