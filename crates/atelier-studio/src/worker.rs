// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Channel-backed persistence: jobs run on a background thread and report
//! back through a completion channel that the UI loop drains.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use atelier_app_core::config::{ConfigService, ConfigStore};
use atelier_editor::persist::{
    Completion, Job, JobId, JobOutput, PersistenceError, PersistencePort,
};
use atelier_editor::{RecordId, Schema, SnapshotId, ThumbnailRef};
use serde::Serialize;
use tracing::{debug, warn};

/// Config key holding a saved record.
pub fn record_key(id: &RecordId) -> String {
    format!("avatar-{id}")
}

#[derive(Serialize)]
struct ThumbnailCard<'a, S> {
    record: String,
    snapshot: String,
    value: &'a S,
}

/// [`PersistencePort`] that hands jobs to a worker thread.
///
/// Dropping the port closes the job channel, which ends the worker once its
/// queue is empty.
pub struct ChannelPersistence<S> {
    jobs: Sender<(JobId, Job<S>)>,
    done: Receiver<Completion>,
}

impl<S> ChannelPersistence<S>
where
    S: Schema + Send + 'static,
{
    /// Starts the worker thread over `config`.
    pub fn spawn<C>(config: ConfigService<C>) -> Self
    where
        C: ConfigStore + Send + 'static,
    {
        let (job_tx, job_rx) = mpsc::channel::<(JobId, Job<S>)>();
        let (done_tx, done_rx) = mpsc::channel();
        thread::spawn(move || {
            for (job, work) in job_rx {
                let result = run(&config, work);
                if done_tx.send(Completion { job, result }).is_err() {
                    break;
                }
            }
            debug!("persistence worker stopped");
        });
        Self {
            jobs: job_tx,
            done: done_rx,
        }
    }
}

fn run<S, C>(config: &ConfigService<C>, job: Job<S>) -> Result<JobOutput, PersistenceError>
where
    S: Schema,
    C: ConfigStore,
{
    match job {
        Job::SaveRecord { record, value } => {
            config
                .save(&record_key(&record), &value)
                .map_err(|e| PersistenceError(e.to_string()))?;
            Ok(JobOutput::Saved)
        }
        Job::CaptureThumbnail {
            record,
            snapshot,
            value,
        } => capture(config, &record, &snapshot, &value).map(JobOutput::Thumbnail),
    }
}

/// Stores a text card for the snapshot under a content-addressed key.
fn capture<S, C>(
    config: &ConfigService<C>,
    record: &RecordId,
    snapshot: &SnapshotId,
    value: &S,
) -> Result<ThumbnailRef, PersistenceError>
where
    S: Schema,
    C: ConfigStore,
{
    let card = ThumbnailCard {
        record: record.to_string(),
        snapshot: snapshot.to_string(),
        value,
    };
    let bytes = serde_json::to_vec(&card).map_err(|e| PersistenceError(e.to_string()))?;
    let key = format!("thumb-{}", blake3::hash(&bytes).to_hex());
    config
        .save(&key, &card)
        .map_err(|e| PersistenceError(e.to_string()))?;
    Ok(ThumbnailRef(key))
}

impl<S> PersistencePort<S> for ChannelPersistence<S> {
    fn submit(&mut self, id: JobId, job: Job<S>) {
        if self.jobs.send((id, job)).is_err() {
            warn!(job = id.0, "persistence worker gone; job dropped");
        }
    }

    fn drain_completions(&mut self, max: usize) -> Vec<Completion> {
        let mut out = Vec::new();
        for _ in 0..max {
            match self.done.try_recv() {
                Ok(c) => out.push(c),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use atelier_dry_tests::{InMemoryConfigStore, Swatch};
    use atelier_editor::{make_record_id, make_snapshot_id};
    use std::time::{Duration, Instant};

    fn wait_for(port: &mut ChannelPersistence<Swatch>, n: usize) -> Vec<Completion> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut out = Vec::new();
        while out.len() < n && Instant::now() < deadline {
            out.extend(port.drain_completions(n - out.len()));
            thread::sleep(Duration::from_millis(5));
        }
        out
    }

    #[test]
    fn saves_record_under_owner_key() {
        let store = InMemoryConfigStore::new();
        let mut port = ChannelPersistence::spawn(ConfigService::new(store.clone()));
        let record = make_record_id("worker");
        port.submit(
            JobId(1),
            Job::SaveRecord {
                record,
                value: Swatch::new("red", 3),
            },
        );
        let done = wait_for(&mut port, 1);
        assert_eq!(done[0].result, Ok(JobOutput::Saved));
        let saved: Swatch = serde_json::from_slice(&store.get(&record_key(&record)).unwrap()).unwrap();
        assert_eq!(saved, Swatch::new("red", 3));
    }

    #[test]
    fn thumbnail_ref_is_content_addressed() {
        let store = InMemoryConfigStore::new();
        let mut port = ChannelPersistence::spawn(ConfigService::new(store.clone()));
        let record = make_record_id("worker");
        let job = |n| Job::CaptureThumbnail {
            record,
            snapshot: make_snapshot_id(&record, 1),
            value: Swatch::new("blue", n),
        };
        port.submit(JobId(1), job(1));
        port.submit(JobId(2), job(1));
        port.submit(JobId(3), job(2));
        let done = wait_for(&mut port, 3);
        let refs: Vec<_> = done
            .into_iter()
            .map(|c| match c.result {
                Ok(JobOutput::Thumbnail(t)) => t,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(refs[0], refs[1]);
        assert_ne!(refs[0], refs[2]);
        assert!(refs[0].0.starts_with("thumb-"));
        assert!(store.get(&refs[2].0).is_some());
    }

    #[test]
    fn store_failure_is_reported() {
        let store = InMemoryConfigStore::new();
        store.fail_saves(Some("read-only volume"));
        let mut port = ChannelPersistence::spawn(ConfigService::new(store));
        port.submit(
            JobId(7),
            Job::SaveRecord {
                record: make_record_id("worker"),
                value: Swatch::default(),
            },
        );
        let done = wait_for(&mut port, 1);
        assert_eq!(done[0].job, JobId(7));
        let err = done[0].result.clone().unwrap_err();
        assert!(err.0.contains("read-only volume"));
    }
}
