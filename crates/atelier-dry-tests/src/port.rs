// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persistence port that records jobs and completes them on demand.

use std::collections::VecDeque;

use atelier_editor::persist::{
    Completion, Job, JobId, JobOutput, PersistenceError, PersistencePort,
};
use atelier_editor::ThumbnailRef;

/// Test double for [`PersistencePort`].
///
/// Submitted jobs wait in a queue until the test resolves them with
/// [`succeed_next`](Self::succeed_next), [`fail_next`](Self::fail_next) or
/// [`succeed_all`](Self::succeed_all). Every submission is also kept in a log.
#[derive(Debug)]
pub struct RecordingPort<S> {
    log: Vec<(JobId, Job<S>)>,
    waiting: VecDeque<(JobId, Job<S>)>,
    done: VecDeque<Completion>,
}

impl<S> Default for RecordingPort<S> {
    fn default() -> Self {
        Self {
            log: Vec::new(),
            waiting: VecDeque::new(),
            done: VecDeque::new(),
        }
    }
}

impl<S: Clone> RecordingPort<S> {
    /// Empty port.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every job submitted so far, in order.
    pub fn submitted(&self) -> &[(JobId, Job<S>)] {
        &self.log
    }

    /// Jobs not yet resolved.
    pub fn waiting(&self) -> usize {
        self.waiting.len()
    }

    /// Completes the oldest waiting job successfully. Thumbnail jobs produce
    /// `thumb-<snapshot short id>`.
    pub fn succeed_next(&mut self) -> Option<JobId> {
        let (id, job) = self.waiting.pop_front()?;
        let output = match job {
            Job::SaveRecord { .. } => JobOutput::Saved,
            Job::CaptureThumbnail { snapshot, .. } => {
                JobOutput::Thumbnail(ThumbnailRef(format!("thumb-{}", snapshot.short())))
            }
        };
        self.done.push_back(Completion {
            job: id,
            result: Ok(output),
        });
        Some(id)
    }

    /// Fails the oldest waiting job with `reason`.
    pub fn fail_next(&mut self, reason: &str) -> Option<JobId> {
        let (id, _) = self.waiting.pop_front()?;
        self.done.push_back(Completion {
            job: id,
            result: Err(PersistenceError(reason.to_owned())),
        });
        Some(id)
    }

    /// Completes every waiting job successfully.
    pub fn succeed_all(&mut self) -> usize {
        let mut n = 0;
        while self.succeed_next().is_some() {
            n += 1;
        }
        n
    }
}

impl<S: Clone> PersistencePort<S> for RecordingPort<S> {
    fn submit(&mut self, id: JobId, job: Job<S>) {
        self.log.push((id, job.clone()));
        self.waiting.push_back((id, job));
    }

    fn drain_completions(&mut self, max: usize) -> Vec<Completion> {
        let n = max.min(self.done.len());
        self.done.drain(..n).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::swatch::Swatch;
    use atelier_editor::{make_record_id, make_snapshot_id};

    #[test]
    fn jobs_wait_until_resolved() {
        let record = make_record_id("port-test");
        let mut port = RecordingPort::<Swatch>::new();
        port.submit(
            JobId(1),
            Job::SaveRecord {
                record,
                value: Swatch::default(),
            },
        );
        port.submit(
            JobId(2),
            Job::CaptureThumbnail {
                record,
                snapshot: make_snapshot_id(&record, 1),
                value: Swatch::default(),
            },
        );
        assert!(port.drain_completions(8).is_empty());
        assert_eq!(port.waiting(), 2);

        assert_eq!(port.fail_next("nope"), Some(JobId(1)));
        assert_eq!(port.succeed_all(), 1);
        let done = port.drain_completions(1);
        assert_eq!(done.len(), 1);
        assert!(done[0].result.is_err());
        let done = port.drain_completions(8);
        assert!(matches!(
            done[0].result,
            Ok(JobOutput::Thumbnail(ref t)) if t.0.starts_with("thumb-")
        ));
        assert_eq!(port.submitted().len(), 2);
    }
}
