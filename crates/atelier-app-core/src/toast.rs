// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bounded toast queue used to surface editor outcomes to the user.
//!
//! Time is always passed in by the caller, so the queue is deterministic under
//! test and never reads a global clock.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Informational note.
    Info,
    /// A background job finished successfully.
    Success,
    /// Degraded but usable state (e.g. thumbnail capture failed).
    Warn,
    /// Operation failed and the user should know.
    Error,
}

/// Identifier for a toast entry.
pub type ToastId = u64;

#[derive(Debug, Clone)]
struct Toast {
    id: ToastId,
    kind: ToastKind,
    title: String,
    body: Option<String>,
    ttl: Duration,
    created: Instant,
    first_pushed: Instant,
}

impl Toast {
    fn alive_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) < self.ttl
    }
}

/// Rendering-friendly view of a toast.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastRender {
    /// Stable identifier.
    pub id: ToastId,
    /// Severity.
    pub kind: ToastKind,
    /// Short title line.
    pub title: String,
    /// Optional body text.
    pub body: Option<String>,
    /// 1.0 -> just created, 0.0 -> expired.
    pub progress: f32,
}

/// In-memory toast queue with TTL, capacity and a dedupe window.
pub struct ToastService {
    queue: VecDeque<Toast>,
    max: usize,
    dedupe_window: Duration,
    next_id: ToastId,
}

impl ToastService {
    /// Create a queue holding at most `max` toasts (at least one).
    pub fn new(max: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            max: max.max(1),
            dedupe_window: Duration::from_millis(500),
            next_id: 1,
        }
    }

    /// Push a toast. An identical toast (kind/title/body) first pushed within
    /// the dedupe window is not duplicated: it moves to the back of the queue
    /// under a fresh id with its TTL restarted, so hosts tracking ids see it
    /// again. The window is measured from the first push, so a steady stream
    /// of repeats still produces a new entry once per window.
    pub fn push<T>(
        &mut self,
        kind: ToastKind,
        title: T,
        body: Option<String>,
        ttl: Duration,
        now: Instant,
    ) -> ToastId
    where
        T: Into<String>,
    {
        let title = title.into();
        let window = self.dedupe_window;

        let id = self.next_id;
        self.next_id += 1;

        let repeat = self.queue.iter().position(|t| {
            t.kind == kind
                && t.title == title
                && t.body == body
                && now.saturating_duration_since(t.first_pushed) <= window
        });
        if let Some(mut existing) = repeat.and_then(|at| self.queue.remove(at)) {
            existing.id = id;
            existing.created = now;
            existing.ttl = ttl;
            self.queue.push_back(existing);
            return id;
        }

        if self.queue.len() == self.max {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast {
            id,
            kind,
            title,
            body,
            ttl,
            created: now,
            first_pushed: now,
        });
        id
    }

    /// Remove a toast before it expires. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|t| t.id != id);
        self.queue.len() != before
    }

    /// Drop expired toasts (call once per host tick).
    pub fn retain_visible(&mut self, now: Instant) {
        self.queue.retain(|t| t.alive_at(now));
    }

    /// Number of queued toasts, expired or not.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Return render-ready toasts, oldest first.
    pub fn visible(&self, now: Instant) -> Vec<ToastRender> {
        self.queue
            .iter()
            .filter(|t| t.alive_at(now))
            .map(|t| ToastRender {
                id: t.id,
                kind: t.kind,
                title: t.title.clone(),
                body: t.body.clone(),
                progress: 1.0
                    - (now.saturating_duration_since(t.created).as_secs_f32()
                        / t.ttl.as_secs_f32()),
            })
            .collect()
    }
}
