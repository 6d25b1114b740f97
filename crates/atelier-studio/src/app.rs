// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command dispatch for the avatar studio.

use std::fmt::Write as _;
use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use atelier_app_core::toast::{ToastId, ToastKind};
use atelier_editor::avatar::{Avatar, AvatarField};
use atelier_editor::persist::PersistencePort;
use atelier_editor::{Clock, FieldKey, Outcome, Schema, Session, SnapshotId, SystemClock};

use crate::command::{Command, HELP};

/// What the driver should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this text.
    Text(String),
    /// Nothing to print; any failure was already queued as a toast.
    Silent,
    /// Leave the loop.
    Quit,
}

/// Avatar session plus the bookkeeping a terminal front end needs.
pub struct Studio<P, C: Clock = SystemClock> {
    session: Session<Avatar, P, C>,
    shown: ToastId,
}

impl<P, C> Studio<P, C>
where
    P: PersistencePort<Avatar>,
    C: Clock,
{
    /// Wraps a ready session.
    pub fn new(session: Session<Avatar, P, C>) -> Self {
        Self { session, shown: 0 }
    }

    /// The underlying session.
    pub fn session(&self) -> &Session<Avatar, P, C> {
        &self.session
    }

    /// Runs one command.
    pub fn execute(&mut self, command: Command, now: Instant) -> Result<Reply> {
        let reply = match command {
            Command::Set { field, value } => {
                match self.session.edit_parsed(&field, &value, now) {
                    Ok(outcome) => self.describe(outcome, &format!("{field} updated")),
                    Err(_) => Reply::Silent,
                }
            }
            Command::Bulk(pairs) => {
                let values = pairs
                    .iter()
                    .map(|(field, raw)| Avatar::parse(field, raw))
                    .collect::<Result<Vec<_>, _>>()
                    .context("bulk edit rejected")?;
                let outcome = self
                    .session
                    .editor_mut()
                    .edit_bulk(values)
                    .context("bulk edit rejected")?;
                self.describe(outcome, &format!("{} fields updated", pairs.len()))
            }
            Command::Undo => {
                let outcome = self.session.editor_mut().undo();
                self.describe(outcome, "undone")
            }
            Command::Redo => {
                let outcome = self.session.editor_mut().redo();
                self.describe(outcome, "redone")
            }
            Command::Reset { keep } => {
                let keep = keep
                    .iter()
                    .map(|name| {
                        AvatarField::from_name(name).ok_or_else(|| anyhow!("unknown field `{name}`"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                let outcome = self.session.editor_mut().reset(&keep);
                self.describe(outcome, "reset to defaults")
            }
            Command::Snap(name) => {
                let id = self.session.save_snapshot(name.as_deref());
                let label = self
                    .session
                    .editor()
                    .snapshots()
                    .get(&id)
                    .map_or_else(String::new, |s| s.name.clone());
                Reply::Text(format!("saved snapshot {} \"{label}\"", id.short()))
            }
            Command::Load(text) => {
                let id = self.lookup(&text)?;
                match self.session.load_snapshot(&id, now) {
                    Ok(outcome) => self.describe(outcome, &format!("loaded {}", id.short())),
                    Err(_) => Reply::Silent,
                }
            }
            Command::Drop(text) => {
                let id = self.lookup(&text)?;
                match self.session.delete_snapshot(&id, now) {
                    Ok(gone) => Reply::Text(format!("deleted \"{}\"", gone.name)),
                    Err(_) => Reply::Silent,
                }
            }
            Command::Snaps => Reply::Text(self.list_snapshots()),
            Command::Save => {
                let job = self.session.save_record();
                Reply::Text(format!("save queued (job {})", job.0))
            }
            Command::Show => Reply::Text(render_record(self.session.editor().record())),
            Command::Fields => Reply::Text(
                AvatarField::ALL
                    .iter()
                    .map(|f| f.name())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            Command::Help => Reply::Text(HELP.to_owned()),
            Command::Quit => Reply::Quit,
        };
        Ok(reply)
    }

    /// Pumps finished jobs and returns toast lines not printed before.
    pub fn tick(&mut self, now: Instant) -> Vec<String> {
        self.session.pump(now);
        self.fresh_toasts(now)
    }

    /// Toast lines not printed before.
    pub fn fresh_toasts(&mut self, now: Instant) -> Vec<String> {
        let mut lines = Vec::new();
        for toast in self.session.toasts(now) {
            if toast.id <= self.shown {
                continue;
            }
            self.shown = toast.id;
            let tag = match toast.kind {
                ToastKind::Info => "info",
                ToastKind::Success => "ok",
                ToastKind::Warn => "warn",
                ToastKind::Error => "error",
            };
            lines.push(match toast.body {
                Some(body) => format!("[{tag}] {}: {body}", toast.title),
                None => format!("[{tag}] {}", toast.title),
            });
        }
        lines
    }

    fn describe(&self, outcome: Outcome, applied: &str) -> Reply {
        let editor = self.session.editor();
        match outcome {
            Outcome::Applied => Reply::Text(format!(
                "{applied} (undo {} / redo {})",
                editor.history().undo_depth(),
                editor.history().redo_depth()
            )),
            Outcome::Ignored => Reply::Text("nothing changed".to_owned()),
        }
    }

    fn lookup(&self, text: &str) -> Result<SnapshotId> {
        if let Some(id) = self.session.editor().snapshots().resolve(text) {
            return Ok(id);
        }
        // A full id is passed through so an unknown one surfaces as not-found.
        match text.parse::<SnapshotId>() {
            Ok(id) => Ok(id),
            Err(_) => bail!("no snapshot matches `{text}`"),
        }
    }

    fn list_snapshots(&self) -> String {
        let snapshots = self.session.editor().snapshots();
        if snapshots.is_empty() {
            return "no snapshots".to_owned();
        }
        let mut out = String::new();
        for snap in snapshots.iter() {
            let thumb = snap.thumbnail.as_ref().map_or("-", |t| t.0.as_str());
            let _ = writeln!(out, "{}  {:<20} {thumb}", snap.id.short(), snap.name);
        }
        out.trim_end().to_owned()
    }
}

/// One `name = value` line per field, in schema order.
pub fn render_record<S: Schema>(record: &S) -> String {
    <S::Field as FieldKey>::ALL
        .iter()
        .map(|&field| {
            let shown = serde_json::to_value(record.get(field))
                .ok()
                .and_then(|mut tagged| tagged.get_mut("value").map(serde_json::Value::take))
                .map_or_else(
                    || "?".to_owned(),
                    |value| match value {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    },
                );
            format!("{:<13} = {shown}", field.name())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
