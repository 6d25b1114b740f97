// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
use std::time::{Duration, Instant};

use atelier_app_core::prefs::StudioPrefs;
use atelier_app_core::toast::ToastKind;
use atelier_dry_tests::{ManualClock, RecordingPort};
use atelier_editor::avatar::{Avatar, AvatarValue};
use atelier_editor::persist::Job;
use atelier_editor::{make_record_id, Editor, Session};

type AvatarSession = Session<Avatar, RecordingPort<Avatar>, ManualClock>;

fn session(prefs: &StudioPrefs) -> AvatarSession {
    let editor = Editor::with_clock(
        make_record_id("session-test"),
        Avatar::default(),
        ManualClock::stepping(0, 1),
    );
    Session::new(editor, RecordingPort::new(), prefs)
}

#[test]
fn edits_continue_while_jobs_are_in_flight() {
    let now = Instant::now();
    let mut s = session(&StudioPrefs::default());
    let snap = s.save_snapshot(Some("First look"));
    s.save_record();
    s.editor_mut().edit_field(AvatarValue::Glasses(true)).unwrap();
    s.editor_mut().undo();
    s.editor_mut().redo();
    assert_eq!(s.pending_jobs(), 2);
    assert!(s.editor().record().glasses);

    s.port_mut().succeed_all();
    assert_eq!(s.pump(now), 2);
    assert_eq!(s.pending_jobs(), 0);

    let thumb = s.editor().snapshots().get(&snap).unwrap().thumbnail.clone();
    assert_eq!(thumb.unwrap().0, format!("thumb-{}", snap.short()));
    let toasts = s.toasts(now);
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Success);
}

#[test]
fn failures_degrade_without_rollback() {
    let now = Instant::now();
    let mut s = session(&StudioPrefs::default());
    s.editor_mut().edit_field(AvatarValue::Height(188)).unwrap();
    let snap = s.save_snapshot(None);
    s.save_record();
    let record = s.editor().record().clone();
    let depth = s.editor().history().undo_depth();

    s.port_mut().fail_next("renderer crashed");
    s.port_mut().fail_next("quota exceeded");
    s.pump(now);

    assert_eq!(s.editor().record(), &record);
    assert_eq!(s.editor().history().undo_depth(), depth);
    let kept = s.editor().snapshots().get(&snap).unwrap();
    assert!(kept.thumbnail.is_none());
    assert_eq!(kept.data.height, 188);

    let kinds: Vec<_> = s.toasts(now).iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![ToastKind::Warn, ToastKind::Error]);
}

#[test]
fn saved_record_is_the_value_at_submit_time() {
    let mut s = session(&StudioPrefs::default());
    s.editor_mut().edit_field(AvatarValue::DisplayName("Ada".into())).unwrap();
    s.save_record();
    s.editor_mut().edit_field(AvatarValue::DisplayName("Grace".into())).unwrap();

    let Job::SaveRecord { value, record } = &s.port().submitted()[0].1 else {
        unreachable!("first job is the record save");
    };
    assert_eq!(value.display_name, "Ada");
    assert_eq!(*record, s.editor().store().id());
}

#[test]
fn toasts_expire_after_ttl() {
    let now = Instant::now();
    let mut prefs = StudioPrefs::default();
    prefs.notifications.ttl_ms = 1_000;
    let mut s = session(&prefs);
    s.save_record();
    s.port_mut().succeed_all();
    s.pump(now);
    assert_eq!(s.toasts(now).len(), 1);

    s.pump(now + Duration::from_millis(1_500));
    assert!(s.toasts(now + Duration::from_millis(1_500)).is_empty());
}
