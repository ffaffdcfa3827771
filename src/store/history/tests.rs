// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;

use rstest::{fixture, rstest};

use super::{new_session_id, session_title, HistoryFile, SessionHistory, MAX_SESSIONS, UNTITLED};
use crate::model::{Category, Document, EditSpan, Session, SessionId, SpanId};
use crate::store::test_support::TempDir;
use crate::store::{StoreError, WriteDurability};

struct HistoryTestCtx {
    tmp: TempDir,
}

impl HistoryTestCtx {
    fn file(&self) -> HistoryFile {
        HistoryFile::new(self.tmp.path().join("history.json"))
    }
}

#[fixture]
fn ctx() -> HistoryTestCtx {
    HistoryTestCtx {
        tmp: TempDir::new("history"),
    }
}

fn session(id: &str, text: &str) -> Session {
    Session::new(
        SessionId::new(id).expect("session id"),
        session_title(text),
        Document::new(text),
    )
}

#[rstest]
#[case("", UNTITLED)]
#[case(" \n\t ", UNTITLED)]
#[case("  Dear   professor,\n\nthanks ", "Dear professor, thanks")]
fn session_title_collapses_whitespace(#[case] text: &str, #[case] expected: &str) {
    assert_eq!(session_title(text), expected);
}

#[test]
fn session_title_cuts_after_sixty_four_characters() {
    let exact = "é".repeat(64);
    assert_eq!(session_title(&exact), exact);

    let long = "é".repeat(70);
    let title = session_title(&long);
    assert_eq!(title.chars().count(), 65);
    assert!(title.ends_with("é…"));
}

#[test]
fn new_session_ids_embed_the_timestamp() {
    assert_eq!(new_session_id(1_700_000_000_123).as_str(), "session-1700000000123");
}

#[test]
fn upsert_puts_the_newest_first_and_supersedes_same_id() {
    let mut history = SessionHistory::new();
    history.upsert(session("a", "first"));
    history.upsert(session("b", "second"));
    history.upsert(session("a", "first, reanalysed"));

    let ids = history
        .sessions()
        .iter()
        .map(|s| s.session_id().as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(history.latest().map(Session::title), Some("first, reanalysed"));
}

#[test]
fn upsert_evicts_the_oldest_beyond_the_cap() {
    let mut history = SessionHistory::new();
    for index in 0..MAX_SESSIONS {
        assert!(history.upsert(session(&format!("s{index}"), "text")).is_empty());
    }

    let evicted = history.upsert(session("newest", "text"));

    assert_eq!(history.len(), MAX_SESSIONS);
    assert_eq!(evicted.len(), 1);
    assert_eq!(evicted[0].session_id().as_str(), "s0");
    assert_eq!(
        history.latest().map(|s| s.session_id().as_str()),
        Some("newest")
    );
}

#[test]
fn replace_document_keeps_position_and_analysis_fields() {
    let mut history = SessionHistory::new();
    history.upsert(session("a", "alpha").with_score(Some(80)));
    history.upsert(session("b", "beta"));

    let id = SessionId::new("a").expect("session id");
    assert!(history.replace_document(&id, Document::new("ALPHA"), 42));
    assert!(!history.replace_document(
        &SessionId::new("missing").expect("session id"),
        Document::new("x"),
        42
    ));

    let stored = history.get(&id).expect("session a");
    assert_eq!(stored.document().text, "ALPHA");
    assert_eq!(stored.title(), "alpha");
    assert_eq!(stored.score(), Some(80));
    assert_eq!(stored.updated_at_ms(), 42);
    assert_eq!(history.sessions()[1].session_id(), &id);
}

#[test]
fn remove_returns_the_session() {
    let mut history = SessionHistory::new();
    history.upsert(session("a", "alpha"));
    let id = SessionId::new("a").expect("session id");
    assert!(history.remove(&id).is_some());
    assert!(history.remove(&id).is_none());
    assert!(history.is_empty());
}

#[rstest]
fn missing_file_loads_as_empty(ctx: HistoryTestCtx) {
    let history = ctx.file().load().expect("load");
    assert!(history.is_empty());
}

#[rstest]
#[case(WriteDurability::BestEffort)]
#[case(WriteDurability::Durable)]
fn save_then_load_restores_sessions(ctx: HistoryTestCtx, #[case] durability: WriteDurability) {
    let file = ctx.file().with_durability(durability);
    let span = EditSpan {
        id: SpanId::new("s-0").expect("span id"),
        start_index: 0,
        end_index: 5,
        category: Category::Other("tone".into()),
        original: "Hello".to_owned(),
        replacement: "Hi".to_owned(),
        title: Some("Shorter".to_owned()),
        description: None,
    };
    let mut history = SessionHistory::new();
    history.upsert(
        Session::new(
            SessionId::new("session-1").expect("session id"),
            "Hello there",
            Document::new("Hello there").with_spans(vec![span]),
        )
        .with_score(Some(64))
        .with_updated_at_ms(1_700_000_000_000),
    );

    file.save(&history).expect("save");
    let loaded = file.load().expect("load");

    assert_eq!(loaded, history);
}

#[rstest]
fn corrupt_file_reports_json_error_with_path(ctx: HistoryTestCtx) {
    let file = ctx.file();
    fs::write(file.path(), "{ not json").expect("write");

    let err = file.load().expect_err("corrupt");
    let StoreError::Json { path, .. } = err else {
        panic!("expected json error, got {err:?}");
    };
    assert_eq!(path, file.path());
}

#[rstest]
fn unknown_version_is_rejected(ctx: HistoryTestCtx) {
    let file = ctx.file();
    fs::write(file.path(), r#"{"version": 9, "sessions": []}"#).expect("write");

    assert!(matches!(
        file.load(),
        Err(StoreError::UnsupportedVersion { version: 9, .. })
    ));
}

#[rstest]
fn oversized_files_are_truncated_on_load(ctx: HistoryTestCtx) {
    let file = ctx.file();
    let sessions = (0..MAX_SESSIONS + 3)
        .map(|index| session(&format!("s{index}"), "text"))
        .collect::<Vec<_>>();
    let raw = serde_json::json!({ "version": 1, "sessions": sessions });
    fs::write(file.path(), raw.to_string()).expect("write");

    let loaded = file.load().expect("load");
    assert_eq!(loaded.len(), MAX_SESSIONS);
    assert_eq!(loaded.sessions()[0].session_id().as_str(), "s0");
}
