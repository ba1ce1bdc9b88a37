// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! End-to-end: write a manual to disk, resolve it along the search path,
//! parse it, and drive the session the way key bindings would.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use proteus::keys::Action;
use proteus::session::{InitialRef, Session};
use proteus::store::{DocumentCache, InfoPath};

const SEPARATOR: &str = "\u{1F}\n";

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = std::env::temp_dir();
        path.push(format!("proteus-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Three-node manual with a menu, a cross-reference, an index block, and a
/// literal tag table whose offsets are recorded during assembly.
fn write_manual(dir: &TempDir) -> PathBuf {
    let mut text = String::from("Guide for the integration suite.\n");
    let mut offsets = Vec::new();

    offsets.push(("Top", text.len()));
    text.push_str(SEPARATOR);
    text.push_str("File: guide.info,  Node: Top,  Next: Usage,  Up: (dir)\n");
    text.push_str("\nGuide\n*****\n\n* Menu:\n\n* Usage::\n* Index::\n\n\n");

    offsets.push(("Usage", text.len()));
    text.push_str(SEPARATOR);
    text.push_str("File: guide.info,  Node: Usage,  Next: Index,  Prev: Top,  Up: Top\n");
    text.push_str("\nRun the tool with no arguments.\n");
    text.push_str("See *note Top:: for the overview.\n");

    offsets.push(("Index", text.len()));
    text.push_str(SEPARATOR);
    text.push_str("File: guide.info,  Node: Index,  Prev: Usage,  Up: Top\n");
    text.push_str("\n\u{0}\u{8}[index\u{0}\u{8}]\n* Menu:\n\n");
    text.push_str("* usage basics:            Usage.     (line 3)\n");
    text.push('\n');

    text.push_str(SEPARATOR);
    text.push_str("Tag Table:\n");
    for (name, offset) in &offsets {
        let _ = writeln!(text, "Node: {name}\u{7F}{offset}");
    }
    text.push_str("End Tag Table\n");

    let path = dir.path().join("guide.info");
    std::fs::write(&path, text).unwrap();
    path
}

fn open_session(dir: &TempDir) -> Session {
    let cache = DocumentCache::new(InfoPath::with_dirs(vec![dir.path().to_path_buf()]));
    Session::open(
        cache,
        &[InitialRef { filename: "guide".to_owned(), nodename: None }],
        8,
        60,
    )
    .expect("session")
}

#[test]
fn resolves_parses_and_lands_on_top() {
    let dir = TempDir::new("e2e-open");
    write_manual(&dir);

    let session = open_session(&dir);
    let window = session.active_window();
    assert_eq!(window.nodename(), "Top");
    assert_eq!(window.page_top(), 0);
    assert_eq!(window.point(), 0);
    assert!(window.contents().contains("* Usage::"));
}

#[test]
fn menu_selection_and_history_round_trip() {
    let dir = TempDir::new("e2e-menu");
    write_manual(&dir);
    let mut session = open_session(&dir);

    let menu_at = session.active_window().contents().find("* Usage::").expect("menu entry");
    session.active_window_mut().set_point(menu_at);
    session.dispatch(Action::SelectReferenceThisLine);
    assert_eq!(session.active_window().nodename(), "Usage");

    session.dispatch(Action::HistoryNode);
    let window = session.active_window();
    assert_eq!(window.nodename(), "Top");
    assert_eq!(window.point(), menu_at, "history restores point");
}

#[test]
fn header_and_tag_order_navigation_agree_here() {
    let dir = TempDir::new("e2e-nav");
    write_manual(&dir);
    let mut session = open_session(&dir);

    session.dispatch(Action::NextNode);
    assert_eq!(session.active_window().nodename(), "Usage");
    session.dispatch(Action::GlobalNextNode);
    assert_eq!(session.active_window().nodename(), "Index");

    session.dispatch(Action::FirstNode);
    assert_eq!(session.active_window().nodename(), "Top");
    session.dispatch(Action::LastNode);
    assert_eq!(session.active_window().nodename(), "Index");
}

#[test]
fn index_search_crosses_into_the_target_node() {
    let dir = TempDir::new("e2e-index");
    write_manual(&dir);
    let mut session = open_session(&dir);

    session.index_search("usage");
    let window = session.active_window();
    assert_eq!(window.nodename(), "Usage");
    assert!(window.point() >= window.line_starts()[window.line_of_point()]);
}

#[test]
fn search_finds_text_in_the_current_node() {
    let dir = TempDir::new("e2e-search");
    write_manual(&dir);
    let mut session = open_session(&dir);

    session.goto_node("Usage");
    session.search("no arguments");
    let window = session.active_window();
    assert!(window.contents()[window.point()..].starts_with("no arguments"));
}
