// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Session controller: window list, history, and action dispatch.
//!
//! Navigation deliberately distinguishes the two node orders: `next-node`,
//! `prev-node`, and `up-node` follow the header-declared links (author
//! intent), while `global-next-node`, `global-prev-node`, `first-node`, and
//! `last-node` follow tag-table order.

use std::fmt;

use crate::keys::Action;
use crate::model::Node;
use crate::store::{DocumentCache, LocateError};

mod window;


pub use window::{Redraw, Window, WindowState};

/// A node requested at startup: document name plus optional node name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialRef {
    pub filename: String,
    pub nodename: Option<String>,
}

/// The set of windows over one document cache, driven by abstract actions.
#[derive(Debug)]
pub struct Session {
    cache: DocumentCache,
    windows: Vec<Window>,
    active: usize,
    echo: Option<String>,
    last_search: Option<String>,
    should_quit: bool,
}

impl Session {
    /// Opens one window per initial reference. A reference without a node
    /// name lands on `Top` when present, else the document's first node.
    pub fn open(
        mut cache: DocumentCache,
        initial: &[InitialRef],
        height: usize,
        width: usize,
    ) -> Result<Self, SessionError> {
        let mut windows = Vec::new();
        for reference in initial {
            let (document, _) = cache
                .document(&reference.filename)
                .map_err(SessionError::Load)?;
            let node = match &reference.nodename {
                Some(name) => document.node(name).ok_or_else(|| SessionError::NodeNotFound {
                    filename: reference.filename.clone(),
                    nodename: name.clone(),
                })?,
                None => document
                    .node("Top")
                    .or_else(|| document.first())
                    .ok_or_else(|| SessionError::EmptyDocument {
                        filename: reference.filename.clone(),
                    })?,
            };
            windows.push(Window::new(node, height, width));
        }
        if windows.is_empty() {
            return Err(SessionError::NothingToShow);
        }
        Ok(Self {
            cache,
            windows,
            active: 0,
            echo: None,
            last_search: None,
            should_quit: false,
        })
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_window(&self) -> &Window {
        &self.windows[self.active]
    }

    pub fn active_window_mut(&mut self) -> &mut Window {
        &mut self.windows[self.active]
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Message for the echo area, produced by the last dispatch (if any).
    pub fn take_echo(&mut self) -> Option<String> {
        self.echo.take()
    }

    pub fn resize(&mut self, height: usize, width: usize) {
        for window in &mut self.windows {
            window.resize(height, width);
        }
    }

    /// Applies one action to the session.
    ///
    /// Navigation failures surface as echo-area messages and leave the
    /// session untouched; they never escape as errors. Action identifiers
    /// that fail to parse never reach this point (the binding layer drops
    /// them), which is where "unknown action is a silent no-op" lives.
    pub fn dispatch(&mut self, action: Action) -> Redraw {
        self.echo = None;
        match action {
            Action::FirstNode => self.goto_positional(|doc| doc.first()),
            Action::LastNode => self.goto_positional(|doc| doc.last()),
            Action::GlobalNextNode => self.goto_sequential(1),
            Action::GlobalPrevNode => self.goto_sequential(-1),
            Action::NextNode => self.goto_link(Node::next, "Next"),
            Action::PrevNode => self.goto_link(Node::prev, "Prev"),
            Action::UpNode => self.goto_link(Node::up, "Up"),
            Action::TopNode => {
                let filename = self.active_window().filename().to_owned();
                self.select_node(&filename, "Top", true)
            }
            Action::HistoryNode => self.goto_history(),
            Action::BeginningOfNode => {
                let window = self.active_window_mut();
                window.clear_goal_column();
                window.beginning_of_node()
            }
            Action::EndOfNode => {
                let window = self.active_window_mut();
                window.clear_goal_column();
                window.end_of_node()
            }
            Action::NextLine => self.vertical_move(Window::point_next_line),
            Action::PrevLine => self.vertical_move(Window::point_prev_line),
            Action::BeginningOfLine => self.cursor_move(Window::point_beginning_of_line),
            Action::EndOfLine => self.cursor_move(Window::point_end_of_line),
            Action::ForwardChar => self.cursor_move(Window::point_forward_char),
            Action::BackwardChar => self.cursor_move(Window::point_backward_char),
            Action::ScrollForward => self.scroll_lines_or_hop(true),
            Action::ScrollBackward => self.scroll_lines_or_hop(false),
            Action::ScrollForwardPageOnly => self.scroll_lines(|height| height as isize),
            Action::ScrollBackwardPageOnly => self.scroll_lines(|height| -(height as isize)),
            Action::DownLine => self.scroll_lines(|_| 1),
            Action::UpLine => self.scroll_lines(|_| -1),
            Action::ScrollHalfScreenDown => self.scroll_lines(|height| (height / 2) as isize),
            Action::ScrollHalfScreenUp => self.scroll_lines(|height| -((height / 2) as isize)),
            Action::SelectReferenceThisLine => self.select_reference_this_line(),
            Action::MoveToNextXref => self.move_to_xref(true),
            Action::MoveToPrevXref => self.move_to_xref(false),
            Action::SearchNext => self.search_next(),
            Action::NextWindow => self.cycle_window(1),
            Action::PrevWindow => self.cycle_window(-1),
            Action::Quit => {
                self.should_quit = true;
                Redraw::None
            }
            Action::AbortKey => Redraw::None,
            // Prompt-driven actions are routed by the UI (goto_node/search/
            // index_search below) once the argument has been read.
            Action::GotoNode | Action::Search | Action::IndexSearch => Redraw::None,
        }
    }

    /// Visits a node named by the user, either `nodename` in the current
    /// document or the `(file)node` long form.
    pub fn goto_node(&mut self, spec: &str) -> Redraw {
        self.echo = None;
        let spec = spec.trim();
        if spec.is_empty() {
            return Redraw::None;
        }
        let (filename, nodename) = match parse_node_spec(spec) {
            Some((file, node)) => {
                let node = if node.is_empty() { "Top" } else { node };
                (file.to_owned(), node.to_owned())
            }
            None => (self.active_window().filename().to_owned(), spec.to_owned()),
        };
        self.select_node(&filename, &nodename, true)
    }

    /// Literal search from point, wrapping within the node.
    pub fn search(&mut self, query: &str) -> Redraw {
        self.echo = None;
        if query.is_empty() {
            return Redraw::None;
        }
        self.last_search = Some(query.to_owned());
        let found = {
            let window = &self.windows[self.active];
            let contents = window.contents();
            let point = window.point();
            let after_point = point
                + contents[point..]
                    .chars()
                    .next()
                    .map(char::len_utf8)
                    .unwrap_or(0);
            contents[after_point..]
                .find(query)
                .map(|at| after_point + at)
                // Wrap: restart from the top, which may land on the match
                // point already sits on.
                .or_else(|| contents.find(query))
        };

        match found {
            Some(at) => {
                let window = &mut self.windows[self.active];
                window.clear_goal_column();
                window.set_point(at);
                window.show_point()
            }
            None => {
                self.echo = Some(format!("Search failed: \"{query}\""));
                Redraw::None
            }
        }
    }

    pub fn search_next(&mut self) -> Redraw {
        match self.last_search.clone() {
            Some(query) => self.search(&query),
            None => {
                self.echo = Some("No previous search".to_owned());
                Redraw::None
            }
        }
    }

    /// Jumps to the best-matching index entry of the current document.
    ///
    /// Entries from every node's index blocks compete on a fuzzy score; the
    /// winner's target node is visited and point lands on the entry's line.
    pub fn index_search(&mut self, query: &str) -> Redraw {
        self.echo = None;
        let query = query.trim();
        if query.is_empty() {
            return Redraw::None;
        }

        let filename = self.active_window().filename().to_owned();
        let Some(document) = self.cache.cached(&filename) else {
            self.echo = Some("No index entries available".to_owned());
            return Redraw::None;
        };

        let mut best: Option<(f64, String, String, Option<u32>)> = None;
        for node in document.nodes() {
            for reference in node.references() {
                let Some(label) = reference.label() else {
                    continue;
                };
                let score = index_match_score(query, label);
                if best.as_ref().map(|(top, ..)| score > *top).unwrap_or(true) {
                    best = Some((
                        score,
                        reference.filename().to_owned(),
                        reference.nodename().to_owned(),
                        reference.line_number(),
                    ));
                }
            }
        }

        match best {
            Some((score, ref_file, ref_node, line)) if score >= MIN_INDEX_SCORE => {
                let plan = self.select_node(&ref_file, &ref_node, true);
                if let Some(line) = line {
                    let window = &mut self.windows[self.active];
                    window.set_point(window.line_start(line as usize));
                    window.show_point();
                }
                plan
            }
            _ => {
                self.echo = Some(format!("No index entries matching \"{query}\""));
                Redraw::None
            }
        }
    }

    fn goto_positional(&mut self, pick: impl Fn(&crate::model::Document) -> Option<&Node>) -> Redraw {
        let filename = self.active_window().filename().to_owned();
        let target = self
            .cache
            .cached(&filename)
            .and_then(|doc| pick(doc).map(|node| node.name().to_owned()));
        match target {
            Some(nodename) => self.select_node(&filename, &nodename, true),
            None => Redraw::None,
        }
    }

    fn goto_sequential(&mut self, direction: i64) -> Redraw {
        let window = self.active_window();
        let filename = window.filename().to_owned();
        let nodename = window.nodename().to_owned();
        let target = match self.cache.cached(&filename) {
            Some(document) => {
                let moved = if direction >= 0 {
                    document.after(&nodename, direction as usize)
                } else {
                    document.before(&nodename, (-direction) as usize)
                };
                moved.map(|node| node.name().to_owned())
            }
            None => return Redraw::None,
        };
        match target {
            Ok(name) => self.select_node(&filename, &name, true),
            Err(error) => {
                self.echo = Some(error.to_string());
                Redraw::None
            }
        }
    }

    fn goto_link(&mut self, link: impl Fn(&Node) -> Option<&str>, label: &str) -> Redraw {
        let target = self
            .current_node()
            .and_then(|node| link(node).map(str::to_owned));
        match target {
            Some(nodename) => {
                let filename = self.active_window().filename().to_owned();
                self.select_node(&filename, &nodename, true)
            }
            None => {
                self.echo = Some(format!("Node has no {label}"));
                Redraw::None
            }
        }
    }

    fn goto_history(&mut self) -> Redraw {
        let Some(state) = self.windows[self.active].pop_history() else {
            self.echo = Some("No earlier node in history".to_owned());
            return Redraw::None;
        };
        let plan = self.select_node(&state.filename, &state.nodename, false);
        if self.echo.is_none() {
            self.windows[self.active].restore(&state);
        }
        plan
    }

    fn vertical_move(&mut self, step: impl Fn(&mut Window) -> bool) -> Redraw {
        let window = &mut self.windows[self.active];
        window.seed_goal_column();
        if !step(&mut *window) {
            return Redraw::None;
        }
        window.move_to_goal();
        window.show_point()
    }

    fn cursor_move(&mut self, motion: impl Fn(&mut Window)) -> Redraw {
        let window = &mut self.windows[self.active];
        window.clear_goal_column();
        motion(&mut *window);
        window.show_point()
    }

    fn scroll_lines(&mut self, delta: impl Fn(usize) -> isize) -> Redraw {
        let window = &mut self.windows[self.active];
        window.clear_goal_column();
        let desired = window.page_top() as isize + delta(window.height());
        window.set_page_top(desired)
    }

    /// Space/DEL scrolling: inside the node it pages; at the node's edge it
    /// hops to the neighbouring node in tag-table order (the page-only
    /// variants never hop).
    fn scroll_lines_or_hop(&mut self, forward: bool) -> Redraw {
        let window = &self.windows[self.active];
        let height = window.height();
        let at_edge = if forward {
            window.page_top() + height >= window.line_count()
        } else {
            window.page_top() == 0
        };

        if !at_edge {
            return self.scroll_lines(|h| if forward { h as isize } else { -(h as isize) });
        }

        let plan = self.goto_sequential(if forward { 1 } else { -1 });
        if !forward && self.echo.is_none() {
            // Arriving from below: show the end of the previous node.
            let window = &mut self.windows[self.active];
            window.end_of_node();
        }
        plan
    }

    fn select_reference_this_line(&mut self) -> Redraw {
        let target = {
            let window = &self.windows[self.active];
            let line = window.line_of_point();
            self.current_node().and_then(|node| {
                node.references()
                    .iter()
                    .find(|reference| window.line_of(reference.span().0) == line)
                    .map(|reference| {
                        (reference.filename().to_owned(), reference.nodename().to_owned())
                    })
            })
        };
        match target {
            Some((filename, nodename)) => self.select_node(&filename, &nodename, true),
            None => {
                self.echo = Some("No cross reference on this line".to_owned());
                Redraw::None
            }
        }
    }

    fn move_to_xref(&mut self, forward: bool) -> Redraw {
        let point = self.windows[self.active].point();
        let target = self.current_node().and_then(|node| {
            let mut spans = node.references().iter().map(|reference| reference.span().0);
            if forward {
                spans.find(|&start| start > point)
            } else {
                spans.filter(|&start| start < point).last()
            }
        });
        match target {
            Some(start) => {
                let window = &mut self.windows[self.active];
                window.clear_goal_column();
                window.set_point(start);
                window.show_point()
            }
            None => {
                self.echo = Some("No more cross references in this node".to_owned());
                Redraw::None
            }
        }
    }

    fn cycle_window(&mut self, direction: isize) -> Redraw {
        let count = self.windows.len() as isize;
        self.active = (self.active as isize + direction).rem_euclid(count) as usize;
        Redraw::Full
    }

    fn current_node(&self) -> Option<&Node> {
        let window = &self.windows[self.active];
        self.cache.cached(window.filename())?.node(window.nodename())
    }

    /// Loads (or reuses) `filename` and points the active window at
    /// `nodename`. A reload triggered by stale metadata revalidates every
    /// window showing that document.
    fn select_node(&mut self, filename: &str, nodename: &str, record_history: bool) -> Redraw {
        let replaced = {
            let (document, replaced) = match self.cache.document(filename) {
                Ok(loaded) => loaded,
                Err(error) => {
                    self.echo = Some(error.to_string());
                    return Redraw::None;
                }
            };
            let Some(node) = document.node(nodename) else {
                self.echo = Some(format!("Cannot find node \"{nodename}\""));
                return Redraw::None;
            };
            let window = &mut self.windows[self.active];
            if record_history {
                window.push_history();
            }
            window.set_node(node);
            replaced
        };
        if replaced {
            self.revalidate_windows(filename);
        }
        Redraw::Full
    }

    /// Re-attaches every window showing `filename` after a reload; a node
    /// name that vanished falls back to the document's first node.
    fn revalidate_windows(&mut self, filename: &str) {
        let Some(document) = self.cache.cached(filename) else {
            return;
        };
        let mut note = None;
        for window in &mut self.windows {
            if window.filename() != filename {
                continue;
            }
            match document.node(window.nodename()) {
                Some(node) => window.set_node(node),
                None => {
                    if let Some(first) = document.first() {
                        note = Some(format!(
                            "Node \"{}\" vanished on reload; showing \"{}\"",
                            window.nodename(),
                            first.name()
                        ));
                        window.set_node(first);
                    }
                }
            }
        }
        if note.is_some() {
            self.echo = note;
        }
    }
}

/// `(file)node` long form; returns `None` for plain node names.
fn parse_node_spec(spec: &str) -> Option<(&str, &str)> {
    let rest = spec.strip_prefix('(')?;
    let close = rest.find(')')?;
    Some((&rest[..close], rest[close + 1..].trim()))
}

const MIN_INDEX_SCORE: f64 = 40.0;

/// Fuzzy index-entry score: full-ratio similarity with a strong bonus for
/// containment, so exact substrings beat near-misses.
fn index_match_score(query: &str, label: &str) -> f64 {
    let ratio = rapidfuzz::fuzz::ratio(
        query.chars().flat_map(char::to_lowercase),
        label.chars().flat_map(char::to_lowercase),
    );
    let contains = label.to_lowercase().contains(&query.to_lowercase());
    if contains {
        ratio + 100.0
    } else {
        ratio
    }
}

#[derive(Debug)]
pub enum SessionError {
    Load(LocateError),
    NodeNotFound { filename: String, nodename: String },
    EmptyDocument { filename: String },
    NothingToShow,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(error) => error.fmt(f),
            Self::NodeNotFound { filename, nodename } => {
                write!(f, "cannot find node \"{nodename}\" in '{filename}'")
            }
            Self::EmptyDocument { filename } => {
                write!(f, "'{filename}' contains no nodes")
            }
            Self::NothingToShow => f.write_str("no documents requested"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(error) => Some(error),
            _ => None,
        }
    }
}
