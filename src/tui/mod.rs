// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI shell (ratatui + crossterm).
//!
//! One blocking input read per loop iteration; all mutation happens on this
//! thread. The session decides scroll-vs-repaint plans, but ratatui's frame
//! diffing already repaints only changed cells, so the plan needs no extra
//! handling here.

use std::error::Error;
use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::Paragraph,
    Frame, Terminal,
};

use crate::keys::{token_for_key, Action, KeyBindings};
use crate::session::Session;

const TOAST_TTL: Duration = Duration::from_secs(4);

/// Runs the interactive reader until the session quits.
pub fn run(session: Session, bindings: KeyBindings) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(session, bindings);

    while !app.session.should_quit() {
        terminal.draw(|frame| draw(frame, &mut app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
            _ => {}
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptKind {
    GotoNode,
    Search,
    IndexSearch,
}

impl PromptKind {
    fn label(self) -> &'static str {
        match self {
            Self::GotoNode => "Goto node: ",
            Self::Search => "Search: ",
            Self::IndexSearch => "Index entry: ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Prompt {
    Inactive,
    Editing { kind: PromptKind, buffer: String },
}

struct Toast {
    message: String,
    expires_at: Instant,
}

/// How one more token changes the pending chord.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ChordOutcome {
    Action(Action),
    Pending(String),
    Discarded,
}

/// First-hit-wins chord resolution: a full match fires, a strict prefix
/// waits for more input, and a dead chord falls back to the bare token
/// before giving up.
fn resolve_chord(bindings: &KeyBindings, pending: &str, token: &str) -> ChordOutcome {
    let chord = format!("{pending}{token}");
    if let Some(action) = bindings.lookup(&chord) {
        return ChordOutcome::Action(action);
    }
    if bindings.is_prefix(&chord) {
        return ChordOutcome::Pending(chord);
    }
    if !pending.is_empty() {
        if let Some(action) = bindings.lookup(token) {
            return ChordOutcome::Action(action);
        }
        if bindings.is_prefix(token) {
            return ChordOutcome::Pending(token.to_owned());
        }
    }
    ChordOutcome::Discarded
}

struct App {
    session: Session,
    bindings: KeyBindings,
    pending_chord: String,
    prompt: Prompt,
    toast: Option<Toast>,
}

impl App {
    fn new(session: Session, bindings: KeyBindings) -> Self {
        Self {
            session,
            bindings,
            pending_chord: String::new(),
            prompt: Prompt::Inactive,
            toast: None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if matches!(self.prompt, Prompt::Editing { .. }) {
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            match key.code {
                KeyCode::Esc => self.prompt = Prompt::Inactive,
                KeyCode::Char('g') if ctrl => self.prompt = Prompt::Inactive,
                KeyCode::Enter => {
                    let submitted = std::mem::replace(&mut self.prompt, Prompt::Inactive);
                    if let Prompt::Editing { kind, buffer } = submitted {
                        self.submit_prompt(kind, &buffer);
                    }
                }
                KeyCode::Backspace => {
                    if let Prompt::Editing { buffer, .. } = &mut self.prompt {
                        buffer.pop();
                    }
                }
                KeyCode::Char(c) if !ctrl => {
                    if let Prompt::Editing { buffer, .. } = &mut self.prompt {
                        buffer.push(c);
                    }
                }
                _ => {}
            }
            return;
        }

        let Some(token) = token_for_key(&key) else {
            return;
        };
        match resolve_chord(&self.bindings, &self.pending_chord, &token) {
            ChordOutcome::Action(action) => {
                self.pending_chord.clear();
                self.apply(action);
            }
            ChordOutcome::Pending(chord) => self.pending_chord = chord,
            ChordOutcome::Discarded => self.pending_chord.clear(),
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::GotoNode => self.open_prompt(PromptKind::GotoNode),
            Action::Search => self.open_prompt(PromptKind::Search),
            Action::IndexSearch => self.open_prompt(PromptKind::IndexSearch),
            Action::AbortKey => {
                self.prompt = Prompt::Inactive;
                self.toast = None;
                self.pending_chord.clear();
            }
            _ => {
                self.session.dispatch(action);
                self.collect_echo();
            }
        }
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        self.prompt = Prompt::Editing {
            kind,
            buffer: String::new(),
        };
    }

    fn submit_prompt(&mut self, kind: PromptKind, input: &str) {
        match kind {
            PromptKind::GotoNode => self.session.goto_node(input),
            PromptKind::Search => self.session.search(input),
            PromptKind::IndexSearch => self.session.index_search(input),
        };
        self.collect_echo();
    }

    fn collect_echo(&mut self) {
        if let Some(message) = self.session.take_echo() {
            self.toast = Some(Toast {
                message,
                expires_at: Instant::now() + TOAST_TTL,
            });
        }
    }

    fn live_toast(&mut self) -> Option<&str> {
        if let Some(toast) = &self.toast {
            if toast.expires_at <= Instant::now() {
                self.toast = None;
            }
        }
        self.toast.as_ref().map(|toast| toast.message.as_str())
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);
    let content_area = layout[0];
    let status_area = layout[1];
    let echo_area = layout[2];

    app.session
        .resize(content_area.height as usize, content_area.width as usize);

    let window = app.session.active_window();
    let page_top = window.page_top();
    let text = Text::from(
        window
            .contents()
            .lines()
            .map(|line| Line::from(sanitize_line(line)))
            .collect::<Vec<_>>(),
    );
    let content = Paragraph::new(text).scroll((page_top as u16, 0));
    frame.render_widget(content, content_area);

    let status = Paragraph::new(app.session.active_window().status_line())
        .style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_widget(status, status_area);

    let echo_text = match &app.prompt {
        Prompt::Editing { kind, buffer } => format!("{}{buffer}", kind.label()),
        Prompt::Inactive => app.live_toast().unwrap_or("").to_owned(),
    };
    frame.render_widget(Paragraph::new(echo_text.clone()), echo_area);

    match &app.prompt {
        Prompt::Editing { .. } => {
            frame.set_cursor(
                echo_area.x + echo_text.len().min(u16::MAX as usize) as u16,
                echo_area.y,
            );
        }
        Prompt::Inactive => {
            if let Some((row, column)) = app.session.active_window_mut().cursor_position() {
                let x = content_area.x + column.min(content_area.width.saturating_sub(1) as usize) as u16;
                let y = content_area.y + row.min(content_area.height.saturating_sub(1) as usize) as u16;
                frame.set_cursor(x, y);
            }
        }
    }
}

/// Control bytes in node text (separators, index cookies, reference padding)
/// render as spaces instead of leaking into the terminal stream.
fn sanitize_line(line: &str) -> String {
    line.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

#[cfg(test)]
mod tests {
    use super::{resolve_chord, sanitize_line, ChordOutcome, PromptKind};
    use crate::keys::{Action, KeyBindings};

    #[test]
    fn sanitizes_control_bytes_for_display() {
        assert_eq!(sanitize_line("\u{1F}\u{C}"), "  ");
        assert_eq!(sanitize_line("plain text"), "plain text");
        assert_eq!(sanitize_line("pad\u{7F}ded"), "pad ded");
    }

    #[test]
    fn chords_fire_wait_or_discard() {
        let bindings = KeyBindings::standard();
        assert_eq!(
            resolve_chord(&bindings, "", "n"),
            ChordOutcome::Action(Action::NextNode)
        );
        assert_eq!(resolve_chord(&bindings, "", "^x"), ChordOutcome::Pending("^x".to_owned()));
        assert_eq!(
            resolve_chord(&bindings, "^x", "n"),
            ChordOutcome::Action(Action::SearchNext)
        );
        assert_eq!(resolve_chord(&bindings, "", "Z"), ChordOutcome::Pending("Z".to_owned()));
        assert_eq!(
            resolve_chord(&bindings, "Z", "Z"),
            ChordOutcome::Action(Action::Quit)
        );
        // A dead chord falls back to the bare token.
        assert_eq!(
            resolve_chord(&bindings, "Z", "q"),
            ChordOutcome::Action(Action::Quit)
        );
        assert_eq!(resolve_chord(&bindings, "Z", "#"), ChordOutcome::Discarded);
    }

    #[test]
    fn prompt_labels_name_their_action() {
        assert_eq!(PromptKind::GotoNode.label(), "Goto node: ");
        assert_eq!(PromptKind::Search.label(), "Search: ");
        assert_eq!(PromptKind::IndexSearch.label(), "Index entry: ");
    }
}
