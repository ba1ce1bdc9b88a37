// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Action vocabulary and layered key bindings.
//!
//! Bindings resolve across prioritized tiers (hard-coded, user config,
//! built-in defaults) with first-hit-wins lookup. Multi-token chords
//! (`^xn`, `ZZ`) accumulate until they either resolve or stop matching any
//! binding prefix.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

/// Abstract command identifier dispatched by the session.
///
/// The vocabulary is extensible; identifiers the session has no handler for
/// are silent no-ops by design, tolerating partial binding tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    FirstNode,
    LastNode,
    BeginningOfNode,
    EndOfNode,
    NextLine,
    PrevLine,
    BeginningOfLine,
    EndOfLine,
    ForwardChar,
    BackwardChar,
    ScrollForward,
    ScrollBackward,
    ScrollForwardPageOnly,
    ScrollBackwardPageOnly,
    DownLine,
    UpLine,
    ScrollHalfScreenDown,
    ScrollHalfScreenUp,
    NextNode,
    PrevNode,
    GlobalNextNode,
    GlobalPrevNode,
    UpNode,
    TopNode,
    GotoNode,
    HistoryNode,
    IndexSearch,
    Search,
    SearchNext,
    SelectReferenceThisLine,
    MoveToNextXref,
    MoveToPrevXref,
    NextWindow,
    PrevWindow,
    Quit,
    AbortKey,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstNode => "first-node",
            Self::LastNode => "last-node",
            Self::BeginningOfNode => "beginning-of-node",
            Self::EndOfNode => "end-of-node",
            Self::NextLine => "next-line",
            Self::PrevLine => "prev-line",
            Self::BeginningOfLine => "beginning-of-line",
            Self::EndOfLine => "end-of-line",
            Self::ForwardChar => "forward-char",
            Self::BackwardChar => "backward-char",
            Self::ScrollForward => "scroll-forward",
            Self::ScrollBackward => "scroll-backward",
            Self::ScrollForwardPageOnly => "scroll-forward-page-only",
            Self::ScrollBackwardPageOnly => "scroll-backward-page-only",
            Self::DownLine => "down-line",
            Self::UpLine => "up-line",
            Self::ScrollHalfScreenDown => "scroll-half-screen-down",
            Self::ScrollHalfScreenUp => "scroll-half-screen-up",
            Self::NextNode => "next-node",
            Self::PrevNode => "prev-node",
            Self::GlobalNextNode => "global-next-node",
            Self::GlobalPrevNode => "global-prev-node",
            Self::UpNode => "up-node",
            Self::TopNode => "top-node",
            Self::GotoNode => "goto-node",
            Self::HistoryNode => "history-node",
            Self::IndexSearch => "index-search",
            Self::Search => "search",
            Self::SearchNext => "search-next",
            Self::SelectReferenceThisLine => "select-reference-this-line",
            Self::MoveToNextXref => "move-to-next-xref",
            Self::MoveToPrevXref => "move-to-prev-xref",
            Self::NextWindow => "next-window",
            Self::PrevWindow => "prev-window",
            Self::Quit => "quit",
            Self::AbortKey => "abort-key",
        }
    }

    const ALL: &'static [Action] = &[
        Self::FirstNode,
        Self::LastNode,
        Self::BeginningOfNode,
        Self::EndOfNode,
        Self::NextLine,
        Self::PrevLine,
        Self::BeginningOfLine,
        Self::EndOfLine,
        Self::ForwardChar,
        Self::BackwardChar,
        Self::ScrollForward,
        Self::ScrollBackward,
        Self::ScrollForwardPageOnly,
        Self::ScrollBackwardPageOnly,
        Self::DownLine,
        Self::UpLine,
        Self::ScrollHalfScreenDown,
        Self::ScrollHalfScreenUp,
        Self::NextNode,
        Self::PrevNode,
        Self::GlobalNextNode,
        Self::GlobalPrevNode,
        Self::UpNode,
        Self::TopNode,
        Self::GotoNode,
        Self::HistoryNode,
        Self::IndexSearch,
        Self::Search,
        Self::SearchNext,
        Self::SelectReferenceThisLine,
        Self::MoveToNextXref,
        Self::MoveToPrevXref,
        Self::NextWindow,
        Self::PrevWindow,
        Self::Quit,
        Self::AbortKey,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseActionError {
    pub name: String,
}

impl fmt::Display for ParseActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown action '{}'", self.name)
    }
}

impl std::error::Error for ParseActionError {}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|action| action.as_str() == s)
            .copied()
            .ok_or_else(|| ParseActionError { name: s.to_owned() })
    }
}

/// Normalizes a key event to its binding token: `^n`, `M-f`, `g`, `<up>`.
///
/// Keys with no token (function keys, media keys) resolve to `None` and are
/// ignored upstream.
pub fn token_for_key(key: &KeyEvent) -> Option<String> {
    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(format!("^{}", c.to_ascii_lowercase()))
        }
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::ALT) => Some(format!("M-{c}")),
        KeyCode::Char(c) => Some(c.to_string()),
        KeyCode::Up => Some("<up>".to_owned()),
        KeyCode::Down => Some("<down>".to_owned()),
        KeyCode::Left => Some("<left>".to_owned()),
        KeyCode::Right => Some("<right>".to_owned()),
        KeyCode::PageUp => Some("<pgup>".to_owned()),
        KeyCode::PageDown => Some("<pgdn>".to_owned()),
        KeyCode::Home => Some("<home>".to_owned()),
        KeyCode::End => Some("<end>".to_owned()),
        KeyCode::Enter => Some("<enter>".to_owned()),
        KeyCode::Tab => Some("<tab>".to_owned()),
        KeyCode::BackTab => Some("<backtab>".to_owned()),
        KeyCode::Backspace => Some("<backspace>".to_owned()),
        KeyCode::Delete => Some("<delete>".to_owned()),
        KeyCode::Esc => Some("<esc>".to_owned()),
        _ => None,
    }
}

/// Prioritized binding tiers with first-hit-wins lookup.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    // Tier order is the priority order: hard-coded, user config, defaults.
    tiers: [HashMap<String, Action>; 3],
}

impl KeyBindings {
    pub fn standard() -> Self {
        Self {
            tiers: [hard_coded_tier(), HashMap::new(), default_tier()],
        }
    }

    pub fn with_user_tier(mut self, user: HashMap<String, Action>) -> Self {
        self.tiers[1] = user;
        self
    }

    /// Resolves a full chord; the highest-priority tier that binds it wins.
    pub fn lookup(&self, chord: &str) -> Option<Action> {
        self.tiers.iter().find_map(|tier| tier.get(chord).copied())
    }

    /// True when some binding in any tier starts with `chord` but is longer,
    /// i.e. more input could still resolve.
    pub fn is_prefix(&self, chord: &str) -> bool {
        self.tiers
            .iter()
            .flat_map(HashMap::keys)
            .any(|key| key.len() > chord.len() && key.starts_with(chord))
    }
}

/// On-disk shape of the user tier: a JSON map of token → action name.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
struct UserBindingsFile {
    entries: HashMap<String, String>,
}

/// Reads the user tier from a JSON map of token → action name.
///
/// A missing or unreadable file is an empty tier; unknown action names are
/// skipped so partial binding tables stay usable.
pub fn load_user_bindings(path: &Path) -> HashMap<String, Action> {
    let Ok(raw) = std::fs::read_to_string(path) else {
        return HashMap::new();
    };
    let Ok(file) = serde_json::from_str::<UserBindingsFile>(&raw) else {
        tracing::warn!(path = %path.display(), "key config is not a JSON object of strings");
        return HashMap::new();
    };

    let mut tier = HashMap::new();
    for (token, name) in file.entries {
        match name.parse::<Action>() {
            Ok(action) => {
                tier.insert(token, action);
            }
            Err(error) => {
                tracing::warn!(token, %error, "ignoring binding for unknown action");
            }
        }
    }
    tier
}

fn hard_coded_tier() -> HashMap<String, Action> {
    [
        ("<up>", Action::PrevLine),
        ("<down>", Action::NextLine),
        ("<left>", Action::BackwardChar),
        ("<right>", Action::ForwardChar),
        ("<pgup>", Action::ScrollBackwardPageOnly),
        ("<pgdn>", Action::ScrollForwardPageOnly),
        ("<home>", Action::BeginningOfNode),
        ("<end>", Action::EndOfNode),
        ("<delete>", Action::ScrollBackward),
        ("<enter>", Action::SelectReferenceThisLine),
        ("<tab>", Action::MoveToNextXref),
        ("<backtab>", Action::MoveToPrevXref),
    ]
    .into_iter()
    .map(|(token, action)| (token.to_owned(), action))
    .collect()
}

// The GNU Info manual bindings, plus the vi motions that do not collide.
fn default_tier() -> HashMap<String, Action> {
    [
        ("^n", Action::NextLine),
        ("^p", Action::PrevLine),
        ("^a", Action::BeginningOfLine),
        ("^e", Action::EndOfLine),
        ("^f", Action::ForwardChar),
        ("^b", Action::BackwardChar),
        ("M-<", Action::BeginningOfNode),
        ("M->", Action::EndOfNode),
        (" ", Action::ScrollForward),
        ("<backspace>", Action::ScrollBackward),
        ("^v", Action::ScrollForwardPageOnly),
        ("M-v", Action::ScrollBackwardPageOnly),
        ("n", Action::NextNode),
        ("p", Action::PrevNode),
        ("u", Action::UpNode),
        ("l", Action::HistoryNode),
        ("t", Action::TopNode),
        ("<", Action::FirstNode),
        (">", Action::LastNode),
        ("]", Action::GlobalNextNode),
        ("[", Action::GlobalPrevNode),
        ("g", Action::GotoNode),
        ("s", Action::Search),
        ("/", Action::Search),
        ("}", Action::SearchNext),
        ("^xn", Action::SearchNext),
        ("i", Action::IndexSearch),
        ("^xo", Action::NextWindow),
        ("M-x", Action::PrevWindow),
        ("j", Action::NextLine),
        ("k", Action::PrevLine),
        ("d", Action::ScrollHalfScreenDown),
        ("^d", Action::ScrollHalfScreenDown),
        ("^u", Action::ScrollHalfScreenUp),
        ("^j", Action::DownLine),
        ("^y", Action::UpLine),
        ("q", Action::Quit),
        ("ZZ", Action::Quit),
        ("^g", Action::AbortKey),
    ]
    .into_iter()
    .map(|(token, action)| (token.to_owned(), action))
    .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::{token_for_key, Action, KeyBindings};

    #[test]
    fn action_names_round_trip() {
        for action in Action::ALL {
            let parsed: Action = action.as_str().parse().expect("parse");
            assert_eq!(parsed, *action);
        }
    }

    #[test]
    fn unknown_action_name_is_an_error() {
        assert!("frob-widget".parse::<Action>().is_err());
    }

    #[test]
    fn tokens_normalize_modifiers() {
        let ctrl_n = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert_eq!(token_for_key(&ctrl_n).as_deref(), Some("^n"));

        let alt_v = KeyEvent::new(KeyCode::Char('v'), KeyModifiers::ALT);
        assert_eq!(token_for_key(&alt_v).as_deref(), Some("M-v"));

        let plain = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE);
        assert_eq!(token_for_key(&plain).as_deref(), Some("g"));

        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(token_for_key(&up).as_deref(), Some("<up>"));
    }

    #[test]
    fn default_tier_binds_the_manual_vocabulary() {
        let bindings = KeyBindings::standard();
        assert_eq!(bindings.lookup("n"), Some(Action::NextNode));
        assert_eq!(bindings.lookup("]"), Some(Action::GlobalNextNode));
        assert_eq!(bindings.lookup(" "), Some(Action::ScrollForward));
        assert_eq!(bindings.lookup("zz"), None);
    }

    #[test]
    fn user_tier_overrides_defaults_but_not_hard_coded() {
        let user: HashMap<String, Action> = [
            ("g".to_owned(), Action::BeginningOfNode),
            ("<up>".to_owned(), Action::Quit),
        ]
        .into_iter()
        .collect();
        let bindings = KeyBindings::standard().with_user_tier(user);

        assert_eq!(bindings.lookup("g"), Some(Action::BeginningOfNode));
        assert_eq!(
            bindings.lookup("<up>"),
            Some(Action::PrevLine),
            "hard-coded tier outranks user config"
        );
    }

    #[test]
    fn user_config_skips_unknown_actions() {
        let dir = std::env::temp_dir().join(format!(
            "proteus-keys-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("keys.json");
        std::fs::write(&path, r#"{"g": "beginning-of-node", "x": "frob-widget"}"#).unwrap();

        let tier = super::load_user_bindings(&path);
        assert_eq!(tier.get("g"), Some(&Action::BeginningOfNode));
        assert!(!tier.contains_key("x"), "unknown action names are dropped");

        let empty = super::load_user_bindings(&dir.join("missing.json"));
        assert!(empty.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn chords_resolve_through_prefixes() {
        let bindings = KeyBindings::standard();
        assert!(bindings.is_prefix("^x"));
        assert!(bindings.is_prefix("Z"));
        assert!(!bindings.is_prefix("^xn"), "a full chord is not its own prefix");
        assert_eq!(bindings.lookup("^xn"), Some(Action::SearchNext));
        assert_eq!(bindings.lookup("ZZ"), Some(Action::Quit));
    }
}
