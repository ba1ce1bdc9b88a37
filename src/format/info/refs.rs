// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Reference extraction: menu entries, index entries, and inline
//! cross-references, scanned left to right with earliest-match-wins dispatch.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::Reference;

/// Which scanner claimed a marker. Order doubles as the tie-break priority:
/// the index marker contains the menu marker, so at equal positions the
/// index variant must win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SourceKind {
    Index,
    Menu,
    CrossRef,
}

fn index_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?mi)\x00\x08\[index\x00\x08\]\s*^\* Menu:").expect("index marker regex")
    })
}

fn menu_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?mi)^\* Menu:").expect("menu marker regex"))
}

fn cross_ref_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\*note\s").expect("cross-reference marker regex"))
}

fn menu_entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\* (?P<name>\w[\w ]*)::").expect("menu entry regex"))
}

fn index_entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\*\s+(?P<label>[^:]+):\s+(?P<name>[\w ]+)\.\s+\(line\s+(?P<line>\d+)\)")
            .expect("index entry regex")
    })
}

// Two cross-reference grammars, tried in order. A 0x7F padding byte may
// flank the label or name and is stripped by the patterns.
fn cross_ref_terse_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\*note\s+(?:\((?P<file>\w+)\))?\x7F?(?P<name>[\w\s]+)\x7F?::")
            .expect("terse cross-reference regex")
    })
}

fn cross_ref_labeled_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\*note\s+\x7F?(?P<label>[\w ]+)\x7F?:\s+(?:\((?P<file>\w+)\))?\x7F?(?P<name>[\w\s]+)\x7F?[.,]",
        )
        .expect("labeled cross-reference regex")
    })
}

fn blank_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^$").expect("blank line regex"))
}

/// Scans a node's contents and returns its outgoing references in match
/// order. `owner` fills the filename of references whose source text names
/// no document.
pub(crate) fn extract_references(contents: &str, owner: &str) -> Vec<Reference> {
    let mut references = Vec::new();
    let mut pos = 0;

    while pos < contents.len() {
        let next = [
            (SourceKind::Index, index_marker_re().find_at(contents, pos)),
            (SourceKind::Menu, menu_marker_re().find_at(contents, pos)),
            (SourceKind::CrossRef, cross_ref_marker_re().find_at(contents, pos)),
        ]
        .into_iter()
        .filter_map(|(kind, found)| found.map(|m| (kind, m)))
        .min_by_key(|(kind, m)| (m.start(), *kind));

        let Some((kind, marker)) = next else {
            break;
        };

        match kind {
            SourceKind::Index => {
                let end = block_end(contents, marker.start());
                scan_index_block(&contents[marker.start()..end], marker.start(), owner, &mut references);
                pos = marker.end();
            }
            SourceKind::Menu => {
                let end = block_end(contents, marker.start());
                scan_menu_block(&contents[marker.start()..end], marker.start(), owner, &mut references);
                pos = marker.end();
            }
            SourceKind::CrossRef => {
                pos = match scan_cross_ref(contents, marker.start(), owner, &mut references) {
                    Some(end) => end,
                    None => marker.end(),
                };
            }
        }
    }

    references
}

/// Byte offset of the second blank line at or after `from` (a reference
/// block runs up to there), or the end of contents when the document runs
/// out first.
fn block_end(contents: &str, from: usize) -> usize {
    blank_line_re()
        .find_iter(&contents[from..])
        .nth(1)
        .map(|m| from + m.start())
        .unwrap_or(contents.len())
}

fn scan_menu_block(block: &str, base: usize, owner: &str, references: &mut Vec<Reference>) {
    for caps in menu_entry_re().captures_iter(block) {
        let name = caps.name("name").expect("menu entry name group");
        references.push(Reference::new(
            owner,
            collapse_whitespace(name.as_str()),
            base + name.start(),
            base + name.end(),
        ));
    }
}

fn scan_index_block(block: &str, base: usize, owner: &str, references: &mut Vec<Reference>) {
    for caps in index_entry_re().captures_iter(block) {
        let name = caps.name("name").expect("index entry name group");
        let label = caps.name("label").expect("index entry label group");
        let Some(line) = caps["line"].parse::<u32>().ok() else {
            continue;
        };
        references.push(
            Reference::new(
                owner,
                collapse_whitespace(name.as_str()),
                base + name.start(),
                base + name.end(),
            )
            .with_label(collapse_whitespace(label.as_str()))
            .with_line_number(line),
        );
    }
}

/// Cross-references are self-terminating: the two grammars are tried in
/// order at the marker position. Returns the end of the consumed match, or
/// `None` when neither grammar applies.
fn scan_cross_ref(
    contents: &str,
    at: usize,
    owner: &str,
    references: &mut Vec<Reference>,
) -> Option<usize> {
    for re in [cross_ref_terse_re(), cross_ref_labeled_re()] {
        let Some(caps) = re.captures_at(contents, at) else {
            continue;
        };
        let whole = caps.get(0).expect("whole cross-reference match");
        if whole.start() != at {
            continue;
        }
        let name = caps.name("name").expect("cross-reference name group");
        let filename = caps
            .name("file")
            .map(|m| m.as_str())
            .unwrap_or(owner);
        references.push(Reference::new(
            filename,
            collapse_whitespace(name.as_str()),
            name.start(),
            name.end(),
        ));
        return Some(whole.end());
    }
    None
}

/// Whitespace runs (including line wraps) collapse to a single space.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
