// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::OnceLock;

use memchr::memchr_iter;
use regex::Regex;

use crate::model::Tag;

use super::header::scan_header;

/// Node-separator cookie (`US`, 0x1F).
pub(crate) const COOKIE: u8 = 0x1F;
const FORM_FEED: u8 = 0x0C;

/// Tag tables live within the last chunk of the file; scanning starts here.
const TAIL_WINDOW: usize = 1000;

const TABLE_LABEL: &str = "Tag Table:";
const TABLE_INDIRECT: &str = "(Indirect)";

/// A node-separator line: the cookie, optional form feed, optional carriage
/// return, then end of line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Separator {
    /// Byte offset of the cookie.
    pub start: usize,
    /// Byte offset just past the separator line's newline (or end of file).
    pub line_end: usize,
}

/// All separator lines in the document, in byte order.
pub(crate) fn separators(contents: &str) -> Vec<Separator> {
    let bytes = contents.as_bytes();
    let mut found = Vec::new();
    for start in memchr_iter(COOKIE, bytes) {
        if start > 0 && bytes[start - 1] != b'\n' {
            continue;
        }
        if let Some(line_end) = separator_line_end(bytes, start) {
            found.push(Separator { start, line_end });
        }
    }
    found
}

fn separator_line_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut at = start + 1;
    if bytes.get(at) == Some(&FORM_FEED) {
        at += 1;
    }
    if bytes.get(at) == Some(&b'\r') {
        at += 1;
    }
    match bytes.get(at) {
        None => Some(at),
        Some(&b'\n') => Some(at + 1),
        Some(_) => None,
    }
}

fn table_entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^Node:\s+(?P<name>[^\x7F]+)\x7F(?P<num>\d+)$").expect("table entry regex")
    })
}

/// Locates and reads the tag table near the document's tail.
///
/// Returns `None` when no separator in the tail window is followed by the
/// `Tag Table:` label. An `(Indirect)` table yields an empty list: the
/// indirection is not resolved and the caller falls back to a full scan.
/// Entry parsing stops silently at the first non-matching line.
pub(crate) fn scan_tag_table(filename: &str, contents: &str) -> Option<Vec<Tag>> {
    let tail = contents.len().saturating_sub(TAIL_WINDOW);
    for separator in separators(contents) {
        if separator.start < tail {
            continue;
        }

        let mut lines = contents[separator.line_end..]
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty());
        if lines.next() != Some(TABLE_LABEL) {
            continue;
        }

        let mut tags = Vec::new();
        for line in lines {
            if line.eq_ignore_ascii_case(TABLE_INDIRECT) {
                tracing::debug!(filename, "indirect tag table; falling back to full scan");
                return Some(Vec::new());
            }
            let Some(caps) = table_entry_re().captures(line) else {
                break;
            };
            let name = caps["name"].trim_end().to_owned();
            let offset = caps["num"].parse::<usize>().ok();
            tags.push(Tag::new(filename, name, offset));
        }
        return Some(tags);
    }
    None
}

/// Builds tags by a forward separator scan, for files without a usable tag
/// table. Each node's name comes from its header line; separator lines not
/// followed by a header (the tag table itself, trailing junk) are skipped.
pub(crate) fn synthesize_tags(filename: &str, contents: &str) -> Vec<Tag> {
    let separators = separators(contents);
    let mut tags = Vec::new();
    for (index, separator) in separators.iter().enumerate() {
        let end = separators
            .get(index + 1)
            .map(|next| next.start)
            .unwrap_or(contents.len());
        let Some(header) = scan_header(&contents[separator.line_end..end]) else {
            continue;
        };
        tags.push(Tag::new(filename, header.nodename, Some(separator.start)));
    }
    tags
}
