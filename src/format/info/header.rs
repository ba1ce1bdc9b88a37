// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::OnceLock;

use regex::Regex;

/// Parsed node header line.
///
/// `File: <name>, Node: <name>[, Next: <name>][, Prev(ious): <name>]
/// [, Up: <name>]`: fields separated by a comma plus whitespace, keywords
/// case-insensitive, field content free of commas and newlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NodeHeader {
    pub filename: String,
    pub nodename: String,
    pub next: Option<String>,
    pub prev: Option<String>,
    pub up: Option<String>,
}

/// `(dir)` is the synthetic root; an `Up` pointing at it means "no parent".
const DIR_NODE: &str = "(dir)";

fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?im)^File:\s+(?P<filename>[^,\n]+),\s+Node:\s+(?P<nodename>[^,\n]+)(?:,\s+Next:\s+(?P<next>[^,\n]+))?(?:,\s+Prev(?:ious)?:\s+(?P<prev>[^,\n]+))?(?:,\s+Up:\s+(?P<up>[^,\n]+))?$",
        )
        .expect("node header regex")
    })
}

/// Finds and parses the first header-shaped line in a node slice.
///
/// The slice may open with the node-separator line when the tag offset
/// addresses the separator itself; searching (rather than anchoring to byte
/// zero) absorbs that slop.
pub(crate) fn scan_header(contents: &str) -> Option<NodeHeader> {
    let caps = header_re().captures(contents)?;
    let field = |name: &str| caps.name(name).map(|m| m.as_str().trim_end().to_owned());

    let up = field("up").filter(|up| up.as_str() != DIR_NODE);
    Some(NodeHeader {
        filename: field("filename").unwrap_or_default(),
        nodename: field("nodename").unwrap_or_default(),
        next: field("next"),
        prev: field("prev"),
        up,
    })
}
