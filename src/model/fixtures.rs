// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Builders for synthetic Info manuals used across the test suite.
//!
//! Offsets are recorded while the text is assembled, so the generated tag
//! table is correct by construction.

use std::fmt::Write as _;

pub(crate) const SEPARATOR: &str = "\u{1F}\n";

/// A generated manual plus the byte offset of each node's separator line.
pub(crate) struct SampleManual {
    pub text: String,
    pub offsets: Vec<(&'static str, usize)>,
}

/// Four-node manual exercising menus, cross-references, and an index block,
/// finished with a literal tag table.
pub(crate) fn sample_manual() -> SampleManual {
    let mut text = String::new();
    let mut offsets = Vec::new();

    text.push_str("This is sample.info, produced for the proteus test suite.\n");

    offsets.push(("Top", text.len()));
    text.push_str(SEPARATOR);
    text.push_str("File: sample.info,  Node: Top,  Next: Invoking sample,  Up: (dir)\n");
    text.push_str("\nSample Manual\n*************\n\nA tiny manual for exercising the reader.\n");
    text.push_str("\n* Menu:\n\n");
    text.push_str("* Invoking sample::\n");
    text.push_str("* GNU Free Documentation License::\n");
    text.push_str("* Index::\n");
    text.push_str("\n\n");

    offsets.push(("Invoking sample", text.len()));
    text.push_str(SEPARATOR);
    text.push_str(
        "File: sample.info,  Node: Invoking sample,  Next: GNU Free Documentation License,  \
         Prev: Top,  Up: Top\n",
    );
    text.push_str("\nRun 'sample' with no arguments.\n");
    text.push_str("See *note GNU Free Documentation License:: for copying conditions,\n");
    text.push_str("and *note Emerge: (emacs)Emerge, for a related tool.\n");

    offsets.push(("GNU Free Documentation License", text.len()));
    text.push_str(SEPARATOR);
    text.push_str(
        "File: sample.info,  Node: GNU Free Documentation License,  Next: Index,  \
         Prev: Invoking sample,  Up: Top\n",
    );
    text.push_str("\nVersion 1.3, 3 November 2008\n");

    offsets.push(("Index", text.len()));
    text.push_str(SEPARATOR);
    text.push_str(
        "File: sample.info,  Node: Index,  Prev: GNU Free Documentation License,  Up: Top\n",
    );
    text.push_str("\n\u{0}\u{8}[index\u{0}\u{8}]\n* Menu:\n\n");
    text.push_str("* invoking sample:                     Invoking sample.      (line 6)\n");
    text.push_str("* sample:                              Invoking sample.\n");
    text.push_str("                                                             (line 7)\n");
    text.push('\n');

    text.push_str(SEPARATOR);
    text.push_str("Tag Table:\n");
    for (name, offset) in &offsets {
        let _ = writeln!(text, "Node: {name}\u{7F}{offset}");
    }
    text.push_str("End Tag Table\n");

    SampleManual { text, offsets }
}

/// Same nodes, no trailing tag table; the loader must synthesize tags by
/// scanning separators.
pub(crate) fn sample_manual_untagged() -> String {
    let manual = sample_manual();
    let last = manual.offsets.last().map(|&(_, offset)| offset).unwrap_or(0);
    let table_start = manual.text[last..]
        .find("\u{1F}\nTag Table:")
        .map(|at| last + at)
        .unwrap_or(manual.text.len());
    manual.text[..table_start].to_owned()
}

/// Node body of `count` numbered lines, for viewport math tests.
pub(crate) fn numbered_lines(count: usize) -> String {
    let mut text = String::new();
    for index in 0..count {
        let _ = writeln!(text, "line {index}");
    }
    text
}
