// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Synthetic Info manuals for benchmarks; offsets recorded during assembly
//! so the appended tag table is correct by construction.

use std::fmt::Write as _;

pub const SEPARATOR: &str = "\u{1F}\n";

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    Medium,
    LargeWithIndex,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::LargeWithIndex => "large_with_index",
        }
    }

    pub fn node_count(self) -> usize {
        match self {
            Self::Small => 10,
            Self::Medium => 100,
            Self::LargeWithIndex => 400,
        }
    }
}

pub fn manual(case: Case) -> String {
    let nodes = case.node_count();
    let mut text = String::from("Benchmark manual.\n");
    let mut offsets = Vec::with_capacity(nodes);

    for index in 0..nodes {
        offsets.push((format!("Node {index}"), text.len()));
        text.push_str(SEPARATOR);
        let _ = write!(text, "File: bench.info,  Node: Node {index}");
        if index + 1 < nodes {
            let _ = write!(text, ",  Next: Node {}", index + 1);
        }
        if index > 0 {
            let _ = write!(text, ",  Prev: Node {}", index - 1);
        }
        text.push_str(",  Up: Top\n\n");
        for line in 0..8 {
            let _ = writeln!(text, "Body line {line} of node {index}, see *note Node 0:: too.");
        }
        text.push_str("\n* Menu:\n\n");
        let _ = writeln!(text, "* Node {}::", (index + 1) % nodes);
        text.push_str("\n\n");
    }

    if matches!(case, Case::LargeWithIndex) {
        offsets.push(("Index".to_owned(), text.len()));
        text.push_str(SEPARATOR);
        text.push_str("File: bench.info,  Node: Index,  Up: Top\n");
        text.push_str("\n\u{0}\u{8}[index\u{0}\u{8}]\n* Menu:\n\n");
        for index in 0..nodes {
            let _ = writeln!(text, "* entry {index}:          Node {index}.    (line 4)");
        }
        text.push('\n');
    }

    text.push_str(SEPARATOR);
    text.push_str("Tag Table:\n");
    for (name, offset) in &offsets {
        let _ = writeln!(text, "Node: {name}\u{7F}{offset}");
    }
    text.push_str("End Tag Table\n");
    text
}

/// Cheap structural checksum so the optimizer cannot discard parse results.
pub fn checksum(outcome: &proteus::format::info::ParseOutcome) -> usize {
    outcome.nodes.len()
        + outcome
            .nodes
            .iter()
            .map(|node| node.references().len() + node.len())
            .sum::<usize>()
}
