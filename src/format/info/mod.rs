// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Info document parsing: tag table, node boundaries, headers, references.
//!
//! The format is Appendix F of the GNU Texinfo manual: nodes delimited by a
//! 0x1F separator line, each opening with a `File: …, Node: …` header, with
//! an optional trailing tag table mapping node names to byte offsets.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::model::{Node, Tag};

mod header;
mod refs;
mod tags;


use header::scan_header;
use refs::extract_references;
use tags::{scan_tag_table, separators, synthesize_tags};

/// Result of parsing one document's raw contents.
///
/// Malformed nodes are fatal for the node, never for the document: they are
/// reported in `errors` while their siblings parse normally.
#[derive(Debug)]
pub struct ParseOutcome {
    pub tags: Vec<Tag>,
    pub nodes: Vec<Node>,
    pub errors: Vec<ParseError>,
}

/// Parses raw Info file bytes into tags and nodes, in tag-table order.
///
/// The tag table is preferred when present and usable; otherwise tags are
/// synthesized by a forward separator scan so untagged (or indirect-table)
/// files remain browsable.
pub fn parse_document(filename: &str, contents: &str) -> ParseOutcome {
    let tags = match scan_tag_table(filename, contents) {
        Some(tags) if !tags.is_empty() => tags,
        _ => synthesize_tags(filename, contents),
    };

    let separators = separators(contents);
    let mut nodes = Vec::with_capacity(tags.len());
    let mut errors = Vec::new();

    for (index, tag) in tags.iter().enumerate() {
        let nodename = SmolStr::new(tag.nodename());
        let Some(start) = tag.offset().filter(|&start| start < contents.len()) else {
            errors.push(ParseError::UnknownOffset { nodename });
            continue;
        };

        // End boundary: the next separator strictly after the start offset;
        // only the final tag may run to end of file.
        let after = separators.partition_point(|separator| separator.start <= start);
        let end = match separators.get(after) {
            Some(separator) => separator.start,
            None if index == tags.len() - 1 => contents.len(),
            None => {
                errors.push(ParseError::MissingSeparator { nodename });
                continue;
            }
        };

        let slice = &contents[start..end];
        let Some(header) = scan_header(slice) else {
            errors.push(ParseError::MissingHeader { nodename });
            continue;
        };

        let references = extract_references(slice, filename);
        nodes.push(Node::new(
            nodename,
            filename,
            Arc::from(slice),
            header.next.map(SmolStr::new),
            header.prev.map(SmolStr::new),
            header.up.map(SmolStr::new),
            references,
        ));
    }

    ParseOutcome { tags, nodes, errors }
}

/// Structural defect confined to a single node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnknownOffset { nodename: SmolStr },
    MissingSeparator { nodename: SmolStr },
    MissingHeader { nodename: SmolStr },
}

impl ParseError {
    pub fn nodename(&self) -> &str {
        match self {
            Self::UnknownOffset { nodename }
            | Self::MissingSeparator { nodename }
            | Self::MissingHeader { nodename } => nodename,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOffset { nodename } => {
                write!(f, "tag for node '{nodename}' carries no usable offset")
            }
            Self::MissingSeparator { nodename } => {
                write!(f, "no ending node separator for '{nodename}'")
            }
            Self::MissingHeader { nodename } => {
                write!(f, "no header line in node '{nodename}'")
            }
        }
    }
}

impl std::error::Error for ParseError {}
