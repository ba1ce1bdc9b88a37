// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

use smol_str::SmolStr;

use super::node::Node;
use super::tag::Tag;

/// One loaded Info file: raw contents, tag list, and the parsed nodes keyed
/// by name in tag-table order.
///
/// Iteration order equals tag-table order, which is assumed to equal byte
/// order; positional navigation ([`Document::before`]/[`Document::after`])
/// runs over this order and is deliberately independent of the
/// header-declared `next`/`prev` links.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    filename: SmolStr,
    contents: String,
    tags: Vec<Tag>,
    nodes: Vec<Node>,
    by_name: HashMap<SmolStr, usize>,
    modified: Option<SystemTime>,
}

impl Document {
    pub fn new(
        path: PathBuf,
        filename: impl Into<SmolStr>,
        contents: String,
        tags: Vec<Tag>,
        nodes: Vec<Node>,
        modified: Option<SystemTime>,
    ) -> Self {
        let mut by_name = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            // First occurrence wins for duplicate names, matching tag order.
            by_name.entry(SmolStr::new(node.name())).or_insert(index);
        }
        Self {
            path,
            filename: filename.into(),
            contents,
            tags,
            nodes,
            by_name,
            modified,
        }
    }

    /// Canonicalized location of the file this document was loaded from.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Modification metadata captured at load time; staleness checks compare
    /// against the current filesystem state.
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.by_name.get(name).map(|&index| &self.nodes[index])
    }

    pub fn node_at(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn first(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn last(&self) -> Option<&Node> {
        self.nodes.last()
    }

    /// Node `count` positions before `name` in tag-table order.
    ///
    /// Out-of-range is an error, never clamped.
    pub fn before(&self, name: &str, count: usize) -> Result<&Node, NavError> {
        self.offset_from(name, -(count as i64))
    }

    /// Node `count` positions after `name` in tag-table order.
    pub fn after(&self, name: &str, count: usize) -> Result<&Node, NavError> {
        self.offset_from(name, count as i64)
    }

    fn offset_from(&self, name: &str, offset: i64) -> Result<&Node, NavError> {
        let index = self.position(name).ok_or_else(|| NavError::UnknownNode {
            name: name.to_owned(),
        })?;
        let target = index as i64 + offset;
        if target < 0 || target >= self.nodes.len() as i64 {
            return Err(NavError::OutOfRange {
                name: name.to_owned(),
                offset,
                len: self.nodes.len(),
            });
        }
        Ok(&self.nodes[target as usize])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    UnknownNode { name: String },
    OutOfRange { name: String, offset: i64, len: usize },
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode { name } => write!(f, "no node named '{name}'"),
            Self::OutOfRange { name, offset, len } => {
                write!(f, "no node {offset} positions from '{name}' ({len} nodes)")
            }
        }
    }
}

impl std::error::Error for NavError {}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use super::{Document, NavError};
    use crate::model::Node;

    fn node(name: &str) -> Node {
        Node::new(name, "sample.info", Arc::from(""), None, None, None, Vec::new())
    }

    fn document() -> Document {
        Document::new(
            PathBuf::from("/usr/share/info/sample.info"),
            "sample.info",
            String::new(),
            Vec::new(),
            vec![node("Top"), node("Invoking sample"), node("Index")],
            None,
        )
    }

    #[test]
    fn lookup_by_name_and_position() {
        let doc = document();
        assert_eq!(doc.node("Invoking sample").map(Node::name), Some("Invoking sample"));
        assert_eq!(doc.position("Index"), Some(2));
        assert!(doc.node("Missing").is_none());
    }

    #[test]
    fn after_follows_tag_order() {
        let doc = document();
        let next = doc.after("Top", 1).expect("after");
        assert_eq!(next.name(), "Invoking sample");
        assert_eq!(doc.after("Top", 2).expect("after").name(), "Index");
    }

    #[test]
    fn before_past_start_is_out_of_range() {
        let doc = document();
        let err = doc.before("Top", 1).unwrap_err();
        assert!(matches!(err, NavError::OutOfRange { .. }));
    }

    #[test]
    fn after_past_end_is_out_of_range() {
        let doc = document();
        let err = doc.after("Index", 1).unwrap_err();
        assert!(matches!(err, NavError::OutOfRange { .. }));
    }

    #[test]
    fn unknown_name_is_reported() {
        let doc = document();
        let err = doc.after("Missing", 1).unwrap_err();
        assert_eq!(err, NavError::UnknownNode { name: "Missing".to_owned() });
    }

    #[test]
    fn first_and_last_follow_insertion_order() {
        let doc = document();
        assert_eq!(doc.first().map(Node::name), Some("Top"));
        assert_eq!(doc.last().map(Node::name), Some("Index"));
    }
}
