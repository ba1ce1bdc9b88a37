// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use smol_str::SmolStr;

use super::reference::Reference;

/// Named, addressable content unit of an Info document.
///
/// The content slice runs from the node's tag offset to the start of the next
/// node separator (end of document for the last node), so a document's nodes
/// partition its byte range exactly. Header-declared links (`next`/`prev`/
/// `up`) encode author intent and are independent of tag-table order; `None`
/// means the header omitted the field, and `Up: (dir)` normalizes to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: SmolStr,
    filename: SmolStr,
    contents: Arc<str>,
    next: Option<SmolStr>,
    prev: Option<SmolStr>,
    up: Option<SmolStr>,
    references: Vec<Reference>,
}

impl Node {
    pub fn new(
        name: impl Into<SmolStr>,
        filename: impl Into<SmolStr>,
        contents: Arc<str>,
        next: Option<SmolStr>,
        prev: Option<SmolStr>,
        up: Option<SmolStr>,
        references: Vec<Reference>,
    ) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            contents,
            next,
            prev,
            up,
            references,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the owning document.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Shared handle to the content slice; windows clone this so their line
    /// metrics stay valid while the owning document is replaced underneath.
    pub fn contents_arc(&self) -> Arc<str> {
        Arc::clone(&self.contents)
    }

    pub fn next(&self) -> Option<&str> {
        self.next.as_deref()
    }

    pub fn prev(&self) -> Option<&str> {
        self.prev.as_deref()
    }

    pub fn up(&self) -> Option<&str> {
        self.up.as_deref()
    }

    /// Outgoing references in match order.
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}
