// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::hash::{Hash, Hasher};

use smol_str::SmolStr;

/// Outgoing link scanned from node text: a menu entry, an index entry, or an
/// inline cross-reference.
///
/// Equality and hashing consider `(filename, nodename)` only: two references
/// to the same target collapse under set semantics regardless of where in the
/// text they occur. Navigation cares about targets, not occurrences.
#[derive(Debug, Clone)]
pub struct Reference {
    filename: SmolStr,
    nodename: SmolStr,
    label: Option<String>,
    start: usize,
    end: usize,
    line_number: Option<u32>,
}

impl Reference {
    pub fn new(
        filename: impl Into<SmolStr>,
        nodename: impl Into<SmolStr>,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            filename: filename.into(),
            nodename: nodename.into(),
            label: None,
            start,
            end,
            line_number: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_line_number(mut self, line_number: u32) -> Self {
        self.line_number = Some(line_number);
        self
    }

    /// Document the target lives in. Filled with the owning document's name
    /// when the source text names none.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn nodename(&self) -> &str {
        &self.nodename
    }

    /// Index-entry label; `None` for menu entries and cross-references.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Byte span of the node name within the owning node's contents.
    pub fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Line within the target node an index entry points at (1-based).
    pub fn line_number(&self) -> Option<u32> {
        self.line_number
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.filename == other.filename && self.nodename == other.nodename
    }
}

impl Eq for Reference {}

impl Hash for Reference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.filename.hash(state);
        self.nodename.hash(state);
    }
}
