// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smol_str::SmolStr;

/// Pointer to a node inside an Info file, as read from the tag table.
///
/// `offset` is the byte position of the node-separator line preceding the
/// node; `None` means the table did not carry a usable position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    filename: SmolStr,
    nodename: SmolStr,
    offset: Option<usize>,
}

impl Tag {
    pub fn new(
        filename: impl Into<SmolStr>,
        nodename: impl Into<SmolStr>,
        offset: Option<usize>,
    ) -> Self {
        Self {
            filename: filename.into(),
            nodename: nodename.into(),
            offset,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn nodename(&self) -> &str {
        &self.nodename
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }
}
