// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::fs;

use smol_str::SmolStr;

use crate::format::info::parse_document;
use crate::model::Document;

use super::locate::{InfoPath, LocateError};

/// Filename-keyed cache of loaded documents.
///
/// Documents are immutable once loaded; the only refresh path is a full
/// reload when the file's modification metadata changed, which discards every
/// previously parsed node. Callers learn about a reload through the `replaced`
/// flag and must revalidate any window showing a node of that document.
#[derive(Debug)]
pub struct DocumentCache {
    info_path: InfoPath,
    documents: HashMap<SmolStr, Document>,
}

impl DocumentCache {
    pub fn new(info_path: InfoPath) -> Self {
        Self {
            info_path,
            documents: HashMap::new(),
        }
    }

    pub fn info_path(&self) -> &InfoPath {
        &self.info_path
    }

    /// Returns the cached document for `name`, loading or reloading first
    /// when needed. The flag reports whether a previously cached document was
    /// replaced (node identity did not survive).
    pub fn document(&mut self, name: &str) -> Result<(&Document, bool), LocateError> {
        let cached = self.documents.contains_key(name);
        let stale = cached && self.documents.get(name).is_some_and(document_is_stale);

        if !cached || stale {
            let document = self.load(name)?;
            if stale {
                tracing::info!(name, "file changed on disk; reloading");
            }
            self.documents.insert(SmolStr::new(name), document);
        }

        let document = self
            .documents
            .get(name)
            .expect("document cached by the lines above");
        Ok((document, stale))
    }

    /// Peek without loading; used when only already-open documents matter.
    pub fn cached(&self, name: &str) -> Option<&Document> {
        self.documents.get(name)
    }

    /// Seeds the cache with a pre-built document (tests, embedded content).
    pub fn insert(&mut self, name: impl Into<SmolStr>, document: Document) {
        self.documents.insert(name.into(), document);
    }

    fn load(&self, name: &str) -> Result<Document, LocateError> {
        let resolved = self.info_path.resolve(name)?;
        let contents = resolved.read()?;
        // Canonicalize once; path equality is plain value equality afterwards.
        let path = fs::canonicalize(resolved.path()).unwrap_or_else(|_| resolved.path().to_path_buf());
        let modified = fs::metadata(&path).and_then(|meta| meta.modified()).ok();

        let outcome = parse_document(name, &contents);
        for error in &outcome.errors {
            tracing::warn!(name, %error, "skipping malformed node");
        }
        tracing::debug!(name, nodes = outcome.nodes.len(), "loaded info file");

        Ok(Document::new(path, name, contents, outcome.tags, outcome.nodes, modified))
    }
}

fn document_is_stale(document: &Document) -> bool {
    let Some(loaded) = document.modified() else {
        return false;
    };
    match fs::metadata(document.path()).and_then(|meta| meta.modified()) {
        Ok(current) => current > loaded,
        // A vanished or unreadable file keeps serving the cached copy.
        Err(_) => false,
    }
}
