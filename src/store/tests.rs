// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::fixtures::sample_manual;
use crate::model::Document;

use super::{DocumentCache, InfoPath, LocateError};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("proteus-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

#[test]
fn resolves_exact_name() {
    let tmp = TempDir::new("locate-exact");
    tmp.write("sample.info", "contents\n");
    let path = InfoPath::with_dirs(vec![tmp.path().to_path_buf()]);

    let resolved = path.resolve("sample.info").expect("resolve");
    assert!(resolved.path().ends_with("sample.info"));
    assert!(!resolved.is_compressed());
}

#[test]
fn resolves_bare_name_via_info_suffix() {
    let tmp = TempDir::new("locate-suffix");
    tmp.write("sample.info", "contents\n");
    let path = InfoPath::with_dirs(vec![tmp.path().to_path_buf()]);

    let resolved = path.resolve("sample").expect("resolve");
    assert!(resolved.path().ends_with("sample.info"));
}

#[test]
fn resolves_compressed_variant_and_flags_it() {
    let tmp = TempDir::new("locate-compressed");
    tmp.write("manual.info.gz", "not actually gzip\n");
    let path = InfoPath::with_dirs(vec![tmp.path().to_path_buf()]);

    let resolved = path.resolve("manual").expect("resolve");
    assert!(resolved.path().ends_with("manual.info.gz"));
    assert!(resolved.is_compressed());
}

#[test]
fn resolves_directory_index_file() {
    let tmp = TempDir::new("locate-index");
    std::fs::create_dir_all(tmp.path().join("manual")).unwrap();
    tmp.write("manual/index", "contents\n");
    let path = InfoPath::with_dirs(vec![tmp.path().to_path_buf()]);

    let resolved = path.resolve("manual").expect("resolve");
    assert!(resolved.path().ends_with("manual/index"));
}

#[test]
fn earlier_directories_win() {
    let first = TempDir::new("locate-first");
    let second = TempDir::new("locate-second");
    first.write("sample.info", "first\n");
    second.write("sample.info", "second\n");
    let path =
        InfoPath::with_dirs(vec![first.path().to_path_buf(), second.path().to_path_buf()]);

    let resolved = path.resolve("sample").expect("resolve");
    assert_eq!(resolved.read().expect("read"), "first\n");
}

#[test]
fn missing_file_reports_not_found() {
    let tmp = TempDir::new("locate-missing");
    let path = InfoPath::with_dirs(vec![tmp.path().to_path_buf()]);

    let err = path.resolve("no-such-manual").unwrap_err();
    assert!(matches!(err, LocateError::NotFound { name } if name == "no-such-manual"));
}

#[test]
fn cache_loads_and_parses_documents() {
    let tmp = TempDir::new("cache-load");
    tmp.write("sample.info", &sample_manual().text);
    let mut cache = DocumentCache::new(InfoPath::with_dirs(vec![tmp.path().to_path_buf()]));

    let (document, replaced) = cache.document("sample").expect("load");
    assert!(!replaced);
    assert_eq!(document.len(), 4);
    assert_eq!(document.first().map(|n| n.name().to_owned()).as_deref(), Some("Top"));

    // Second access serves the cached copy.
    let (document, replaced) = cache.document("sample").expect("cached");
    assert!(!replaced);
    assert_eq!(document.len(), 4);
}

#[test]
fn stale_document_is_reloaded_in_full() {
    let tmp = TempDir::new("cache-stale");
    let on_disk = tmp.write("sample.info", &sample_manual().text);
    let mut cache = DocumentCache::new(InfoPath::with_dirs(vec![tmp.path().to_path_buf()]));

    // Seed a cached document whose recorded mtime predates the file.
    let outdated = Document::new(
        on_disk.clone(),
        "sample",
        String::new(),
        Vec::new(),
        Vec::new(),
        Some(UNIX_EPOCH),
    );
    cache.insert("sample", outdated);
    assert_eq!(cache.cached("sample").map(Document::len), Some(0));

    let (document, replaced) = cache.document("sample").expect("reload");
    assert!(replaced, "mtime newer than the recorded one must trigger a reload");
    assert_eq!(document.len(), 4, "reload discards all previously parsed nodes");
}

#[test]
fn unknown_document_error_is_surfaced_not_cached() {
    let tmp = TempDir::new("cache-missing");
    let mut cache = DocumentCache::new(InfoPath::with_dirs(vec![tmp.path().to_path_buf()]));

    assert!(cache.document("ghost").is_err());
    assert!(cache.cached("ghost").is_none());
}
