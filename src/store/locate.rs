// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Info file resolution along `INFOPATH`, including compressed variants.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use smallvec::SmallVec;

/// Decompression tools keyed by filename suffix; each streams to stdout.
const COMPRESS_SUFFIXES: &[(&str, &str, &[&str])] = &[
    ("gz", "gzip", &["-dc"]),
    ("lz", "lzip", &["-dc"]),
    ("xz", "xz", &["-dc"]),
    ("bz2", "bzip2", &["-dc"]),
    ("z", "uncompress", &["-c"]),
];

/// Historic default search list, used when `INFOPATH` is unset.
const DEFAULT_INFOPATH: &[&str] = &[
    "/usr/local/info",
    "/usr/info",
    "/usr/local/lib/info",
    "/usr/lib/info",
    "/usr/local/gnu/info",
    "/usr/local/gnu/lib/info",
    "/usr/gnu/info",
    "/usr/gnu/lib/info",
    "/opt/gnu/info",
    "/usr/share/info",
    "/usr/share/lib/info",
    "/usr/local/share/info",
    "/usr/local/share/lib/info",
    "/usr/gnu/lib/emacs/info",
    "/usr/local/gnu/lib/emacs/info",
    "/usr/local/lib/emacs/info",
    "/usr/local/emacs/info",
    ".",
];

/// A resolved Info file: where it lives and how to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    path: PathBuf,
    compression: Option<Decompressor>,
}

impl ResolvedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_compressed(&self) -> bool {
        self.compression.is_some()
    }

    /// Reads the file contents, piping through the matching decompression
    /// tool when the suffix asks for one.
    pub fn read(&self) -> Result<String, LocateError> {
        match self.compression {
            None => std::fs::read_to_string(&self.path).map_err(|source| LocateError::Io {
                path: self.path.clone(),
                source,
            }),
            Some(decompressor) => decompressor.read(&self.path),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Decompressor {
    program: &'static str,
    args: &'static [&'static str],
}

impl Decompressor {
    fn for_path(path: &Path) -> Option<Self> {
        let suffix = path.extension()?.to_str()?;
        COMPRESS_SUFFIXES
            .iter()
            .find(|(known, _, _)| suffix.eq_ignore_ascii_case(known))
            .map(|&(_, program, args)| Self { program, args })
    }

    fn read(self, path: &Path) -> Result<String, LocateError> {
        let output = Command::new(self.program)
            .args(self.args)
            .arg(path)
            .output()
            .map_err(|source| LocateError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        if !output.status.success() {
            return Err(LocateError::Decompress {
                path: path.to_path_buf(),
                program: self.program,
                status: output.status.code(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Ordered directory list Info files are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoPath {
    dirs: Vec<PathBuf>,
}

impl InfoPath {
    /// Builds the search path from `INFOPATH` (colon-separated), falling back
    /// to the historic default list.
    pub fn from_env() -> Self {
        let dirs = std::env::var("INFOPATH")
            .map(|raw| raw.split(':').map(PathBuf::from).collect())
            .unwrap_or_else(|_| DEFAULT_INFOPATH.iter().map(PathBuf::from).collect());
        Self { dirs }
    }

    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Resolves a name to a readable Info file.
    ///
    /// A name that is already a path to an existing file wins outright.
    /// Otherwise each directory is tried in order: the name as-is, as a
    /// directory holding an `index` file, with an `.info` suffix, and each of
    /// those with the known compression suffixes.
    pub fn resolve(&self, name: &str) -> Result<ResolvedFile, LocateError> {
        let direct = PathBuf::from(name);
        if direct.is_file() {
            return Ok(resolved(direct));
        }

        for dir in &self.dirs {
            for candidate in candidates(dir, name) {
                if candidate.is_file() {
                    tracing::debug!(name, path = %candidate.display(), "resolved info file");
                    return Ok(resolved(candidate));
                }
            }
        }
        Err(LocateError::NotFound {
            name: name.to_owned(),
        })
    }
}

fn resolved(path: PathBuf) -> ResolvedFile {
    let compression = Decompressor::for_path(&path);
    ResolvedFile { path, compression }
}

fn candidates(dir: &Path, name: &str) -> SmallVec<[PathBuf; 16]> {
    let mut paths = SmallVec::new();
    let base = dir.join(name);
    paths.push(base.clone());
    paths.push(base.join("index"));
    for (suffix, _, _) in COMPRESS_SUFFIXES {
        paths.push(with_appended_extension(&base, suffix));
    }
    let with_info = with_appended_extension(&base, "info");
    paths.push(with_info.clone());
    for (suffix, _, _) in COMPRESS_SUFFIXES {
        paths.push(with_appended_extension(&with_info, suffix));
    }
    paths
}

fn with_appended_extension(path: &Path, extension: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_owned();
    raw.push(".");
    raw.push(extension);
    PathBuf::from(raw)
}

#[derive(Debug)]
pub enum LocateError {
    NotFound { name: String },
    Io { path: PathBuf, source: io::Error },
    Decompress { path: PathBuf, program: &'static str, status: Option<i32> },
}

impl fmt::Display for LocateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { name } => write!(f, "cannot find info file '{name}'"),
            Self::Io { path, source } => {
                write!(f, "cannot read '{}': {source}", path.display())
            }
            Self::Decompress { path, program, status } => write!(
                f,
                "{program} failed on '{}' (status {status:?})",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LocateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
