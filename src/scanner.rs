//! Source-root location and filtered source-file discovery.
//!
//! Walks an unpacked module tree with the `ignore` crate's walker,
//! applying only the engine's own filter rules: `internal`, `testdata`,
//! `vendor`, and `_`-prefixed subtrees are skipped whole, symlinks are
//! never followed, and test files are excluded.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::cancel::CancelToken;
use crate::error::{EmendaError, Result};

/// Name of the module manifest that marks a source root.
pub const MANIFEST_FILE: &str = "go.mod";

/// Directory names whose entire subtree is excluded from extraction.
const SKIP_DIRS: &[&str] = &["internal", "testdata", "vendor"];

/// Suffix identifying test files, which never contribute exports.
const TEST_FILE_SUFFIX: &str = "_test.go";

/// Locate the module source root within `dir`.
///
/// Module zips extract to `tmp/module@version/`, so the manifest may sit
/// one or two levels below the extraction directory. Checks `dir` itself
/// first, then walks at most two levels deep (lexical order, symlinks
/// not followed) and returns the first directory holding a manifest.
pub fn find_source_root(dir: &Path) -> Result<PathBuf> {
    if has_manifest(dir) {
        return Ok(dir.to_path_buf());
    }

    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .follow_links(false)
        .max_depth(Some(2))
        .sort_by_file_name(OsStr::cmp)
        .build();

    for entry in walker {
        let entry = entry.map_err(|e| EmendaError::Walk {
            path: dir.display().to_string(),
            source: e,
        })?;
        if entry.depth() == 0 {
            continue;
        }
        if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
            continue;
        }
        if has_manifest(entry.path()) {
            return Ok(entry.path().to_path_buf());
        }
    }

    Err(EmendaError::SourceRootMissing {
        path: dir.display().to_string(),
    })
}

/// Whether the directory contains a module manifest file.
fn has_manifest(dir: &Path) -> bool {
    dir.join(MANIFEST_FILE).is_file()
}

/// Read the module import path declared by the manifest at `source_root`.
///
/// Only the `module` directive is consulted; require/replace handling
/// belongs to the orchestrator, not this engine.
pub fn module_path(source_root: &Path) -> Result<String> {
    let manifest = source_root.join(MANIFEST_FILE);
    let contents = fs::read_to_string(&manifest)?;

    for line in contents.lines() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix("module") else {
            continue;
        };
        if !rest.starts_with(char::is_whitespace) {
            continue;
        }
        if let Some(token) = rest.split_whitespace().next() {
            let path = token.trim_matches('"');
            if !path.is_empty() {
                return Ok(path.to_string());
            }
        }
    }

    Err(EmendaError::ModuleDirectiveMissing {
        path: manifest.display().to_string(),
    })
}

/// Collect every extractable source file under `source_root`, in lexical
/// order. The cancel token is checked once per walk entry.
pub(crate) fn collect_go_files(source_root: &Path, cancel: &CancelToken) -> Result<Vec<PathBuf>> {
    let walker = WalkBuilder::new(source_root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(OsStr::cmp)
        .filter_entry(|entry| {
            if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !(SKIP_DIRS.contains(&name.as_ref()) || name.starts_with('_'))
        })
        .build();

    let mut files = Vec::new();
    for entry in walker {
        if cancel.is_cancelled() {
            return Err(EmendaError::Cancelled);
        }

        let entry = entry.map_err(|e| EmendaError::Walk {
            path: source_root.display().to_string(),
            source: e,
        })?;

        // Symlinks are never followed; symlinked files are skipped outright.
        if entry.path_is_symlink() {
            continue;
        }
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !name.ends_with(".go") || name.ends_with(TEST_FILE_SUFFIX) {
            continue;
        }

        files.push(entry.into_path());
    }

    Ok(files)
}
