//! Export extraction from Go module source trees.
//!
//! Walks a module tree, parses each source file with tree-sitter, and
//! collects every exported declaration into a [`Symbols`] set plus a
//! [`FuncSigMap`] of structured function signatures. Files that fail to
//! parse are warned about on stderr and skipped; the only fatal
//! conditions are a missing source root and cancellation.

use std::fs;
use std::path::Path;

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::scanner::{collect_go_files, find_source_root};
use crate::types::{FuncSigMap, Symbols};

pub mod go;

mod helpers;
mod signature;

/// Walk the module source at `root_dir` and collect all exported symbols.
///
/// `module` is the module import path (e.g. `github.com/acme/foo`);
/// symbols in subdirectories get `module/<subdir>` package paths with
/// forward slashes. Returns the symbol set and the structured function
/// signatures used by the diff engine's fuzzy pass.
pub fn parse_exports(
    cancel: &CancelToken,
    root_dir: &Path,
    module: &str,
) -> Result<(Symbols, FuncSigMap)> {
    let source_root = find_source_root(root_dir)?;

    let mut entries = Vec::new();
    let mut sig_map = FuncSigMap::new();

    for path in collect_go_files(&source_root, cancel)? {
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("warning: skipping {}: {}", path.display(), e);
                continue;
            }
        };

        let pkg_path = package_path(&source_root, &path, module);
        if let Err(msg) = go::collect_exports(&source, &pkg_path, &mut entries, &mut sig_map) {
            eprintln!("warning: skipping {}: {}", path.display(), msg);
        }
    }

    let symbols = Symbols {
        module: module.to_string(),
        version: String::new(),
        entries,
    };
    Ok((symbols, sig_map))
}

/// Extract the old and new trees concurrently.
///
/// Each extraction is self-contained; no state is shared beyond the
/// cancel token, so pairing them on two threads is safe.
#[allow(clippy::type_complexity)]
pub fn parse_exports_pair(
    cancel: &CancelToken,
    old_root: &Path,
    new_root: &Path,
    module: &str,
) -> Result<((Symbols, FuncSigMap), (Symbols, FuncSigMap))> {
    let (old, new) = rayon::join(
        || parse_exports(cancel, old_root, module),
        || parse_exports(cancel, new_root, module),
    );
    Ok((old?, new?))
}

/// Derive the full import path for the package containing `file`,
/// relative to the module source root. Forward slashes only.
fn package_path(source_root: &Path, file: &Path, module: &str) -> String {
    let dir = file.parent().unwrap_or(source_root);
    match dir.strip_prefix(source_root) {
        Ok(rel) if !rel.as_os_str().is_empty() => {
            format!("{}/{}", module, rel.to_string_lossy().replace('\\', "/"))
        }
        _ => module.to_string(),
    }
}
