//! Emenda core - breaking-change detection for Go module upgrades.
//!
//! This crate compares two unpacked source trees of the same module and
//! produces a structured, ordered list of breaking API changes, each
//! classified HIGH / MEDIUM / LOW confidence. Confidence drives what a
//! caller may do mechanically and what needs human (or agent) review.
//!
//! # Pipeline
//!
//! 1. **Extraction** ([`parse_exports`]): walk each source tree, parse
//!    every file with tree-sitter, and collect exported symbols with
//!    canonical signature strings.
//! 2. **Diffing** ([`diff_exports`]): correlate the two symbol sets in
//!    six passes (exact match, changed, renamed, member correlation,
//!    fuzzy match, leftovers) and emit [`Change`] records.
//!
//! Fetching, archive extraction, and applying rewrites are the caller's
//! concern; this crate only reads source trees that are already on disk.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use emenda_core::{compute_changes, CancelToken};
//!
//! let cancel = CancelToken::new();
//! let spec = compute_changes(
//!     &cancel,
//!     Path::new("/tmp/extract-old"),
//!     Path::new("/tmp/extract-new"),
//!     "v1.2.3",
//!     "v2.0.0",
//! )?;
//! for change in &spec.changes {
//!     println!("{} {} ({})", change.kind.as_str(), change.symbol, change.confidence.as_str());
//! }
//! # Ok::<(), emenda_core::EmendaError>(())
//! ```

use std::path::Path;

pub mod cancel;
pub mod differ;
pub mod error;
pub mod parser;
pub mod scanner;
pub mod types;

pub use cancel::CancelToken;
pub use differ::{diff_exports, Change, ChangeKind, ChangeSpec, Confidence};
pub use error::{EmendaError, Result};
pub use parser::{parse_exports, parse_exports_pair};
pub use scanner::{find_source_root, module_path};
pub use types::{FuncSigMap, FuncSignature, Symbol, SymbolKey, SymbolKind, Symbols};

/// Diff two unpacked module versions end to end.
///
/// Locates the source root inside each extraction directory, validates
/// that both trees declare the same module import path, extracts exports
/// from both sides concurrently, and runs the diff engine.
///
/// `old_path` and `new_path` are extraction directories (the manifest may
/// sit up to two levels deep); `old_version` and `new_version` are only
/// recorded in the resulting [`ChangeSpec`].
pub fn compute_changes(
    cancel: &CancelToken,
    old_path: &Path,
    new_path: &Path,
    old_version: &str,
    new_version: &str,
) -> Result<ChangeSpec> {
    let old_root = find_source_root(old_path)?;
    let module = module_path(&old_root)?;

    let new_root = find_source_root(new_path)?;
    let new_module = module_path(&new_root)?;
    if module != new_module {
        return Err(EmendaError::ModuleMismatch {
            old: module,
            new: new_module,
        });
    }

    let ((mut old, old_sigs), (mut new, new_sigs)) =
        parse_exports_pair(cancel, &old_root, &new_root, &module)?;
    old.version = old_version.to_string();
    new.version = new_version.to_string();

    let changes = diff_exports(&old, &new, &old_sigs, &new_sigs);

    Ok(ChangeSpec {
        module,
        old_version: old_version.to_string(),
        new_version: new_version.to_string(),
        changes,
    })
}
