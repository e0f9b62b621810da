//! Error types for emenda-core.

use thiserror::Error;

/// Result type alias for emenda-core operations.
pub type Result<T> = std::result::Result<T, EmendaError>;

/// Errors that can occur while locating, extracting, or diffing module sources.
///
/// Per-file conditions are never fatal: unparseable files are warned and
/// skipped, and unrecognized type expressions render as `unknown`.
#[derive(Error, Debug)]
pub enum EmendaError {
    /// No module manifest was found within two directory levels.
    #[error("no go.mod found under {path}")]
    SourceRootMissing {
        /// Directory the search started from.
        path: String,
    },

    /// The manifest at the source root has no `module` directive.
    #[error("no module directive in {path}")]
    ModuleDirectiveMissing {
        /// Path of the manifest that was read.
        path: String,
    },

    /// The two source trees declare different module import paths.
    #[error("module mismatch: old={old} new={new}")]
    ModuleMismatch {
        /// Module path declared by the old tree.
        old: String,
        /// Module path declared by the new tree.
        new: String,
    },

    /// External cancellation was observed during the source walk.
    #[error("extraction cancelled")]
    Cancelled,

    /// The directory walk itself failed.
    #[error("walking source at {path}: {source}")]
    Walk {
        /// Root of the walk that failed.
        path: String,
        /// Underlying walker error.
        #[source]
        source: ignore::Error,
    },

    /// IO error reading the manifest or source files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EmendaError::SourceRootMissing {
            path: "/tmp/extract".to_string(),
        };
        assert!(err.to_string().contains("/tmp/extract"));

        let err = EmendaError::ModuleMismatch {
            old: "github.com/acme/a".to_string(),
            new: "github.com/acme/b".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "module mismatch: old=github.com/acme/a new=github.com/acme/b"
        );
    }
}
