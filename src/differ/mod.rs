//! Breaking-change classification between two module versions.
//!
//! The diff engine consumes the symbol lists and signature maps produced
//! by the extractor for an old and a new version of the same module and
//! emits an ordered list of classified [`Change`] records.
//!
//! # Passes
//!
//! 1. **Exact match**: identical key and signature, silently consumed.
//! 2. **Changed**: same key with a different signature, plus cross-kind
//!    changes sharing a name and package. HIGH confidence.
//! 3. **Renamed**: unique exact-signature correlation within one package
//!    and kind, guarded against trivial signatures. HIGH confidence.
//! 4. **Member correlation**: methods and fields follow their renamed
//!    receiver type. HIGH confidence.
//! 5. **Fuzzy match**: Levenshtein name similarity combined with
//!    multiset-Jaccard parameter overlap. MEDIUM confidence.
//! 6. **Leftovers**: whatever remains on the old side is removed. LOW
//!    confidence.

pub mod changes;
pub mod comparator;

pub use changes::{Change, ChangeKind, ChangeSpec, Confidence};
pub use comparator::diff_exports;
