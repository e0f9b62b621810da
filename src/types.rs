//! Data models for extracted export symbols.
//!
//! These types represent the exported API surface of one module version:
//! a flat list of [`Symbol`] records plus a side table of structured
//! function signatures used for fuzzy parameter-overlap matching.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// What kind of exported declaration a symbol is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Type,
    Method,
    Field,
    Constant,
    Variable,
    Interface,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Type => "type",
            SymbolKind::Method => "method",
            SymbolKind::Field => "field",
            SymbolKind::Constant => "constant",
            SymbolKind::Variable => "variable",
            SymbolKind::Interface => "interface",
        }
    }
}

/// A single exported declaration captured by the extractor.
///
/// For methods and struct fields the name has the form `Type.Member` and
/// `receiver` carries the base type name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Fully-qualified package path, forward slashes only.
    pub package: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub receiver: String,
    /// Canonical signature string; empty for untyped constants/variables.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub signature: String,
}

impl Symbol {
    /// The identity key of this symbol within one module version.
    pub fn key(&self) -> SymbolKey {
        SymbolKey {
            package: self.package.clone(),
            kind: self.kind,
            name: self.name.clone(),
        }
    }
}

/// Composite identity key `(package, kind, name)` used by every index in
/// the diff engine.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolKey {
    pub package: String,
    pub kind: SymbolKind,
    pub name: String,
}

/// The full set of exports from one module version.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Symbols {
    pub module: String,
    #[serde(default)]
    pub version: String,
    pub entries: Vec<Symbol>,
}

/// Structured parameter and result type lists for a function or method.
///
/// Order and repetition matter; the diff engine treats the combined
/// `params` and `results` as a multiset for overlap scoring.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncSignature {
    pub params: Vec<String>,
    pub results: Vec<String>,
}

/// Structured function signatures keyed by symbol identity.
///
/// Built during extraction, consumed by the diff engine's fuzzy pass.
/// Populated only for [`SymbolKind::Function`] and [`SymbolKind::Method`].
pub type FuncSigMap = HashMap<SymbolKey, FuncSignature>;
