//! Change records and the serialized change specification.

use serde::{Deserialize, Serialize};

/// Classification of a breaking API change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Renamed,
    SignatureChanged,
    TypeChanged,
    Removed,
    /// Reserved: declared for the wire format but never produced by this engine.
    PackageMoved,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Renamed => "renamed",
            ChangeKind::SignatureChanged => "signature_changed",
            ChangeKind::TypeChanged => "type_changed",
            ChangeKind::Removed => "removed",
            ChangeKind::PackageMoved => "package_moved",
        }
    }
}

/// How certain the engine is that a change is classified correctly.
///
/// Drives downstream remediation: HIGH changes are safe for mechanical
/// rewrites, MEDIUM need review, LOW are reported only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

/// A single breaking API change between two module versions.
///
/// `symbol` and `package` always identify the OLD-side symbol; `new_name`
/// is set only for renames and carries the NEW-side name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub kind: ChangeKind,
    pub symbol: String,
    pub package: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub old_signature: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub new_signature: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub new_name: String,
    /// Reserved for package-move detection; always empty in v1.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub new_package: String,
    pub confidence: Confidence,
}

/// The full set of breaking changes between two module versions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChangeSpec {
    pub module: String,
    pub old_version: String,
    pub new_version: String,
    pub changes: Vec<Change>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_kind_as_str() {
        assert_eq!(ChangeKind::Renamed.as_str(), "renamed");
        assert_eq!(ChangeKind::SignatureChanged.as_str(), "signature_changed");
        assert_eq!(ChangeKind::TypeChanged.as_str(), "type_changed");
        assert_eq!(ChangeKind::Removed.as_str(), "removed");
        assert_eq!(ChangeKind::PackageMoved.as_str(), "package_moved");
    }

    #[test]
    fn test_confidence_as_str() {
        assert_eq!(Confidence::High.as_str(), "high");
        assert_eq!(Confidence::Medium.as_str(), "medium");
        assert_eq!(Confidence::Low.as_str(), "low");
    }

    #[test]
    fn test_change_serialization_omits_empty_fields() {
        let change = Change {
            kind: ChangeKind::Removed,
            symbol: "OldFunc".to_string(),
            package: "github.com/acme/mod".to_string(),
            old_signature: "(int) error".to_string(),
            new_signature: String::new(),
            new_name: String::new(),
            new_package: String::new(),
            confidence: Confidence::Low,
        };

        let json = serde_json::to_string(&change).unwrap();
        assert!(json.contains("\"kind\":\"removed\""));
        assert!(json.contains("\"confidence\":\"low\""));
        assert!(json.contains("\"old_signature\":\"(int) error\""));
        assert!(!json.contains("new_signature"));
        assert!(!json.contains("new_name"));
        assert!(!json.contains("new_package"));
    }

    #[test]
    fn test_change_spec_roundtrip() {
        let spec = ChangeSpec {
            module: "github.com/acme/mod".to_string(),
            old_version: "v1.2.3".to_string(),
            new_version: "v2.0.0".to_string(),
            changes: vec![Change {
                kind: ChangeKind::Renamed,
                symbol: "OldName".to_string(),
                package: "github.com/acme/mod".to_string(),
                old_signature: "(int) error".to_string(),
                new_signature: "(int) error".to_string(),
                new_name: "NewName".to_string(),
                new_package: String::new(),
                confidence: Confidence::High,
            }],
        };

        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"old_version\":\"v1.2.3\""));

        let back: ChangeSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back.changes.len(), 1);
        assert_eq!(back.changes[0].new_name, "NewName");
        assert!(back.changes[0].new_package.is_empty());
    }
}
