//! # Label Validation
//!
//! Required-field checks for manifests ahead of repository automation.
//!
//! Both kinds require `code` and `name`; Components additionally require a
//! `tier` classification. Tier values written as numeric-looking strings
//! (a common hand-editing artifact) are coerced to JSON integers so that
//! tier filters compare consistently.

use serde_json::Value;

use crate::manifest::{Manifest, ManifestKind};

/// Label names required for a manifest of the given kind.
pub fn required_labels(kind: ManifestKind) -> &'static [&'static str] {
    match kind {
        ManifestKind::Component => &["code", "name", "tier"],
        ManifestKind::Project => &["code", "name"],
    }
}

/// The required labels absent from `manifest`, in declaration order.
///
/// A label counts as present when the field exists, is non-null, and (for
/// string fields) is non-empty.
pub fn missing_labels(manifest: &Manifest, kind: ManifestKind) -> Vec<&'static str> {
    required_labels(kind)
        .iter()
        .filter(|label| !is_present(manifest.get(label)))
        .copied()
        .collect()
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Coerce a numeric-looking string `tier` into a JSON integer.
///
/// Returns true when the manifest was changed.
pub fn coerce_tier(manifest: &mut Manifest) -> bool {
    let coerced = match manifest.tier() {
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match coerced {
        Some(n) => {
            manifest.set("tier", Value::from(n));
            true
        }
        None => false,
    }
}

/// Whether a manifest's tier matches a filter value.
///
/// The comparison tolerates the integer/string representation mismatch in
/// either direction.
pub fn tier_matches(manifest: &Manifest, filter: &str) -> bool {
    match manifest.tier() {
        Some(Value::String(s)) => s.trim() == filter,
        Some(Value::Number(n)) => n.to_string() == filter.trim(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn manifest(json: &str) -> Manifest {
        match serde_json::from_str(json).unwrap() {
            Value::Object(fields) => Manifest::from_map(fields),
            _ => Manifest::from_map(Map::new()),
        }
    }

    #[test]
    fn test_required_labels_per_kind() {
        assert_eq!(
            required_labels(ManifestKind::Component),
            &["code", "name", "tier"]
        );
        assert_eq!(required_labels(ManifestKind::Project), &["code", "name"]);
    }

    #[test]
    fn test_missing_labels_complete_component() {
        let m = manifest(r#"{"code": "api", "name": "API", "tier": 1}"#);
        assert!(missing_labels(&m, ManifestKind::Component).is_empty());
    }

    #[test]
    fn test_missing_labels_reports_absent_and_empty_fields() {
        let m = manifest(r#"{"code": "", "name": null}"#);
        assert_eq!(
            missing_labels(&m, ManifestKind::Component),
            vec!["code", "name", "tier"]
        );
    }

    #[test]
    fn test_project_does_not_require_tier() {
        let m = manifest(r#"{"code": "root", "name": "Root"}"#);
        assert!(missing_labels(&m, ManifestKind::Project).is_empty());
    }

    #[test]
    fn test_coerce_tier_numeric_string() {
        let mut m = manifest(r#"{"tier": " 2 "}"#);
        assert!(coerce_tier(&mut m));
        assert_eq!(m.tier(), Some(&Value::from(2)));
    }

    #[test]
    fn test_coerce_tier_leaves_categorical_values() {
        let mut m = manifest(r#"{"tier": "unassigned"}"#);
        assert!(!coerce_tier(&mut m));
        assert_eq!(m.tier(), Some(&Value::String("unassigned".to_string())));
    }

    #[test]
    fn test_coerce_tier_leaves_numbers() {
        let mut m = manifest(r#"{"tier": 3}"#);
        assert!(!coerce_tier(&mut m));
    }

    #[test]
    fn test_tier_matches_across_representations() {
        assert!(tier_matches(&manifest(r#"{"tier": 1}"#), "1"));
        assert!(tier_matches(&manifest(r#"{"tier": "1"}"#), "1"));
        assert!(tier_matches(&manifest(r#"{"tier": "unassigned"}"#), "unassigned"));
        assert!(!tier_matches(&manifest(r#"{"tier": 2}"#), "1"));
        assert!(!tier_matches(&manifest(r#"{}"#), "1"));
    }
}
