//! # Manifest Store
//!
//! Load, inspect, mutate, and persist per-directory manifest documents.
//!
//! A manifest is a JSON object keyed by string fields. Only a handful of
//! fields carry meaning for this tool (`code`, `name`, `tier`, `repository`,
//! `components`, `__file`); everything else is preserved verbatim across a
//! load/save round trip, including key order (`serde_json` is built with
//! `preserve_order`).
//!
//! The manifest kind is not a stored field: it is derived from which of the
//! two recognized filenames is present in the directory.

use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Filename marking a directory as a Component unit.
pub const COMPONENT_MANIFEST: &str = "component.json";
/// Filename marking a directory as a Project aggregation root.
pub const PROJECT_MANIFEST: &str = "project.json";

/// The embedded-child path attribute added during aggregation.
pub const FILE_ATTR: &str = "__file";

/// What kind of buildable unit a manifest describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// A leaf or intermediate buildable unit. Requires a tier.
    Component,
    /// A top-level aggregation root. Never nested inside a Component.
    Project,
}

impl ManifestKind {
    /// The manifest filename carrying this kind.
    pub fn filename(&self) -> &'static str {
        match self {
            Self::Component => COMPONENT_MANIFEST,
            Self::Project => PROJECT_MANIFEST,
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component => write!(f, "component"),
            Self::Project => write!(f, "project"),
        }
    }
}

/// An ordered manifest document.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    fields: Map<String, Value>,
}

impl Manifest {
    /// Wrap an existing JSON object.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Load and parse a manifest file. The document must be a JSON object.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|e| Error::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(Error::Manifest {
                path: path.to_path_buf(),
                message: format!("expected a JSON object, found {}", json_type_name(&other)),
            }),
        }
    }

    /// Persist the manifest as pretty-printed JSON with a trailing newline.
    ///
    /// The document is rendered fully before the write, so a serialization
    /// failure never leaves a partially written file behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        let rendered = self.to_pretty_string()?;
        fs::write(path, rendered)?;
        Ok(())
    }

    /// Render the manifest the way `save` writes it.
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut rendered = serde_json::to_string_pretty(&Value::Object(self.fields.clone()))?;
        rendered.push('\n');
        Ok(rendered)
    }

    /// The manifest as a plain JSON value, for embedding into a parent.
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Look up an arbitrary field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set an arbitrary field, appending it if new.
    pub fn set(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_string(), value);
    }

    /// The unit's short unique identifier.
    pub fn code(&self) -> Option<&str> {
        self.fields.get("code").and_then(Value::as_str)
    }

    /// The unit's human-readable name.
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    /// The tier classification, if any. May be a number or a string.
    pub fn tier(&self) -> Option<&Value> {
        self.fields.get("tier")
    }

    /// The remote repository reference. The legacy `repo` field name is
    /// accepted as a synonym, with `repository` taking precedence.
    pub fn repository(&self) -> Option<&str> {
        self.fields
            .get("repository")
            .or_else(|| self.fields.get("repo"))
            .and_then(Value::as_str)
    }

    /// Record the remote repository reference under the modern field name.
    pub fn set_repository(&mut self, url: &str) {
        self.fields
            .insert("repository".to_string(), Value::String(url.to_string()));
    }

    /// Replace the embedded `components` sequence.
    pub fn set_components(&mut self, components: Vec<Value>) {
        self.fields
            .insert("components".to_string(), Value::Array(components));
    }

    /// The embedded `components` sequence, if the manifest was aggregated.
    pub fn components(&self) -> Option<&Vec<Value>> {
        self.fields.get("components").and_then(Value::as_array)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_save_round_trip_preserves_unknown_fields_and_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(COMPONENT_MANIFEST);
        let original = "{\n  \"zeta\": 1,\n  \"code\": \"api\",\n  \"custom\": {\n    \"nested\": [\n      true\n    ]\n  },\n  \"alpha\": \"last\"\n}\n";
        fs::write(&path, original).unwrap();

        let manifest = Manifest::load(&path).unwrap();
        manifest.save(&path).unwrap();

        let rewritten = fs::read_to_string(&path).unwrap();
        assert_eq!(rewritten, original);
    }

    #[test]
    fn test_load_rejects_non_object() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(COMPONENT_MANIFEST);
        fs::write(&path, "[1, 2, 3]\n").unwrap();

        let err = Manifest::load(&path).unwrap_err();
        assert!(err.to_string().contains("expected a JSON object"));
    }

    #[test]
    fn test_repository_accepts_legacy_field_name() {
        let mut fields = Map::new();
        fields.insert(
            "repo".to_string(),
            Value::String("https://github.com/org/api".to_string()),
        );
        let manifest = Manifest::from_map(fields);
        assert_eq!(manifest.repository(), Some("https://github.com/org/api"));
    }

    #[test]
    fn test_repository_prefers_modern_field_name() {
        let mut fields = Map::new();
        fields.insert("repo".to_string(), Value::String("legacy".to_string()));
        fields.insert("repository".to_string(), Value::String("modern".to_string()));
        let manifest = Manifest::from_map(fields);
        assert_eq!(manifest.repository(), Some("modern"));
    }

    #[test]
    fn test_set_repository_uses_modern_field_name() {
        let mut manifest = Manifest::from_map(Map::new());
        manifest.set_repository("https://github.com/org/api");
        assert_eq!(
            manifest.get("repository").and_then(Value::as_str),
            Some("https://github.com/org/api")
        );
        assert!(manifest.get("repo").is_none());
    }

    #[test]
    fn test_set_components_replaces_previous_value() {
        let mut manifest = Manifest::from_map(Map::new());
        manifest.set_components(vec![Value::String("old".to_string())]);
        manifest.set_components(vec![]);
        assert_eq!(manifest.components().map(Vec::len), Some(0));
    }

    #[test]
    fn test_kind_filenames() {
        assert_eq!(ManifestKind::Component.filename(), "component.json");
        assert_eq!(ManifestKind::Project.filename(), "project.json");
        assert_eq!(ManifestKind::Component.to_string(), "component");
    }
}
