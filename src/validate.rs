//! # Repository Field Validation
//!
//! Cross-checks that every discovered manifest carries a repository
//! reference matching the configured URL-prefix convention. Read-only: no
//! manifest is mutated.
//!
//! Every node is checked and reported individually; the check never
//! short-circuits on the first failure, so a single run enumerates all
//! offenders.

use std::path::PathBuf;

use crate::discover::DirectoryNode;

/// Result of checking one manifest's repository reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    /// Present and prefix-matched.
    Ok { url: String },
    /// Neither `repository` nor the legacy `repo` field is set.
    Missing,
    /// Present but outside the configured prefix.
    Mismatch { url: String },
    /// The manifest could not be read at all.
    Unreadable { message: String },
}

/// One manifest's check outcome, for per-line reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCheck {
    pub manifest_path: PathBuf,
    pub result: CheckResult,
}

impl NodeCheck {
    pub fn passed(&self) -> bool {
        matches!(self.result, CheckResult::Ok { .. })
    }
}

/// Check every node's repository reference against `prefix`.
pub fn check_repositories(nodes: &[DirectoryNode], prefix: &str) -> Vec<NodeCheck> {
    nodes
        .iter()
        .map(|node| {
            let manifest_path = node.manifest_path();
            let result = match node.load_manifest() {
                Err(e) => CheckResult::Unreadable {
                    message: e.to_string(),
                },
                Ok(manifest) => match manifest.repository() {
                    None => CheckResult::Missing,
                    Some(url) if url.starts_with(prefix) => CheckResult::Ok {
                        url: url.to_string(),
                    },
                    Some(url) => CheckResult::Mismatch {
                        url: url.to_string(),
                    },
                },
            };
            NodeCheck {
                manifest_path,
                result,
            }
        })
        .collect()
}

/// Overall success: true iff every node passed.
pub fn all_valid(checks: &[NodeCheck]) -> bool {
    checks.iter().all(NodeCheck::passed)
}
