//! # Containment Tree Builder
//!
//! Embeds every descendant manifest into its ancestors' `components`
//! sequences based purely on filesystem ancestry.
//!
//! For a given node, every other discovered node whose path lies strictly
//! under the node's directory qualifies as a descendant, at any depth (a
//! child-of-child is embedded alongside the direct child). Each embedded
//! document is tagged with a `__file` attribute recording its manifest path
//! relative to the node's directory, forward-slash separated on every
//! platform.
//!
//! Kind validity is checked before anything is written: a Component node
//! with a Project-kind descendant fails aggregation for that node and its
//! file on disk stays untouched. The `components` sequence is rebuilt from
//! scratch on every run, which makes the operation idempotent but
//! destructive to manual edits of that field.
//!
//! `aggregate_all` processes deeper directories first so that a parent
//! always embeds its children's already-rebuilt documents.

use std::path::Path;

use log::info;
use serde_json::Value;

use crate::discover::DirectoryNode;
use crate::error::{Error, Result};
use crate::manifest::{ManifestKind, FILE_ATTR};

/// A path relative to `base`, joined with forward slashes.
pub fn relative_slash(path: &Path, base: &Path) -> Result<String> {
    let relative = path.strip_prefix(base).map_err(|_| Error::Validation {
        path: path.to_path_buf(),
        message: format!("path is not under {}", base.display()),
    })?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

/// The nodes strictly contained in `node`'s directory, in discovery order.
pub fn descendants<'a>(
    node: &DirectoryNode,
    all_nodes: &'a [DirectoryNode],
) -> Vec<&'a DirectoryNode> {
    all_nodes
        .iter()
        .filter(|d| d.dir != node.dir && d.dir.starts_with(&node.dir))
        .collect()
}

/// Rebuild `node`'s `components` sequence from the discovered set and
/// persist the manifest. Returns the number of embedded descendants.
pub fn aggregate(node: &DirectoryNode, all_nodes: &[DirectoryNode]) -> Result<usize> {
    let children = descendants(node, all_nodes);

    // Validate the whole descendant set before touching the manifest, so a
    // failure never leaves a partial rewrite behind.
    if node.kind == ManifestKind::Component {
        for child in &children {
            if child.kind == ManifestKind::Project {
                return Err(Error::Validation {
                    path: node.manifest_path(),
                    message: format!(
                        "component cannot include project {}",
                        child.manifest_path().display()
                    ),
                });
            }
        }
    }

    let mut embedded = Vec::with_capacity(children.len());
    for child in &children {
        let mut child_manifest = child.load_manifest()?;
        let rel = relative_slash(&child.manifest_path(), &node.dir)?;
        child_manifest.set(FILE_ATTR, Value::String(rel));
        embedded.push(child_manifest.to_value());
    }

    let count = embedded.len();
    let mut manifest = node.load_manifest()?;
    manifest.set_components(embedded);
    manifest.save(&node.manifest_path())?;
    info!(
        "aggregated {} descendant(s) into {}",
        count,
        node.manifest_path().display()
    );
    Ok(count)
}

/// Aggregate every discovered node, deepest directories first.
///
/// Per-node validation failures do not stop the run; each node's result is
/// returned alongside its index into `nodes` for reporting.
pub fn aggregate_all(nodes: &[DirectoryNode]) -> Vec<(usize, Result<usize>)> {
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(nodes[i].dir.components().count()));

    order
        .into_iter()
        .map(|i| (i, aggregate(&nodes[i], nodes)))
        .collect()
}
