//! # Manifest Discovery
//!
//! Walks a root directory depth-first and yields every directory that hosts
//! a manifest file, annotated with its kind.
//!
//! Ignored subtrees are pruned before descent: the ignore matcher is
//! consulted on each directory and a match prunes the whole subtree. `.git`
//! directories are always pruned. Entries are visited in sorted order so two
//! runs over the same tree produce the same log; downstream algorithms only
//! rely on the ordering for reproducible output, never for correctness.
//!
//! The manifest kind is discriminated by filename: `component.json` marks a
//! Component, `project.json` marks a Project. A directory carrying both
//! files is a configuration error that aborts discovery, since neither file
//! can be silently preferred over the other.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::ignore_rules::IgnoreMatcher;
use crate::manifest::{Manifest, ManifestKind, COMPONENT_MANIFEST, PROJECT_MANIFEST};

/// A discovered manifest directory.
///
/// Identity is the canonicalized directory path; two nodes are in a
/// containment relationship iff one's path is a strict ancestor of the
/// other's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    /// Canonicalized absolute path of the directory hosting the manifest.
    pub dir: PathBuf,
    /// Which manifest filename was found.
    pub kind: ManifestKind,
}

impl DirectoryNode {
    /// Full path of the manifest file inside this directory.
    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(self.kind.filename())
    }

    /// Load this node's manifest fresh from disk.
    pub fn load_manifest(&self) -> Result<Manifest> {
        Manifest::load(&self.manifest_path())
    }
}

/// Discover all manifest directories under `root`, honoring the root
/// `.gitignore`.
pub fn discover(root: &Path) -> Result<Vec<DirectoryNode>> {
    let root = fs::canonicalize(root)?;
    let matcher = IgnoreMatcher::load(&root)?;

    let walker = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if !entry.file_type().is_dir() || entry.depth() == 0 {
                return true;
            }
            if entry.file_name() == ".git" {
                return false;
            }
            !matcher.is_ignored(entry.path(), true)
        });

    let mut nodes = Vec::new();
    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let dir = entry.path();
        let has_component = dir.join(COMPONENT_MANIFEST).is_file();
        let has_project = dir.join(PROJECT_MANIFEST).is_file();

        let kind = match (has_component, has_project) {
            (true, true) => {
                return Err(Error::Validation {
                    path: dir.to_path_buf(),
                    message: format!(
                        "directory contains both {} and {}; remove one to resolve the ambiguity",
                        COMPONENT_MANIFEST, PROJECT_MANIFEST
                    ),
                });
            }
            (true, false) => ManifestKind::Component,
            (false, true) => ManifestKind::Project,
            (false, false) => continue,
        };

        debug!("discovered {} manifest at {}", kind, dir.display());
        nodes.push(DirectoryNode {
            dir: dir.to_path_buf(),
            kind,
        });
    }

    Ok(nodes)
}
