//! # Repo Topology Manager
//!
//! Drives one manifest directory at a time through the automation states
//! NoRepo -> RepoPending -> RepoCreated -> Pushed -> SubmodulesLinked:
//! create the remote repository through the hosting provider, persist the
//! `repository` field, bring up the local git repository and push it, then
//! walk upward through every ancestor manifest directory registering the new
//! repository as a submodule.
//!
//! The ancestor walk is nearest-first and never stops at the first success:
//! every qualifying ancestor between the directory and the walk root gets
//! the link. A kind-incompatible ancestor (nesting a non-Component under a
//! Component) rejects that one link and the walk continues upward. An
//! already-registered submodule path is skipped, and the walk still
//! continues, so reprocessing is idempotent end to end.
//!
//! An existing `repository` field is never overwritten; the directory is
//! reported as already provisioned and no create call is made.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};

use crate::config::Settings;
use crate::discover::DirectoryNode;
use crate::error::{Error, Result};
use crate::git;
use crate::labels;
use crate::manifest::ManifestKind;
use crate::provider::{CreateOutcome, HostingProvider};
use crate::tree::relative_slash;

/// What happened to one manifest directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Preconditions not met; the directory was reported and left alone.
    Skipped { reason: String },
    /// The `repository` field was already set; nothing was created.
    AlreadyProvisioned { url: String },
    /// The full state machine ran to SubmodulesLinked.
    Provisioned {
        url: String,
        /// False when the provider reported the repository already existed.
        created: bool,
        links: LinkStats,
    },
}

/// Tally of the ancestor walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Submodule entries newly added to ancestors.
    pub added: usize,
    /// Ancestors that already carried the entry.
    pub existing: usize,
    /// Ancestor links rejected by the kind-compatibility rule.
    pub rejected: usize,
}

/// Sequential, per-directory repository automation.
pub struct TopologyManager<'a> {
    settings: &'a Settings,
    provider: &'a dyn HostingProvider,
    root: PathBuf,
    kinds: HashMap<PathBuf, ManifestKind>,
}

impl<'a> TopologyManager<'a> {
    /// Build a manager over the discovered node set. `root` bounds the
    /// ancestor walk.
    pub fn new(
        settings: &'a Settings,
        provider: &'a dyn HostingProvider,
        root: &Path,
        nodes: &[DirectoryNode],
    ) -> Self {
        let kinds = nodes
            .iter()
            .map(|n| (n.dir.clone(), n.kind))
            .collect::<HashMap<_, _>>();
        Self {
            settings,
            provider,
            root: root.to_path_buf(),
            kinds,
        }
    }

    /// Run the state machine for one directory.
    ///
    /// Errors returned here are scoped to this directory; the caller reports
    /// them and continues with the next one.
    pub fn process(&self, node: &DirectoryNode) -> Result<Outcome> {
        let mut manifest = node.load_manifest()?;

        if labels::coerce_tier(&mut manifest) {
            manifest.save(&node.manifest_path())?;
        }

        let missing = labels::missing_labels(&manifest, node.kind);
        if !missing.is_empty() {
            return Ok(Outcome::Skipped {
                reason: format!("missing required label(s): {}", missing.join(", ")),
            });
        }

        // An existing repository reference is stable; only a missing one is
        // ever filled in.
        if let Some(url) = manifest.repository() {
            return Ok(Outcome::AlreadyProvisioned {
                url: url.to_string(),
            });
        }

        // missing_labels guarantees presence, not type; a numeric code is
        // present but unusable as a repository name.
        let code = match manifest.code() {
            Some(code) => code.to_string(),
            None => {
                return Err(Error::Validation {
                    path: node.manifest_path(),
                    message: "the 'code' field must be a string".to_string(),
                })
            }
        };

        // RepoPending -> RepoCreated
        let create = self.provider.create_repository(&code)?;
        let created = matches!(create, CreateOutcome::Created(_));
        let url = create.url().to_string();
        if !created {
            info!("repository for '{}' already exists, reusing {}", code, url);
        }

        manifest.set_repository(&url);
        manifest.save(&node.manifest_path())?;

        // RepoCreated -> Pushed
        self.push_local(node, &url)?;

        // Pushed -> SubmodulesLinked
        let links = self.link_ancestors(node, &code, &url)?;

        Ok(Outcome::Provisioned { url, created, links })
    }

    fn push_local(&self, node: &DirectoryNode, url: &str) -> Result<()> {
        let dir = &node.dir;
        if !git::is_repo(dir) {
            info!("initializing git repository in {}", dir.display());
            git::init(dir)?;
        }

        git::add_all(dir)?;
        if git::is_dirty(dir)? {
            match git::commit(dir, "Initial commit")? {
                git::CommitOutcome::Committed => {}
                git::CommitOutcome::NothingToCommit => {
                    info!("nothing to commit in {}", dir.display());
                }
            }
        } else {
            info!("tree already clean in {}", dir.display());
        }

        git::set_remote(dir, url)?;

        let timeout = Duration::from_secs(self.settings.push_timeout_secs);
        match git::push(dir, &self.settings.branch, timeout)? {
            git::PushOutcome::Pushed => Ok(()),
            git::PushOutcome::TimedOut => Err(Error::PushTimeout {
                dir: dir.clone(),
                seconds: self.settings.push_timeout_secs,
            }),
        }
    }

    fn link_ancestors(&self, node: &DirectoryNode, code: &str, url: &str) -> Result<LinkStats> {
        let mut stats = LinkStats::default();

        for ancestor in node.dir.ancestors().skip(1) {
            if !ancestor.starts_with(&self.root) {
                break;
            }
            let Some(ancestor_kind) = self.kinds.get(ancestor) else {
                continue;
            };

            // A Component boundary only accepts Component submodules. The
            // rejection is per-ancestor; the walk keeps climbing.
            if *ancestor_kind == ManifestKind::Component && node.kind != ManifestKind::Component {
                warn!(
                    "not linking {} '{}' under component boundary {}",
                    node.kind,
                    code,
                    ancestor.display()
                );
                stats.rejected += 1;
                continue;
            }

            if !git::is_repo(ancestor) {
                warn!(
                    "ancestor {} has no git repository yet, skipping link",
                    ancestor.display()
                );
                continue;
            }

            let rel = relative_slash(&node.dir, ancestor)?;
            match git::add_submodule(ancestor, url, &rel)? {
                git::SubmoduleOutcome::Added => {
                    // submodule add already staged .gitmodules and the gitlink
                    git::commit(ancestor, &format!("Add {} as submodule", code))?;
                    info!("linked '{}' into {}", code, ancestor.display());
                    stats.added += 1;
                }
                git::SubmoduleOutcome::AlreadyPresent => {
                    info!(
                        "'{}' already registered in {}, skipping",
                        code,
                        ancestor.display()
                    );
                    stats.existing += 1;
                }
            }
        }

        Ok(stats)
    }
}
