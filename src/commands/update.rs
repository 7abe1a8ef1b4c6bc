//! # Update Command Implementation
//!
//! Runs the Repo Topology Manager over every discovered manifest directory:
//! manifests missing a `repository` field get a remote repository created,
//! a local git repository initialized and pushed, and a submodule link
//! registered in every qualifying ancestor.
//!
//! ## Behavior
//!
//! - **Connectivity pre-flight**: the hosting provider is checked before any
//!   processing; a failure aborts the entire run with a non-zero exit.
//! - **Tier filter**: `--filter-tier` restricts processing to Component
//!   manifests with a matching tier.
//! - **Label collection**: missing required labels are filled from `--tier`
//!   (for the tier) or prompted for interactively; with `--non-interactive`
//!   a directory with unresolved labels is reported and skipped.
//! - **Confirmation**: repository creation is confirmed per directory
//!   unless `--non-interactive` is set, which auto-accepts.
//!
//! Per-directory failures (creation rejected, push failed or timed out) are
//! reported and the run continues; they do not affect the exit code.

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::{Confirm, Input};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

use repoweave::config::{ProviderKind, Settings};
use repoweave::discover::{self, DirectoryNode};
use repoweave::labels;
use repoweave::manifest::ManifestKind;
use repoweave::output::{emoji, OutputConfig};
use repoweave::provider;
use repoweave::topology::{Outcome, TopologyManager};

/// Create missing repositories and wire submodule links
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Root directory to walk.
    #[arg(value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Hosting provider: `github` (gh CLI) or `gitea` (REST API).
    #[arg(long, value_name = "NAME", env = "REPOWEAVE_PROVIDER", default_value = "github")]
    pub provider: String,

    /// Browse-URL prefix of the hosting provider, e.g. `https://github.com`.
    #[arg(long, value_name = "URL", env = "REPOWEAVE_BASE_URL")]
    pub base_url: String,

    /// API root for the gitea provider, e.g. `https://gitea.example.com/api/v1`.
    #[arg(long, value_name = "URL", env = "REPOWEAVE_API_URL")]
    pub api_url: Option<String>,

    /// Admin token for the gitea provider.
    #[arg(long, value_name = "TOKEN", env = "REPOWEAVE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Organization new repositories are created under.
    #[arg(long, value_name = "ORG", env = "REPOWEAVE_ORG")]
    pub org: String,

    /// Primary branch pushed after initialization.
    #[arg(long, value_name = "BRANCH", default_value = "main")]
    pub branch: String,

    /// Timeout for the push step, in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 60)]
    pub push_timeout: u64,

    /// Only process Component manifests with this tier.
    #[arg(long, value_name = "TIER")]
    pub filter_tier: Option<String>,

    /// Tier value assigned to Component manifests that lack one.
    #[arg(long, value_name = "TIER")]
    pub tier: Option<String>,

    /// Run without prompts: missing labels skip the directory, repository
    /// creation is auto-accepted.
    #[arg(long)]
    pub non_interactive: bool,
}

/// Execute the `update` command.
pub fn execute(args: UpdateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let settings = Settings::new(
        ProviderKind::parse(&args.provider)?,
        args.base_url.clone(),
        args.api_url.clone(),
        args.token.clone(),
        args.org.clone(),
        args.branch.clone(),
        args.push_timeout,
    )?;
    let provider = provider::from_settings(&settings)?;

    // Pre-flight gate: nothing is touched unless the provider is reachable.
    println!(
        "{} Checking provider connectivity...",
        emoji(&out, "🌐", "[NET]")
    );
    provider
        .check_connectivity()
        .context("provider connectivity pre-flight failed")?;

    let root = fs::canonicalize(&args.root)?;
    println!(
        "{} Walking from: {}",
        emoji(&out, "📂", "[WALK]"),
        root.display()
    );

    let nodes = discover::discover(&root)?;
    let manager = TopologyManager::new(&settings, provider.as_ref(), &root, &nodes);

    let mut provisioned = 0;
    let mut skipped = 0;
    let mut failed = 0;

    for node in &nodes {
        if !selected_by_filter(node, &args) {
            continue;
        }

        if let Err(e) = prepare_labels(node, &args) {
            println!("{} {}", emoji(&out, "❌", "[ERR]"), e);
            skipped += 1;
            continue;
        }

        if !confirm_creation(node, &args, &out)? {
            println!(
                "{} Skipping repository creation for {}",
                emoji(&out, "❌", "[SKIP]"),
                node.manifest_path().display()
            );
            skipped += 1;
            continue;
        }

        match manager.process(node) {
            Ok(Outcome::Skipped { reason }) => {
                println!(
                    "{} Skipping {}: {}",
                    emoji(&out, "⚠️", "[WARN]"),
                    node.manifest_path().display(),
                    reason
                );
                skipped += 1;
            }
            Ok(Outcome::AlreadyProvisioned { url }) => {
                println!(
                    "{} {} already has repository {}",
                    emoji(&out, "ℹ️", "[INFO]"),
                    node.manifest_path().display(),
                    url
                );
            }
            Ok(Outcome::Provisioned { url, created, links }) => {
                if created {
                    println!("{} Created repository {}", emoji(&out, "✅", "[OK]"), url);
                } else {
                    println!(
                        "{} Reusing existing repository {}",
                        emoji(&out, "✅", "[OK]"),
                        url
                    );
                }
                if links.added > 0 || links.existing > 0 || links.rejected > 0 {
                    println!(
                        "{} Submodule links: {} added, {} already present, {} rejected",
                        emoji(&out, "🔗", "[LINK]"),
                        links.added,
                        links.existing,
                        links.rejected
                    );
                }
                provisioned += 1;
            }
            Err(e) => {
                // Scoped to this directory; the run continues.
                println!("{} {}", emoji(&out, "❌", "[ERR]"), e);
                failed += 1;
            }
        }
    }

    println!(
        "\n{} {} provisioned, {} skipped, {} failed",
        emoji(&out, "🎯", "[RESULT]"),
        provisioned,
        skipped,
        failed
    );

    Ok(())
}

fn selected_by_filter(node: &DirectoryNode, args: &UpdateArgs) -> bool {
    let Some(filter) = &args.filter_tier else {
        return true;
    };
    if node.kind != ManifestKind::Component {
        return false;
    }
    match node.load_manifest() {
        Ok(manifest) => labels::tier_matches(&manifest, filter),
        Err(_) => false,
    }
}

/// Fill in missing required labels before the topology manager runs: the
/// tier from `--tier` when given, anything else interactively. Remaining
/// gaps are left for the manager to report as a skip.
fn prepare_labels(node: &DirectoryNode, args: &UpdateArgs) -> Result<()> {
    let mut manifest = node.load_manifest()?;
    let mut changed = labels::coerce_tier(&mut manifest);

    for label in labels::missing_labels(&manifest, node.kind) {
        if label == "tier" {
            if let Some(tier) = &args.tier {
                manifest.set("tier", Value::String(tier.clone()));
                labels::coerce_tier(&mut manifest);
                changed = true;
                continue;
            }
        }
        if !args.non_interactive {
            let value: String = Input::new()
                .with_prompt(format!(
                    "{} is missing '{}'",
                    node.manifest_path().display(),
                    label
                ))
                .allow_empty(true)
                .interact_text()?;
            if !value.trim().is_empty() {
                manifest.set(label, Value::String(value));
                if label == "tier" {
                    labels::coerce_tier(&mut manifest);
                }
                changed = true;
            }
        }
    }

    if changed {
        manifest.save(&node.manifest_path())?;
    }
    Ok(())
}

/// Ask before creating a remote repository for a manifest that lacks one.
/// `--non-interactive` auto-accepts.
fn confirm_creation(node: &DirectoryNode, args: &UpdateArgs, out: &OutputConfig) -> Result<bool> {
    let manifest = node.load_manifest()?;
    if manifest.repository().is_some() || args.non_interactive {
        return Ok(true);
    }

    let prompt = format!(
        "{} {} is missing a repository. Create one and add it?",
        emoji(out, "❓", "[?]"),
        node.manifest_path().display()
    );
    Ok(Confirm::new().with_prompt(prompt).default(true).interact()?)
}
