//! # Walk Command Implementation
//!
//! Runs the Containment Tree Builder over every discovered manifest: each
//! manifest's `components` sequence is rebuilt from the manifests nested
//! under it and persisted.
//!
//! Per-directory validation failures (a Component containing a Project) are
//! reported and skipped; the run continues and exits zero. Only a failure
//! that prevents discovery itself (unreadable root, ambiguous manifest
//! directory) aborts the command.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use repoweave::discover;
use repoweave::output::{emoji, OutputConfig};
use repoweave::tree;

/// Embed nested manifests into each ancestor's components list
#[derive(Args, Debug)]
pub struct WalkArgs {
    /// Root directory to walk.
    #[arg(value_name = "DIR", default_value = ".")]
    pub root: PathBuf,
}

/// Execute the `walk` command.
pub fn execute(args: WalkArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    println!(
        "{} Walking manifests under {}",
        emoji(&out, "📂", "[WALK]"),
        args.root.display()
    );

    let nodes = discover::discover(&args.root)?;
    if nodes.is_empty() {
        println!("{} No manifest directories found", emoji(&out, "ℹ️", "[INFO]"));
        return Ok(());
    }

    let mut updated = 0;
    let mut skipped = 0;

    for (index, result) in tree::aggregate_all(&nodes) {
        let node = &nodes[index];
        match result {
            Ok(count) => {
                println!(
                    "{} Updated {} ({} nested)",
                    emoji(&out, "✅", "[OK]"),
                    node.manifest_path().display(),
                    count
                );
                updated += 1;
            }
            Err(e) => {
                println!(
                    "{} Skipping due to validation: {}",
                    emoji(&out, "❌", "[ERR]"),
                    e
                );
                skipped += 1;
            }
        }
    }

    println!(
        "\n{} {} manifest(s) updated, {} skipped",
        emoji(&out, "🎯", "[RESULT]"),
        updated,
        skipped
    );

    Ok(())
}
