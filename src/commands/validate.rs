//! # Validate Command Implementation
//!
//! Read-only audit of every discovered manifest's repository reference
//! against the configured URL-prefix convention. Every manifest gets its own
//! report line; the command never stops at the first failure.
//!
//! The exit code reflects the aggregate result: non-zero iff at least one
//! manifest fails.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use repoweave::discover;
use repoweave::output::{emoji, OutputConfig};
use repoweave::validate::{check_repositories, CheckResult};

/// Check repository references against the URL-prefix convention
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Root directory to walk.
    #[arg(value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Browse-URL prefix of the hosting provider, e.g. `https://github.com`.
    #[arg(long, value_name = "URL", env = "REPOWEAVE_BASE_URL")]
    pub base_url: String,

    /// Organization every repository must live under.
    #[arg(long, value_name = "ORG", env = "REPOWEAVE_ORG")]
    pub org: String,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let prefix = format!("{}/{}/", args.base_url.trim_end_matches('/'), args.org);

    println!(
        "{} Validating repository references against {}",
        emoji(&out, "🔍", "[SCAN]"),
        prefix
    );

    let nodes = discover::discover(&args.root)?;
    let checks = check_repositories(&nodes, &prefix);

    let mut failures = 0;
    for check in &checks {
        match &check.result {
            CheckResult::Ok { .. } => {
                println!(
                    "{} {} repository OK",
                    emoji(&out, "✅", "[OK]"),
                    check.manifest_path.display()
                );
            }
            CheckResult::Missing => {
                println!(
                    "{} {} missing repository field",
                    emoji(&out, "❌", "[ERR]"),
                    check.manifest_path.display()
                );
                failures += 1;
            }
            CheckResult::Mismatch { url } => {
                println!(
                    "{} {} repository '{}' does not match prefix {}",
                    emoji(&out, "❌", "[ERR]"),
                    check.manifest_path.display(),
                    url,
                    prefix
                );
                failures += 1;
            }
            CheckResult::Unreadable { message } => {
                println!(
                    "{} {} unreadable: {}",
                    emoji(&out, "❌", "[ERR]"),
                    check.manifest_path.display(),
                    message
                );
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!(
            "{} of {} manifest(s) failed repository validation",
            failures,
            checks.len()
        );
    }

    println!(
        "\n{} All {} manifest(s) passed",
        emoji(&out, "🎯", "[RESULT]"),
        checks.len()
    );
    Ok(())
}
