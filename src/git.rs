//! # Git Collaborator
//!
//! Thin wrapper over the system `git` command, covering exactly the subset
//! the topology manager needs: init, stage, commit, remote wiring, push with
//! a timeout, and submodule registration.
//!
//! Using the system git means SSH keys, credential helpers, and everything
//! else in the user's `~/.gitconfig` work without any handling here.
//!
//! Idempotency no-ops are first-class outcomes, not errors: "nothing to
//! commit" and "submodule already present" are reported as such so callers
//! can log them and continue as if the step succeeded.

use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use log::debug;

use crate::error::{Error, Result};

/// Outcome of a commit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new commit was created.
    Committed,
    /// The tree was already clean. Not an error.
    NothingToCommit,
}

/// Outcome of a push attempt that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The branch reached the remote.
    Pushed,
    /// The deadline elapsed; the push was killed and abandoned.
    TimedOut,
}

/// Outcome of a submodule registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmoduleOutcome {
    /// A new submodule entry was added to the working tree.
    Added,
    /// The path is already registered. Not an error.
    AlreadyPresent,
}

/// Whether `dir` already carries local repository metadata.
pub fn is_repo(dir: &Path) -> bool {
    dir.join(".git").exists()
}

/// Initialize a repository in `dir`.
pub fn init(dir: &Path) -> Result<()> {
    run_checked(dir, &["init"])?;
    Ok(())
}

/// Stage every file under `dir`.
pub fn add_all(dir: &Path) -> Result<()> {
    run_checked(dir, &["add", "."])?;
    Ok(())
}

/// Whether the working tree has uncommitted changes (staged or not).
pub fn is_dirty(dir: &Path) -> Result<bool> {
    let output = run_checked(dir, &["status", "--porcelain"])?;
    Ok(!output.stdout.is_empty())
}

/// Commit staged changes. A clean tree yields `NothingToCommit`.
pub fn commit(dir: &Path, message: &str) -> Result<CommitOutcome> {
    let output = run(dir, &["commit", "-m", message])?;
    if output.status.success() {
        return Ok(CommitOutcome::Committed);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if stdout.contains("nothing to commit") || stderr.contains("nothing to commit") {
        return Ok(CommitOutcome::NothingToCommit);
    }

    Err(command_error(dir, &["commit", "-m", message], &output))
}

/// Point `origin` at `url`, creating the remote if absent and updating it in
/// place otherwise.
pub fn set_remote(dir: &Path, url: &str) -> Result<()> {
    let existing = run(dir, &["remote", "get-url", "origin"])?;
    if existing.status.success() {
        run_checked(dir, &["remote", "set-url", "origin", url])?;
    } else {
        run_checked(dir, &["remote", "add", "origin", url])?;
    }
    Ok(())
}

/// Rename the current branch to `branch` and push it upstream, abandoning
/// the push after `timeout`.
pub fn push(dir: &Path, branch: &str, timeout: Duration) -> Result<PushOutcome> {
    run_checked(dir, &["branch", "-M", branch])?;

    let mut child = Command::new("git")
        .args(["push", "-u", "origin", branch])
        .current_dir(dir)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::GitCommand {
            command: format!("push -u origin {}", branch),
            dir: dir.to_path_buf(),
            stderr: e.to_string(),
        })?;

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait()? {
            Some(status) => {
                let output = child.wait_with_output()?;
                if status.success() {
                    return Ok(PushOutcome::Pushed);
                }
                return Err(Error::GitCommand {
                    command: format!("push -u origin {}", branch),
                    dir: dir.to_path_buf(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }
            None if Instant::now() >= deadline => {
                // Abandon the push; the operation is not retried.
                let _ = child.kill();
                let _ = child.wait();
                return Ok(PushOutcome::TimedOut);
            }
            None => std::thread::sleep(Duration::from_millis(100)),
        }
    }
}

/// Register `url` as a submodule of `dir` at `relative_path`.
///
/// Already-registered paths are detected through the `.gitmodules` registry
/// before invoking git, so reprocessing never duplicates an entry.
pub fn add_submodule(dir: &Path, url: &str, relative_path: &str) -> Result<SubmoduleOutcome> {
    if submodule_paths(dir)?.iter().any(|p| p == relative_path) {
        return Ok(SubmoduleOutcome::AlreadyPresent);
    }

    // The ancestor's own initial `git add .` may have staged the child's
    // files as plain tree entries; those must leave the index before the
    // path can become a gitlink.
    run_checked(
        dir,
        &["rm", "-r", "--cached", "--ignore-unmatch", "--quiet", "--", relative_path],
    )?;

    let output = run(dir, &["submodule", "add", url, relative_path])?;
    if output.status.success() {
        return Ok(SubmoduleOutcome::Added);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.contains("already exists in the index") {
        return Ok(SubmoduleOutcome::AlreadyPresent);
    }
    // git refuses paths that lie inside a registered submodule; the ancestor
    // already tracks that subtree through the intermediate entry.
    if stderr.contains("is in submodule") {
        return Ok(SubmoduleOutcome::AlreadyPresent);
    }

    Err(command_error(dir, &["submodule", "add", url, relative_path], &output))
}

/// The submodule paths registered in `dir`'s `.gitmodules`, if any.
pub fn submodule_paths(dir: &Path) -> Result<Vec<String>> {
    if !dir.join(".gitmodules").exists() {
        return Ok(Vec::new());
    }

    let output = run(
        dir,
        &["config", "-f", ".gitmodules", "--get-regexp", r"^submodule\..*\.path$"],
    )?;
    if !output.status.success() {
        // get-regexp exits non-zero when nothing matches
        return Ok(Vec::new());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout
        .lines()
        .filter_map(|line| line.split_once(' ').map(|(_, path)| path.to_string()))
        .collect())
}

fn run(dir: &Path, args: &[&str]) -> Result<Output> {
    debug!("git {} (in {})", args.join(" "), dir.display());
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| Error::GitCommand {
            command: args.join(" "),
            dir: dir.to_path_buf(),
            stderr: e.to_string(),
        })
}

fn run_checked(dir: &Path, args: &[&str]) -> Result<Output> {
    let output = run(dir, args)?;
    if !output.status.success() {
        return Err(command_error(dir, args, &output));
    }
    Ok(output)
}

fn command_error(dir: &Path, args: &[&str], output: &Output) -> Error {
    Error::GitCommand {
        command: args.join(" "),
        dir: dir.to_path_buf(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}
