//! # Repoweave Library
//!
//! Core functionality for the `repoweave` command-line tool: discovering
//! per-directory manifest files in a monorepo-like tree, aggregating them
//! into a containment view, and automating the promotion of each unit into
//! its own git repository wired back into its ancestors as a submodule.
//!
//! ## Core Concepts
//!
//! - **Manifests (`manifest`)**: per-directory JSON descriptors
//!   (`component.json` / `project.json`) of buildable units. Documents are
//!   ordered maps; unknown fields round-trip untouched.
//! - **Discovery (`discover`)**: depth-first walk of the tree yielding every
//!   manifest directory, pruning subtrees matched by the root `.gitignore`
//!   (`ignore_rules`).
//! - **Containment Tree (`tree`)**: embeds every descendant manifest into
//!   its ancestors' `components` sequences, enforcing that a Component never
//!   contains a Project.
//! - **Topology (`topology`)**: per-directory state machine that creates the
//!   remote repository through a hosting provider (`provider`), brings up
//!   the local repository (`git`), and registers the unit as a submodule of
//!   every qualifying ancestor.
//! - **Validation (`labels`, `validate`)**: required-label checks ahead of
//!   automation, and the read-only repository-prefix audit.
//!
//! ## Execution Flow
//!
//! The CLI dispatches three commands over the same discovery pass:
//!
//! 1. `walk` runs the Containment Tree Builder over all discovered nodes.
//! 2. `update` runs the Repo Topology Manager, gated by a provider
//!    connectivity pre-flight.
//! 3. `validate` runs the repository-prefix audit and sets the exit code.
//!
//! Everything is strictly sequential: one manifest directory is fully
//! processed before the next begins, and per-directory failures never
//! propagate past the directory boundary.

pub mod config;
pub mod discover;
pub mod error;
pub mod git;
pub mod ignore_rules;
pub mod labels;
pub mod manifest;
pub mod output;
pub mod provider;
pub mod topology;
pub mod tree;
pub mod validate;
