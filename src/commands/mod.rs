//! # CLI Command Implementations
//!
//! One module per subcommand. Each module defines a clap `Args` struct and
//! an `execute` function that orchestrates the corresponding library
//! operations.
//!
//! Exit-code policy: `validate` exits non-zero when any manifest fails its
//! check. `walk` and `update` report per-directory failures but exit zero;
//! only a total-run failure (such as the provider connectivity pre-flight)
//! produces a non-zero exit.

pub mod update;
pub mod validate;
pub mod walk;
