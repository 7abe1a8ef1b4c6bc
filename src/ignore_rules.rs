//! Gitignore-based subtree pruning for manifest discovery.
//!
//! Wraps the `ignore` crate's `Gitignore` matcher around the `.gitignore`
//! file at the walk root. Patterns are matched against paths relative to that
//! root with standard gitignore semantics (`**`, trailing slash for
//! directories, negation). A missing `.gitignore` produces a matcher that
//! ignores nothing.

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::{Error, Result};

/// Predicate answering "is this path ignored?" for paths under the root.
pub struct IgnoreMatcher {
    matcher: Gitignore,
}

impl IgnoreMatcher {
    /// Load the `.gitignore` at `root`, if any.
    pub fn load(root: &Path) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        let gitignore = root.join(".gitignore");
        if gitignore.is_file() {
            // add() returns a partial-failure error; bad lines are fatal here
            // so broken patterns never silently widen the walk.
            if let Some(err) = builder.add(&gitignore) {
                return Err(Error::Ignore {
                    message: err.to_string(),
                });
            }
        }
        let matcher = builder.build().map_err(|e| Error::Ignore {
            message: e.to_string(),
        })?;
        Ok(Self { matcher })
    }

    /// Whether `path` (absolute or root-relative) is ignored. Negated
    /// patterns (whitelists) are honored.
    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        self.matcher.matched(path, is_dir).is_ignore()
    }
}
