//! # Tool Configuration
//!
//! Explicit configuration for repoweave, constructed once at process start
//! and passed by reference into the topology manager and the hosting-provider
//! adapter. There is no ambient global configuration state.
//!
//! Values come from environment variables (`REPOWEAVE_*`), surfaced as clap
//! flags with `env` fallbacks by the `update` command:
//!
//! - `REPOWEAVE_PROVIDER`: `github` (GitHub CLI) or `gitea` (REST API)
//! - `REPOWEAVE_BASE_URL`: browse-URL prefix used to derive repository URLs
//!   and to validate existing `repository` fields
//! - `REPOWEAVE_API_URL`: API root for the Gitea provider
//! - `REPOWEAVE_TOKEN`: admin token, passed through to the provider
//! - `REPOWEAVE_ORG`: organization/owner that new repositories are created
//!   under

use url::Url;

use crate::error::{Error, Result};

/// Which hosting-provider adapter drives repository creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Shell out to the `gh` CLI.
    GithubCli,
    /// Talk to a Gitea instance over its REST API.
    GiteaApi,
}

impl ProviderKind {
    /// Parse a provider name as given on the command line or environment.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "github" | "gh" => Ok(Self::GithubCli),
            "gitea" => Ok(Self::GiteaApi),
            other => Err(Error::Config {
                message: format!("unknown provider '{}' (expected 'github' or 'gitea')", other),
            }),
        }
    }
}

/// Tool settings shared across commands.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Selected hosting provider.
    pub provider: ProviderKind,
    /// Browse-URL prefix, e.g. `https://github.com`. Repository URLs are
    /// derived as `{base_url}/{org}/{code}`.
    pub base_url: String,
    /// API root for REST providers, e.g. `https://gitea.example.com/api/v1`.
    pub api_url: Option<String>,
    /// Admin token passed through to the provider. Never logged.
    pub token: Option<String>,
    /// Organization/owner for created repositories.
    pub org: String,
    /// Primary branch pushed after initialization.
    pub branch: String,
    /// Timeout applied to the push step, in seconds.
    pub push_timeout_secs: u64,
}

impl Settings {
    /// Build settings, validating the base URL up front so a malformed value
    /// fails at startup rather than mid-run.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        provider: ProviderKind,
        base_url: String,
        api_url: Option<String>,
        token: Option<String>,
        org: String,
        branch: String,
        push_timeout_secs: u64,
    ) -> Result<Self> {
        Url::parse(&base_url)?;
        if org.is_empty() {
            return Err(Error::Config {
                message: "organization must not be empty".to_string(),
            });
        }

        Ok(Self {
            provider,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_url: api_url.map(|u| u.trim_end_matches('/').to_string()),
            token,
            org,
            branch,
            push_timeout_secs,
        })
    }

    /// Deterministic repository URL for a unit code: `{base_url}/{org}/{code}`.
    pub fn repo_url(&self, code: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.org, code)
    }

    /// The URL prefix every `repository` field must start with.
    pub fn repo_prefix(&self) -> String {
        format!("{}/{}/", self.base_url, self.org)
    }
}
