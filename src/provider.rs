//! # Hosting Providers
//!
//! The remote hosting service behind a small capability trait, so a single
//! topology manager drives repository creation regardless of whether the
//! remote is GitHub (via the `gh` CLI) or a Gitea instance (via its REST
//! API). The variant is selected once from configuration.
//!
//! "Repository already exists" is deliberately modeled as a non-error
//! outcome: the URL is deterministic (base URL + org + code), so an existing
//! repository is reused exactly as if it had just been created.

use std::process::Command;
use std::time::Duration;

use log::debug;
use serde_json::json;

use crate::config::{ProviderKind, Settings};
use crate::error::{Error, Result};

/// Outcome of a create-repository call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new repository was created at this URL.
    Created(String),
    /// The repository already existed; the deterministic URL is reused.
    AlreadyExists(String),
}

impl CreateOutcome {
    /// The repository URL regardless of which way it came to exist.
    pub fn url(&self) -> &str {
        match self {
            Self::Created(url) | Self::AlreadyExists(url) => url,
        }
    }
}

/// Capability interface for the remote hosting service.
pub trait HostingProvider {
    /// Create a repository named `code` under the configured organization.
    fn create_repository(&self, code: &str) -> Result<CreateOutcome>;

    /// Pre-flight gate: verify the provider is reachable and the credentials
    /// work. A failure here aborts the entire run.
    fn check_connectivity(&self) -> Result<()>;

    /// Deterministic browse URL for a unit code.
    fn repo_url(&self, code: &str) -> String;
}

/// Build the provider selected by the settings.
pub fn from_settings(settings: &Settings) -> Result<Box<dyn HostingProvider>> {
    match settings.provider {
        ProviderKind::GithubCli => Ok(Box::new(GithubCli::new(settings.clone()))),
        ProviderKind::GiteaApi => Ok(Box::new(GiteaApi::new(settings.clone())?)),
    }
}

/// GitHub adapter shelling out to the `gh` CLI, which brings its own
/// authentication (tokens, keyring) with it.
pub struct GithubCli {
    settings: Settings,
}

impl GithubCli {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    fn gh(&self, args: &[&str]) -> Result<std::process::Output> {
        debug!("gh {}", args.join(" "));
        Command::new("gh")
            .args(args)
            .output()
            .map_err(|e| Error::Provider {
                message: format!("failed to run gh {}: {}", args.join(" "), e),
            })
    }
}

impl HostingProvider for GithubCli {
    fn create_repository(&self, code: &str) -> Result<CreateOutcome> {
        let slug = format!("{}/{}", self.settings.org, code);
        let output = self.gh(&["repo", "create", &slug, "--private"])?;

        let url = self.repo_url(code);
        if output.status.success() {
            return Ok(CreateOutcome::Created(url));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.to_lowercase().contains("already exists") {
            return Ok(CreateOutcome::AlreadyExists(url));
        }

        Err(Error::Provider {
            message: format!("gh repo create {} failed: {}", slug, stderr.trim()),
        })
    }

    fn check_connectivity(&self) -> Result<()> {
        let output = self.gh(&["auth", "status"])?;
        if output.status.success() {
            Ok(())
        } else {
            Err(Error::Connectivity {
                message: format!(
                    "gh auth status failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            })
        }
    }

    fn repo_url(&self, code: &str) -> String {
        self.settings.repo_url(code)
    }
}

/// Gitea adapter talking to the REST API with a blocking HTTP client,
/// matching the tool's strictly sequential execution model.
pub struct GiteaApi {
    settings: Settings,
    api_url: String,
    token: String,
    client: reqwest::blocking::Client,
}

impl GiteaApi {
    pub fn new(settings: Settings) -> Result<Self> {
        let api_url = settings.api_url.clone().ok_or_else(|| Error::Config {
            message: "the gitea provider requires REPOWEAVE_API_URL".to_string(),
        })?;
        let token = settings.token.clone().ok_or_else(|| Error::Config {
            message: "the gitea provider requires REPOWEAVE_TOKEN".to_string(),
        })?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Provider {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            settings,
            api_url,
            token,
            client,
        })
    }

    fn auth_header(&self) -> String {
        format!("token {}", self.token)
    }
}

impl HostingProvider for GiteaApi {
    fn create_repository(&self, code: &str) -> Result<CreateOutcome> {
        let endpoint = format!("{}/orgs/{}/repos", self.api_url, self.settings.org);
        debug!("POST {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .header("Authorization", self.auth_header())
            .json(&json!({ "name": code, "private": true }))
            .send()
            .map_err(|e| Error::Provider {
                message: format!("create repository request failed: {}", e),
            })?;

        let url = self.repo_url(code);
        match response.status().as_u16() {
            201 => Ok(CreateOutcome::Created(url)),
            409 => Ok(CreateOutcome::AlreadyExists(url)),
            status => {
                let body = response.text().unwrap_or_default();
                Err(Error::Provider {
                    message: format!(
                        "create repository for '{}' returned HTTP {}: {}",
                        code,
                        status,
                        body.trim()
                    ),
                })
            }
        }
    }

    fn check_connectivity(&self) -> Result<()> {
        let endpoint = format!("{}/version", self.api_url);
        let response = self
            .client
            .get(&endpoint)
            .header("Authorization", self.auth_header())
            .send()
            .map_err(|e| Error::Connectivity {
                message: format!("{} unreachable: {}", endpoint, e),
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::Connectivity {
                message: format!("{} returned HTTP {}", endpoint, response.status()),
            })
        }
    }

    fn repo_url(&self, code: &str) -> String {
        self.settings.repo_url(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(provider: ProviderKind) -> Settings {
        Settings::new(
            provider,
            "https://git.example.com".to_string(),
            Some("https://git.example.com/api/v1".to_string()),
            Some("secret".to_string()),
            "kindred".to_string(),
            "main".to_string(),
            60,
        )
        .unwrap()
    }

    #[test]
    fn test_create_outcome_url() {
        let created = CreateOutcome::Created("https://a/b/c".to_string());
        let existing = CreateOutcome::AlreadyExists("https://a/b/c".to_string());
        assert_eq!(created.url(), "https://a/b/c");
        assert_eq!(existing.url(), "https://a/b/c");
    }

    #[test]
    fn test_repo_url_is_deterministic() {
        let provider = GithubCli::new(settings(ProviderKind::GithubCli));
        assert_eq!(provider.repo_url("api"), "https://git.example.com/kindred/api");
        assert_eq!(provider.repo_url("api"), "https://git.example.com/kindred/api");
    }

    #[test]
    fn test_gitea_requires_api_url_and_token() {
        let mut incomplete = settings(ProviderKind::GiteaApi);
        incomplete.api_url = None;
        assert!(GiteaApi::new(incomplete).is_err());

        let mut incomplete = settings(ProviderKind::GiteaApi);
        incomplete.token = None;
        assert!(GiteaApi::new(incomplete).is_err());
    }

    #[test]
    fn test_from_settings_selects_variant() {
        assert!(from_settings(&settings(ProviderKind::GithubCli)).is_ok());
        assert!(from_settings(&settings(ProviderKind::GiteaApi)).is_ok());
    }
}
