use std::fmt;

use crate::error::{FrontkitError, Result};

/// Repository identifier in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    /// Parse an `owner/name` string.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim().trim_end_matches(".git");

        match trimmed.split_once('/') {
            Some((owner, name))
                if !owner.is_empty()
                    && !name.is_empty()
                    && !name.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(FrontkitError::invalid_args(format!(
                "repo must be in owner/name form, got: {value}"
            ))),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Represents a normalized commit returned from the forge
pub struct Commit {
    pub sha: String,
    pub author_email: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Pull request fields needed to resolve version bumps.
pub struct PullRequest {
    pub number: u64,
    pub body: Option<String>,
    pub head_sha: String,
    pub merge_commit_sha: Option<String>,
}

impl PullRequest {
    /// Whether either the head or the merge commit of this PR is `sha`.
    pub fn matches_sha(&self, sha: &str) -> bool {
        self.head_sha == sha || self.merge_commit_sha.as_deref() == Some(sha)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Request to publish a release.
pub struct CreateReleaseRequest {
    pub tag: String,
    pub branch: String,
    pub name: String,
    pub body: String,
}
