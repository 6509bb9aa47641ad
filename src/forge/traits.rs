//! Traits related to remote git forges
use async_trait::async_trait;

use crate::{
    error::Result,
    forge::request::{Commit, CreateReleaseRequest, PullRequest, RepoSlug},
};

/// Remote source control operations used by the version resolver.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// Commits on the default branch, newest first.
    async fn list_commits(&self, repo: &RepoSlug) -> Result<Vec<Commit>>;

    /// Fetch a single pull request. `None` when it does not exist.
    async fn get_pull_request(
        &self,
        repo: &RepoSlug,
        number: u64,
    ) -> Result<Option<PullRequest>>;

    /// List pull requests in API order, open only unless `all_states`.
    async fn list_pull_requests(
        &self,
        repo: &RepoSlug,
        all_states: bool,
    ) -> Result<Vec<PullRequest>>;

    async fn create_release(
        &self,
        repo: &RepoSlug,
        req: CreateReleaseRequest,
    ) -> Result<()>;
}
