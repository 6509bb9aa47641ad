//! Implements the SourceControl trait for Github
use async_trait::async_trait;
use log::*;
use octocrab::{Octocrab, service::middleware::retry::RetryConfig};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

mod types;

use crate::{
    config::Config,
    error::Result,
    forge::{
        github::types::{GithubCommit, GithubPull, PageParams},
        request::{Commit, CreateReleaseRequest, PullRequest, RepoSlug},
        traits::SourceControl,
    },
};

/// Default page size for paginated list queries
pub const DEFAULT_PAGE_SIZE: u8 = 100;

/// GitHub forge implementation using Octocrab for API interactions with
/// commit history, PRs, and releases.
pub struct Github {
    base_uri: String,
    search_depth: u64,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with optional personal access token
    /// authentication and API base URL configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let base_uri = config.github.api_url.trim_end_matches('/').to_string();

        let mut builder = Octocrab::builder()
            .base_uri(base_uri.clone())?
            .add_retry_config(RetryConfig::None);

        if let Some(token) = &config.token {
            builder = builder.personal_token(token.clone());
        } else {
            warn!("no github token configured: using anonymous access");
        }

        let instance = builder.build()?;

        Ok(Self {
            base_uri,
            search_depth: config.search_depth(),
            instance,
        })
    }

    fn repo_endpoint(&self, repo: &RepoSlug, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.base_uri, repo.owner, repo.name, path
        )
    }

    async fn get_paginated<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        state: Option<&'static str>,
    ) -> Result<Vec<T>> {
        let limit = usize::try_from(self.search_depth).unwrap_or(usize::MAX);
        let mut items: Vec<T> = vec![];
        let mut page = 1;

        loop {
            let params = PageParams {
                per_page: DEFAULT_PAGE_SIZE,
                page,
                state,
            };

            debug!("requesting page {page} of {endpoint}");

            let batch: Vec<T> = self.instance.get(endpoint, Some(&params)).await?;
            let count = batch.len();
            items.extend(batch);

            if count < DEFAULT_PAGE_SIZE as usize || items.len() >= limit {
                break;
            }

            page += 1;
        }

        items.truncate(limit);

        Ok(items)
    }
}

#[async_trait]
impl SourceControl for Github {
    async fn list_commits(&self, repo: &RepoSlug) -> Result<Vec<Commit>> {
        let endpoint = self.repo_endpoint(repo, "commits");

        let commits: Vec<GithubCommit> =
            self.get_paginated(&endpoint, None).await?;

        info!("fetched {} commits for {repo}", commits.len());

        Ok(commits.into_iter().map(Commit::from).collect())
    }

    async fn get_pull_request(
        &self,
        repo: &RepoSlug,
        number: u64,
    ) -> Result<Option<PullRequest>> {
        let endpoint = self.repo_endpoint(repo, &format!("pulls/{number}"));

        let result: octocrab::Result<GithubPull> =
            self.instance.get(&endpoint, None::<&()>).await;

        match result {
            Err(octocrab::Error::GitHub { source, .. })
                if source.status_code == StatusCode::NOT_FOUND =>
            {
                debug!("no pull request found for number: {number}");
                Ok(None)
            }
            Err(err) => Err(err.into()),
            Ok(pr) => Ok(Some(pr.into())),
        }
    }

    async fn list_pull_requests(
        &self,
        repo: &RepoSlug,
        all_states: bool,
    ) -> Result<Vec<PullRequest>> {
        let endpoint = self.repo_endpoint(repo, "pulls");
        let state = if all_states { "all" } else { "open" };

        let pulls: Vec<GithubPull> =
            self.get_paginated(&endpoint, Some(state)).await?;

        info!("fetched {} {state} pull requests for {repo}", pulls.len());

        Ok(pulls.into_iter().map(PullRequest::from).collect())
    }

    async fn create_release(
        &self,
        repo: &RepoSlug,
        req: CreateReleaseRequest,
    ) -> Result<()> {
        info!("creating release {} on {repo} from {}", req.tag, req.branch);

        self.instance
            .repos(&repo.owner, &repo.name)
            .releases()
            .create(&req.tag)
            .name(&req.name)
            .body(&req.body)
            .target_commitish(&req.branch)
            .draft(false)
            .prerelease(false)
            .send()
            .await?;

        Ok(())
    }
}
