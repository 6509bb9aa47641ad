use serde::{Deserialize, Serialize};

use crate::forge::request::{Commit, PullRequest};

#[derive(Debug, Deserialize)]
pub struct GithubCommitAuthor {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GithubCommitDetail {
    pub message: String,
    pub author: Option<GithubCommitAuthor>,
}

#[derive(Debug, Deserialize)]
pub struct GithubCommit {
    pub sha: String,
    pub commit: GithubCommitDetail,
}

impl From<GithubCommit> for Commit {
    fn from(value: GithubCommit) -> Self {
        Commit {
            sha: value.sha,
            author_email: value
                .commit
                .author
                .and_then(|a| a.email)
                .unwrap_or_default(),
            message: value.commit.message,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GithubPullHead {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub struct GithubPull {
    pub number: u64,
    pub body: Option<String>,
    pub head: GithubPullHead,
    pub merge_commit_sha: Option<String>,
}

impl From<GithubPull> for PullRequest {
    fn from(value: GithubPull) -> Self {
        PullRequest {
            number: value.number,
            body: value.body,
            head_sha: value.head.sha,
            merge_commit_sha: value.merge_commit_sha,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageParams {
    pub per_page: u8,
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<&'static str>,
}
