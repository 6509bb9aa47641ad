//! Local git repository operations used to publish version bumps.
//!
//! The repository is discovered from the working directory the CLI runs in
//! (typically a CI checkout). Pushes go to the upstream configured for the
//! currently checked out branch, resolved at push time.
use git2::{Cred, PushOptions, RemoteCallbacks};
use log::*;
use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Username paired with a token for HTTPS pushes to GitHub.
const TOKEN_USERNAME: &str = "x-access-token";

/// Local git operations needed to commit and publish manifest changes.
#[cfg_attr(test, mockall::automock)]
pub trait LocalGit {
    /// Stage the given paths, relative to the directory the repository
    /// was discovered from.
    fn add(&self, paths: &[String]) -> Result<()>;

    /// Commit staged changes as `name <email>`, returning the new sha.
    fn commit(&self, message: &str, name: &str, email: &str) -> Result<String>;

    /// Name of the checked out branch.
    fn current_branch(&self) -> Result<String>;

    /// Push the checked out branch to its configured upstream.
    fn push_current_branch(&self) -> Result<()>;
}

/// Create Git authentication callbacks. A configured token is sent as
/// username/token, otherwise the user's credential helper is consulted.
fn get_auth_callbacks<'r>(token: Option<String>) -> RemoteCallbacks<'r> {
    let mut callbacks = RemoteCallbacks::new();

    callbacks.credentials(move |url, username, _allowed| {
        if let Some(token) = &token {
            return Cred::userpass_plaintext(TOKEN_USERNAME, token);
        }
        let config = git2::Config::open_default()?;
        Cred::credential_helper(&config, url, username)
    });

    callbacks.push_update_reference(|refname, status| {
        if let Some(msg) = status {
            return Err(git2::Error::from_str(&format!(
                "remote rejected {refname}: {msg}"
            )));
        }
        Ok(())
    });

    callbacks
}

/// [`LocalGit`] backed by libgit2. The repository is discovered from
/// `path` on every operation and manifest paths are taken relative to it.
pub struct GitRepository {
    path: PathBuf,
    token: Option<SecretString>,
}

impl GitRepository {
    pub fn new(path: &Path, token: Option<SecretString>) -> Self {
        Self {
            path: path.to_path_buf(),
            token,
        }
    }

    fn open(&self) -> Result<git2::Repository> {
        Ok(git2::Repository::discover(&self.path)?)
    }

    /// Translate `path` (relative to the discovery path) into a path
    /// relative to the repository root, as the index expects.
    fn index_path(&self, repo: &git2::Repository, path: &str) -> Result<PathBuf> {
        let workdir = repo
            .workdir()
            .ok_or_else(|| git2::Error::from_str("repository has no working directory"))?
            .canonicalize()?;
        let full_path = self.path.canonicalize()?.join(path);

        Ok(full_path
            .strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(path)))
    }

    fn head_ref_name(repo: &git2::Repository) -> Result<String> {
        let head = repo.head()?;

        if !head.is_branch() {
            return Err(git2::Error::from_str(
                "HEAD is detached: cannot determine current branch",
            )
            .into());
        }

        head.name()
            .map(String::from)
            .ok_or_else(|| git2::Error::from_str("invalid HEAD name").into())
    }
}

impl LocalGit for GitRepository {
    fn add(&self, paths: &[String]) -> Result<()> {
        debug!("adding {} file(s) to index", paths.len());
        let repo = self.open()?;
        let mut index = repo.index()?;
        for path in paths {
            index.add_path(&self.index_path(&repo, path)?)?;
        }
        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str, name: &str, email: &str) -> Result<String> {
        debug!("committing changes with msg: {message}");
        debug!("using committer: user: {name}, email: {email}");
        let repo = self.open()?;
        let mut index = repo.index()?;
        let oid = index.write_tree()?;
        let tree = repo.find_tree(oid)?;
        let parent_commit = repo.head()?.peel_to_commit()?;
        let committer = git2::Signature::now(name, email)?;
        let commit = repo.commit(
            Some("HEAD"),
            &committer,
            &committer,
            message,
            &tree,
            &[&parent_commit],
        )?;
        Ok(commit.to_string())
    }

    fn current_branch(&self) -> Result<String> {
        let repo = self.open()?;
        let ref_name = Self::head_ref_name(&repo)?;
        Ok(ref_name
            .strip_prefix("refs/heads/")
            .unwrap_or(&ref_name)
            .to_string())
    }

    fn push_current_branch(&self) -> Result<()> {
        let repo = self.open()?;
        let ref_name = Self::head_ref_name(&repo)?;

        let remote_buf = repo.branch_upstream_remote(&ref_name)?;
        let remote_name = remote_buf
            .as_str()
            .ok_or_else(|| git2::Error::from_str("invalid upstream remote"))?;

        let merge_buf = repo.branch_upstream_merge(&ref_name)?;
        let merge_ref = merge_buf
            .as_str()
            .ok_or_else(|| git2::Error::from_str("invalid upstream branch"))?;

        info!("pushing {ref_name} to {remote_name} {merge_ref}");

        let token = self
            .token
            .as_ref()
            .map(|t| t.expose_secret().to_string());
        let mut push_opts = PushOptions::new();
        push_opts.remote_callbacks(get_auth_callbacks(token));

        let mut remote = repo.find_remote(remote_name)?;
        let ref_spec = format!("{ref_name}:{merge_ref}");
        remote.push(&[ref_spec], Some(&mut push_opts))?;

        Ok(())
    }
}
