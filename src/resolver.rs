//! Pull-request driven semantic version bumping.
//!
//! Merged pull requests declare how the project version should change by
//! including `#MAJOR#`, `#MINOR#` or `#PATCH#` in their description. The
//! resolver walks the default branch history back to the last commit made
//! by the automation identity, collects the declared bumps, applies them
//! oldest first and publishes the result with a commit on the current
//! branch.
use log::*;
use semver::Version;

use crate::{
    config::Config,
    error::{FrontkitError, Result},
    forge::{
        request::{CreateReleaseRequest, RepoSlug},
        traits::SourceControl,
    },
    git::LocalGit,
    manifest::ManifestStore,
};

mod bump;

pub use bump::{
    BumpLevel, PlannedBump, VersionState, get_version_bump_level,
    merged_pr_number, specifies_version_bump_level,
};

/// Arguments shared by the github commands. Each operation validates the
/// fields it needs before doing any I/O.
#[derive(Debug, Clone, Default)]
pub struct RepoArgs {
    /// Repository in `owner/name` form.
    pub repo: Option<String>,
    /// Commit sha, only used by [`VersionResolver::version_bumped`].
    pub sha: Option<String>,
}

impl RepoArgs {
    fn require_repo(&self) -> Result<RepoSlug> {
        match self.repo.as_deref() {
            Some(repo) if !repo.trim().is_empty() => RepoSlug::parse(repo),
            _ => Err(FrontkitError::invalid_args("missing required --repo")),
        }
    }

    fn require_sha(&self) -> Result<&str> {
        match self.sha.as_deref() {
            Some(sha) if !sha.trim().is_empty() => Ok(sha.trim()),
            _ => Err(FrontkitError::invalid_args("missing required --sha")),
        }
    }
}

/// Resolves and applies version bumps declared by merged pull requests.
pub struct VersionResolver {
    config: Config,
    forge: Box<dyn SourceControl>,
    manifests: Box<dyn ManifestStore>,
    git: Box<dyn LocalGit>,
}

impl VersionResolver {
    pub fn new(
        config: Config,
        forge: Box<dyn SourceControl>,
        manifests: Box<dyn ManifestStore>,
        git: Box<dyn LocalGit>,
    ) -> Self {
        Self {
            config,
            forge,
            manifests,
            git,
        }
    }

    /// Bump the project version for every merged PR since the last
    /// automation commit, then commit and push the updated manifests.
    ///
    /// Returns the new version, or `None` when there was nothing to bump.
    pub async fn bump_version(
        &self,
        args: &RepoArgs,
    ) -> Result<Option<Version>> {
        let repo = args.require_repo()?;

        let plan = self.plan_bumps(&repo).await?;

        if plan.is_empty() {
            info!("no merged pull requests since last version bump");
            return Ok(None);
        }

        let state = self.apply_plan(&plan)?;

        self.publish(&state)?;

        Ok(Some(state.version().clone()))
    }

    /// Collect the bumps declared by PRs merged since the last automation
    /// commit, ordered oldest to newest.
    pub async fn plan_bumps(&self, repo: &RepoSlug) -> Result<Vec<PlannedBump>> {
        let commits = self.forge.list_commits(repo).await?;
        let automation_email = &self.config.github.automation_email;
        let mut plan = vec![];
        let mut reached_boundary = false;

        for commit in commits.iter() {
            if &commit.author_email == automation_email {
                debug!(
                    "reached commit {} by {automation_email}: stopping scan",
                    commit.sha
                );
                reached_boundary = true;
                break;
            }

            let Some(number) = merged_pr_number(&commit.message) else {
                continue;
            };

            match self.forge.get_pull_request(repo, number).await? {
                None => {
                    warn!(
                        "could not find PR #{number} merged in {}: skipping",
                        commit.sha
                    );
                }
                Some(pr) => {
                    let level = get_version_bump_level(&pr);
                    debug!("PR #{number} declares bump level: {level:?}");
                    plan.push(PlannedBump {
                        pr_number: number,
                        level,
                    });
                }
            }
        }

        // hitting the search depth before the automation commit would drop
        // older merges
        if !reached_boundary && commits.len() as u64 >= self.config.search_depth()
        {
            return Err(FrontkitError::invalid_config(format!(
                "scanned {} commits without reaching a commit by {automation_email}: \
                 raise github.commit_search_depth or set it to 0 for no limit",
                commits.len()
            )));
        }

        // commits arrive newest first
        plan.reverse();

        Ok(plan)
    }

    /// Apply `plan` to the version in the primary manifest. Every entry is
    /// attempted; entries without a level fail the whole plan afterwards.
    pub fn apply_plan(&self, plan: &[PlannedBump]) -> Result<VersionState> {
        let primary = self.config.primary_manifest()?;
        let current = self.manifests.read_version(primary)?;
        info!("current version: {current}");

        let mut state = VersionState::new(current, self.config.manifest.indent);
        let mut failed = vec![];

        for entry in plan {
            match entry.level {
                Some(level) => {
                    state.apply_bump(level)?;
                    info!(
                        "applied {level} bump from PR #{}: {}",
                        entry.pr_number,
                        state.version()
                    );
                }
                None => {
                    error!(
                        "PR #{} does not declare a version bump level",
                        entry.pr_number
                    );
                    failed.push(entry.pr_number);
                }
            }
        }

        if !failed.is_empty() {
            return Err(FrontkitError::BumpFailed(failed));
        }

        Ok(state)
    }

    /// Write `state` to the configured manifests, commit and push.
    fn publish(&self, state: &VersionState) -> Result<()> {
        let primary = self.config.primary_manifest()?;
        let mut written = vec![];

        for path in self.config.manifest.paths.iter() {
            if path != primary && !self.manifests.exists(path) {
                debug!("skipping missing manifest: {path}");
                continue;
            }

            self.manifests
                .write_version(path, state.version(), state.indent())?;
            written.push(path.clone());
        }

        let message = format!("chore: bump version to {}", state.version());

        self.git.add(&written)?;
        let sha = self.git.commit(
            &message,
            &self.config.github.automation_name,
            &self.config.github.automation_email,
        )?;
        info!("committed {sha}: {message}");

        self.git.push_current_branch()?;
        info!("pushed version {}", state.version());

        Ok(())
    }

    /// Check that the PR whose head or merge commit is `args.sha` declares
    /// a bump level.
    pub async fn version_bumped(&self, args: &RepoArgs) -> Result<BumpLevel> {
        let repo = args.require_repo()?;
        let sha = args.require_sha()?;

        let prs = self.forge.list_pull_requests(&repo, true).await?;

        let pr = prs
            .iter()
            .find(|pr| pr.matches_sha(sha))
            .ok_or_else(|| FrontkitError::PullRequestNotFound(sha.into()))?;

        let level = get_version_bump_level(pr)
            .ok_or(FrontkitError::MissingBumpDirective(pr.number))?;

        info!("PR #{} declares a {level} version bump", pr.number);

        Ok(level)
    }

    /// Publish a release for the version currently in the primary manifest.
    /// Targets the checked out branch unless `branch` is given.
    pub async fn create_release(
        &self,
        args: &RepoArgs,
        branch: Option<String>,
        description: Option<String>,
    ) -> Result<String> {
        let repo = args.require_repo()?;

        let version = self
            .manifests
            .read_version(self.config.primary_manifest()?)?;

        let branch = match branch {
            Some(branch) => branch,
            None => self.git.current_branch()?,
        };

        let tag = format!("v{version}");

        self.forge
            .create_release(
                &repo,
                CreateReleaseRequest {
                    tag: tag.clone(),
                    branch,
                    name: tag.clone(),
                    body: description.unwrap_or_default(),
                },
            )
            .await?;

        info!("created release {tag}");

        Ok(tag)
    }
}
