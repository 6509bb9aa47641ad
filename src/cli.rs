//! CLI argument parsing.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::{config::DEFAULT_CONFIG_FILE, resolver::RepoArgs};

/// Global CLI arguments.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    /// Path to the configuration file. Defaults apply when it is missing.
    pub config: PathBuf,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Top level command groups.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Version automation backed by the GitHub API.
    Github {
        #[command(subcommand)]
        command: GithubCommand,
    },
}

/// GitHub version automation subcommands.
#[derive(Subcommand, Debug)]
pub enum GithubCommand {
    /// Apply the bumps declared by PRs merged since the last automation
    /// commit, then commit and push the updated manifests.
    BumpVersion(RepoOpts),

    /// Check that the PR for a commit declares a version bump.
    VersionBumped(RepoOpts),

    /// Create a release for the version in the manifest.
    CreateRelease {
        #[command(flatten)]
        repo: RepoOpts,

        #[arg(long)]
        /// Branch the release tag targets. Defaults to the current branch.
        branch: Option<String>,

        #[arg(long)]
        /// Release description.
        description: Option<String>,
    },
}

/// Repository selection shared by the github subcommands. Both values are
/// optional at parse time and validated by the operation that needs them.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RepoOpts {
    #[arg(long)]
    /// Repository in owner/name form.
    pub repo: Option<String>,

    #[arg(long)]
    /// Commit sha to look up.
    pub sha: Option<String>,
}

impl From<&RepoOpts> for RepoArgs {
    fn from(opts: &RepoOpts) -> Self {
        RepoArgs {
            repo: opts.repo.clone(),
            sha: opts.sha.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("frontkit").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn parses_bump_version() {
        let args = parse(&["github", "bump-version", "--repo", "acme/web"]);

        assert!(!args.debug);
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_FILE));

        let Command::Github {
            command: GithubCommand::BumpVersion(opts),
        } = args.command
        else {
            panic!("expected bump-version");
        };
        assert_eq!(opts.repo.as_deref(), Some("acme/web"));
        assert_eq!(opts.sha, None);
    }

    #[test]
    fn parses_version_bumped_with_global_flags() {
        let args = parse(&[
            "github",
            "version-bumped",
            "--repo",
            "acme/web",
            "--sha",
            "abc123",
            "--debug",
            "--config",
            "ci/frontkit.toml",
        ]);

        assert!(args.debug);
        assert_eq!(args.config, PathBuf::from("ci/frontkit.toml"));

        let Command::Github {
            command: GithubCommand::VersionBumped(opts),
        } = args.command
        else {
            panic!("expected version-bumped");
        };
        let repo_args = RepoArgs::from(&opts);
        assert_eq!(repo_args.repo.as_deref(), Some("acme/web"));
        assert_eq!(repo_args.sha.as_deref(), Some("abc123"));
    }

    #[test]
    fn missing_repo_still_parses() {
        let args = parse(&["github", "version-bumped"]);

        let Command::Github {
            command: GithubCommand::VersionBumped(opts),
        } = args.command
        else {
            panic!("expected version-bumped");
        };
        assert_eq!(opts.repo, None);
        assert_eq!(opts.sha, None);
    }

    #[test]
    fn parses_create_release() {
        let args = parse(&[
            "github",
            "create-release",
            "--repo",
            "acme/web",
            "--branch",
            "main",
            "--description",
            "first release",
        ]);

        let Command::Github {
            command:
                GithubCommand::CreateRelease {
                    repo,
                    branch,
                    description,
                },
        } = args.command
        else {
            panic!("expected create-release");
        };
        assert_eq!(repo.repo.as_deref(), Some("acme/web"));
        assert_eq!(branch.as_deref(), Some("main"));
        assert_eq!(description.as_deref(), Some("first release"));
    }

    #[test]
    fn rejects_unknown_subcommand() {
        let result =
            Args::try_parse_from(["frontkit", "github", "publish-everything"]);
        assert!(result.is_err());
    }
}
