//! `frontkit github ...` subcommands.
use log::*;
use std::env;

use crate::{
    cli::{self, GithubCommand},
    config::Config,
    error::Result,
    forge::github::Github,
    git::GitRepository,
    manifest::JsonManifest,
    resolver::{RepoArgs, VersionResolver},
};

/// Load configuration, wire up the GitHub backed resolver and run `command`.
pub async fn execute(args: &cli::Args, command: &GithubCommand) -> Result<()> {
    let config = Config::load(&args.config)?;
    let resolver = build_resolver(config)?;
    run(&resolver, command).await
}

/// Manifests and git operate on the current working directory.
fn build_resolver(config: Config) -> Result<VersionResolver> {
    let cwd = env::current_dir()?;
    let forge = Github::new(&config)?;
    let manifests = JsonManifest::new(&cwd);
    let git = GitRepository::new(&cwd, config.token.clone());

    Ok(VersionResolver::new(
        config,
        Box::new(forge),
        Box::new(manifests),
        Box::new(git),
    ))
}

async fn run(resolver: &VersionResolver, command: &GithubCommand) -> Result<()> {
    match command {
        GithubCommand::BumpVersion(opts) => {
            match resolver.bump_version(&RepoArgs::from(opts)).await? {
                Some(version) => info!("version bumped to {version}"),
                None => info!("version unchanged"),
            }
        }
        GithubCommand::VersionBumped(opts) => {
            let level = resolver.version_bumped(&RepoArgs::from(opts)).await?;
            info!("found {level} version bump");
        }
        GithubCommand::CreateRelease {
            repo,
            branch,
            description,
        } => {
            let tag = resolver
                .create_release(
                    &RepoArgs::from(repo),
                    branch.clone(),
                    description.clone(),
                )
                .await?;
            info!("release {tag} published");
        }
    }

    Ok(())
}
