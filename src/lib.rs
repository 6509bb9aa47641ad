//! Pull-request driven version bumping for JavaScript projects hosted on
//! GitHub.
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod forge;
pub mod git;
pub mod manifest;
pub mod resolver;

pub use error::{FrontkitError, Result};
pub use resolver::{
    BumpLevel, RepoArgs, VersionResolver, get_version_bump_level,
    specifies_version_bump_level,
};
