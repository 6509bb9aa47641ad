//! Bump directives, merge commit detection and semantic version arithmetic.
use log::*;
use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};
use std::{fmt, str::FromStr, sync::LazyLock};

use crate::{
    error::{FrontkitError, Result},
    forge::request::PullRequest,
};

static DIRECTIVE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#(?<level>MAJOR|MINOR|PATCH)#").unwrap()
});

static MERGE_COMMIT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^merge pull request #(?<number>[0-9]+)").unwrap()
});

/// Semantic version component to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpLevel {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpLevel::Major => write!(f, "major"),
            BumpLevel::Minor => write!(f, "minor"),
            BumpLevel::Patch => write!(f, "patch"),
        }
    }
}

impl FromStr for BumpLevel {
    type Err = FrontkitError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "major" => Ok(BumpLevel::Major),
            "minor" => Ok(BumpLevel::Minor),
            "patch" => Ok(BumpLevel::Patch),
            _ => Err(FrontkitError::invalid_args(format!(
                "unknown bump level: {s}"
            ))),
        }
    }
}

/// Bump level declared in the PR description. The leftmost directive wins
/// and a missing body declares nothing.
pub fn get_version_bump_level(pr: &PullRequest) -> Option<BumpLevel> {
    let body = pr.body.as_deref()?;
    let captures = DIRECTIVE_REGEX.captures(body)?;
    captures["level"].parse().ok()
}

/// Whether the PR description declares a bump level.
pub fn specifies_version_bump_level(pr: &PullRequest) -> bool {
    get_version_bump_level(pr).is_some()
}

/// PR number recorded by a `Merge pull request #N` commit message. Only the
/// first line of the message is considered.
pub fn merged_pr_number(message: &str) -> Option<u64> {
    let first_line = message.lines().next()?;
    let captures = MERGE_COMMIT_REGEX.captures(first_line)?;
    let number = &captures["number"];

    match number.parse() {
        Ok(number) => Some(number),
        Err(err) => {
            warn!("ignoring merge commit with invalid PR number #{number}: {err}");
            None
        }
    }
}

/// A merged PR and the bump it declared, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedBump {
    pub pr_number: u64,
    pub level: Option<BumpLevel>,
}

/// Project version being bumped plus the indentation used to write it back.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionState {
    version: Version,
    indent: usize,
}

impl VersionState {
    pub fn new(version: Version, indent: usize) -> Self {
        Self { version, indent }
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Increment the component named by `level`, zeroing lower components.
    /// Fails without mutating when the component is already `u64::MAX`.
    pub fn apply_bump(&mut self, level: BumpLevel) -> Result<()> {
        let component = match level {
            BumpLevel::Major => self.version.major,
            BumpLevel::Minor => self.version.minor,
            BumpLevel::Patch => self.version.patch,
        };

        let next = component.checked_add(1).ok_or_else(|| {
            FrontkitError::manifest(format!(
                "cannot apply {level} bump to {}: component overflow",
                self.version
            ))
        })?;

        match level {
            BumpLevel::Major => {
                self.version.major = next;
                self.version.minor = 0;
                self.version.patch = 0;
            }
            BumpLevel::Minor => {
                self.version.minor = next;
                self.version.patch = 0;
            }
            BumpLevel::Patch => {
                self.version.patch = next;
            }
        }
        self.version.pre = Prerelease::EMPTY;
        self.version.build = BuildMetadata::EMPTY;

        Ok(())
    }
}
