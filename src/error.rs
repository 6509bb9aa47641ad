//! Custom error types for frontkit.

use thiserror::Error;

/// Main error type for frontkit operations.
#[derive(Error, Debug)]
pub enum FrontkitError {
    // Cli args errors
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Forge errors
    #[error("Remote request failed with status {status}: {body}")]
    RemoteFetch { status: u16, body: String },

    #[error("Forge operation failed: {0}")]
    ForgeError(String),

    #[error("Could not find PR for commit {0}")]
    PullRequestNotFound(String),

    #[error("PR #{0} is missing version bump comment")]
    MissingBumpDirective(u64),

    // Version bump errors
    #[error("Failed to apply version bump for PR(s): {}", format_numbers(.0))]
    BumpFailed(Vec<u64>),

    #[error("Manifest error: {0}")]
    ManifestError(String),

    #[error("Invalid version format: {0}")]
    InvalidVersion(#[from] semver::Error),

    // Local git errors
    #[error("Git operation failed: {0}")]
    GitError(#[from] git2::Error),

    // Parsing errors
    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using FrontkitError
pub type Result<T> = std::result::Result<T, FrontkitError>;

fn format_numbers(numbers: &[u64]) -> String {
    numbers
        .iter()
        .map(|n| format!("#{n}"))
        .collect::<Vec<String>>()
        .join(", ")
}

impl FrontkitError {
    /// Create an invalid arguments error
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArgs(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a forge error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        Self::ForgeError(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        Self::ManifestError(msg.into())
    }
}

impl From<std::io::Error> for FrontkitError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

// Non-success API responses keep their status and message so the CLI can
// report exactly what GitHub answered.
impl From<octocrab::Error> for FrontkitError {
    fn from(err: octocrab::Error) -> Self {
        if let octocrab::Error::GitHub { source, .. } = &err {
            return Self::RemoteFetch {
                status: source.status_code.as_u16(),
                body: source.message.clone(),
            };
        }

        Self::ForgeError(format!("GitHub API error: {}", err))
    }
}
