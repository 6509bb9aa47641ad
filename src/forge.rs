//! Source control platform access.
//!
//! Provides the commit, pull request and release operations the version
//! resolver consumes, behind a common trait.

/// GitHub REST API client implementation for GitHub.com and Enterprise.
pub mod github;

/// Request and response types shared by forge implementations.
pub mod request;

/// Common traits for forge platform abstraction.
pub mod traits;
