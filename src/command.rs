//! Command execution for frontkit.
//!
//! Each command group builds the services it needs from the loaded
//! configuration and the current working directory, then hands off to the
//! [`VersionResolver`](crate::resolver::VersionResolver). Failures are
//! reported here and mapped to a process exit status of `1`.
use log::*;

use crate::{cli, error::Result};

pub mod github;

/// Run the command selected on the command line.
pub async fn execute(args: &cli::Args) -> Result<()> {
    match &args.command {
        cli::Command::Github { command } => {
            github::execute(args, command).await
        }
    }
}

/// Exit status for a finished command, logging the failure if any.
pub fn exit_status<T>(result: &Result<T>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(err) => {
            error!("{err}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrontkitError;

    #[test]
    fn success_exits_zero() {
        assert_eq!(exit_status(&Ok(())), 0);
    }

    #[test]
    fn any_failure_exits_one() {
        let failures: Vec<Result<()>> = vec![
            Err(FrontkitError::invalid_args("missing required --repo")),
            Err(FrontkitError::PullRequestNotFound("abc123".into())),
            Err(FrontkitError::MissingBumpDirective(4)),
            Err(FrontkitError::BumpFailed(vec![3, 7])),
            Err(FrontkitError::RemoteFetch {
                status: 502,
                body: "bad gateway".into(),
            }),
        ];

        for result in failures.iter() {
            assert_eq!(exit_status(result), 1);
        }
    }
}
