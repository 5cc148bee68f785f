//! CLI error types and exit codes

use thiserror::Error;

use melange_client::MelangeError;

/// Process exit codes
pub mod exit_code {
    /// Command succeeded
    pub const SUCCESS: u8 = 0;
    /// Any failure without a more specific code
    pub const GENERAL: u8 = 1;
    /// Bad invocation: unknown resource/operation, bad or missing arguments
    pub const USAGE: u8 = 2;
    /// Token acquisition failed
    pub const AUTH: u8 = 3;
    /// The server could not be reached
    pub const CONNECTION: u8 = 7;
}

/// Errors surfaced by the `melange` binary
#[derive(Debug, Error)]
pub enum CliError {
    /// Failure reported by the client library
    #[error(transparent)]
    Client(#[from] MelangeError),

    /// Configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Result could not be rendered
    #[error("Could not render output: {0}")]
    Output(String),

    /// The command line does not describe a valid invocation
    #[error("{0}")]
    Usage(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => exit_code::USAGE,
            Self::Client(err) if err.is_usage() => exit_code::USAGE,
            Self::Client(MelangeError::Auth(_)) => exit_code::AUTH,
            Self::Client(MelangeError::Connection(_)) => exit_code::CONNECTION,
            Self::Client(_) | Self::Config(_) | Self::Output(_) => exit_code::GENERAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Usage("bad".to_string()).exit_code(), exit_code::USAGE);
        assert_eq!(
            CliError::from(MelangeError::UnknownCapability {
                owner: "Factory".to_string(),
                name: "nope".to_string(),
            })
            .exit_code(),
            exit_code::USAGE
        );
        assert_eq!(
            CliError::from(MelangeError::usage("missing required argument: cidr")).exit_code(),
            exit_code::USAGE
        );
        assert_eq!(CliError::from(MelangeError::Auth("401".to_string())).exit_code(), exit_code::AUTH);
        assert_eq!(
            CliError::from(MelangeError::Connection("refused".to_string())).exit_code(),
            exit_code::CONNECTION
        );
        assert_eq!(
            CliError::from(MelangeError::ServiceResponse {
                status: 404,
                body: "IpBlock Not Found".to_string(),
            })
            .exit_code(),
            exit_code::GENERAL
        );
    }

    #[test]
    fn test_service_error_displays_raw_body() {
        let err = CliError::from(MelangeError::ServiceResponse {
            status: 404,
            body: "IpBlock Not Found".to_string(),
        });
        assert_eq!(err.to_string(), "IpBlock Not Found");
    }
}
