//! Error types for Cadence

use crate::exit_code;
use thiserror::Error;

/// Boxed error raised by host or state code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for Cadence operations
#[derive(Debug, Error)]
pub enum CadenceError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Lifecycle violation: {0}")]
    LifecycleViolation(String),

    #[error("Host failed to initialize")]
    HostInitFailure,

    #[error("Unhandled host failure: {0}")]
    UnhandledHostFailure(#[source] BoxError),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CadenceError {
    /// Wrap a failure raised inside a lifecycle hook.
    ///
    /// Accepts any error type as well as plain `&str`/`String` messages.
    pub fn host(err: impl Into<BoxError>) -> Self {
        CadenceError::UnhandledHostFailure(err.into())
    }

    /// Numeric exit code used when a run loop maps errors to codes.
    pub fn exit_code(&self) -> i32 {
        match self {
            CadenceError::InvalidArgument(_) => exit_code::INVALID_ARGUMENT,
            CadenceError::LifecycleViolation(_) => exit_code::LIFECYCLE_VIOLATION,
            CadenceError::HostInitFailure => exit_code::HOST_INIT_FAILED,
            CadenceError::UnhandledHostFailure(_) => exit_code::HOST_FAILURE,
            CadenceError::ConfigParse(_) | CadenceError::IoError(_) => exit_code::CONFIG_ERROR,
        }
    }
}

/// Result type alias for Cadence operations
pub type Result<T> = std::result::Result<T, CadenceError>;

impl From<toml::de::Error> for CadenceError {
    fn from(err: toml::de::Error) -> Self {
        CadenceError::ConfigParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_wraps_messages() {
        let err = CadenceError::host("renderer lost");
        assert!(matches!(err, CadenceError::UnhandledHostFailure(_)));
        assert_eq!(err.to_string(), "Unhandled host failure: renderer lost");
    }

    #[test]
    fn test_host_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = CadenceError::host(io);
        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "disk gone");
    }

    #[test]
    fn test_exit_codes_per_kind() {
        assert_eq!(
            CadenceError::InvalidArgument("x".into()).exit_code(),
            exit_code::INVALID_ARGUMENT
        );
        assert_eq!(
            CadenceError::LifecycleViolation("x".into()).exit_code(),
            exit_code::LIFECYCLE_VIOLATION
        );
        assert_eq!(
            CadenceError::HostInitFailure.exit_code(),
            exit_code::HOST_INIT_FAILED
        );
        assert_eq!(CadenceError::host("x").exit_code(), exit_code::HOST_FAILURE);
        assert_eq!(
            CadenceError::ConfigParse("x".into()).exit_code(),
            exit_code::CONFIG_ERROR
        );
    }

    #[test]
    fn test_toml_errors_convert() {
        let err: CadenceError = toml::from_str::<toml::Value>("= nope")
            .unwrap_err()
            .into();
        assert!(matches!(err, CadenceError::ConfigParse(_)));
    }
}
