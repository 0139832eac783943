//! Error types for macshift

use thiserror::Error;

/// Result type alias for macshift operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for macshift
#[derive(Error, Debug)]
pub enum Error {
    /// Unexpected I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed address text
    #[error("Invalid MAC address '{0}'. Use format: XX:XX:XX:XX:XX:XX")]
    InvalidAddress(String),

    /// Required flag combination missing
    #[error("{0}")]
    MissingArgument(String),

    /// Querying the interface failed
    #[error("Interface '{interface}' not found or no permission")]
    InterfaceQuery { interface: String },

    /// The query succeeded but printed no hardware address
    #[error("No MAC address reported for interface '{0}'")]
    AddressNotFound(String),

    /// An OS command exited unsuccessfully
    #[error("Command `{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// Platform utility not installed or not on PATH
    #[error("Required utility '{0}' is not available")]
    UtilityMissing(String),

    /// Host OS is neither Linux nor macOS
    #[error("Unsupported platform '{0}'. This tool supports Linux and macOS only")]
    UnsupportedPlatform(String),

    /// The address read back after the change differs from the requested one
    #[error("MAC address change verification failed: expected {expected}, found {actual}")]
    VerificationFailed { expected: String, actual: String },
}

impl Error {
    /// Create a command failure from a command line and its diagnostic output
    pub fn command_failed<S: Into<String>>(command: S, stderr: S) -> Self {
        let stderr = stderr.into();
        let stderr = match stderr.trim() {
            "" => "Unknown".to_string(),
            trimmed => trimmed.to_string(),
        };
        Error::CommandFailed {
            command: command.into(),
            stderr,
        }
    }

    /// Create a missing argument error with a custom message
    pub fn missing_argument<S: Into<String>>(msg: S) -> Self {
        Error::MissingArgument(msg.into())
    }

    /// Whether this failure usually means the caller lacks root privileges
    pub fn is_privilege_related(&self) -> bool {
        matches!(self, Error::CommandFailed { .. })
    }
}
