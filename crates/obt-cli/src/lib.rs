//! OBT command-line tool
//!
//! Thin wrapper over `obt-crypto` for:
//! - generating and inspecting secp256k1 key pairs
//! - deriving the shared secret with a counterparty (interop debugging)
//! - encrypting JSON payloads into hex envelopes and back

pub mod cli;
pub mod commands;
pub mod config;
pub mod identity;
pub mod output;

pub use cli::Cli;
pub use config::{CliOverrides, Config};
pub use output::{JsonResponse, OutputFormat, OutputFormatter};

use obt_crypto::ObtError;

/// Exit codes for CLI operations
///
/// - 0: Success
/// - 1: General error (I/O, unexpected failures)
/// - 2: Authentication failed, the envelope was tampered with or is from someone else
/// - 3: Invalid key string or unusable key pair
/// - 4: Malformed envelope (bad hex, truncated, misaligned, bad padding)
/// - 5: Invalid input (payload JSON or decrypted content does not match the type)
/// - 6: Configuration error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    AuthenticationFailed = 2,
    InvalidKey = 3,
    InvalidEnvelope = 4,
    InvalidInput = 5,
    ConfigError = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<&ObtError> for ExitCode {
    fn from(e: &ObtError) -> Self {
        match e {
            ObtError::Authentication => ExitCode::AuthenticationFailed,
            ObtError::KeyFormat(_) | ObtError::KeyAgreement(_) => ExitCode::InvalidKey,
            ObtError::EnvelopeFormat(_) | ObtError::Padding { .. } => ExitCode::InvalidEnvelope,
            ObtError::Serialization(_) => ExitCode::InvalidInput,
            ObtError::Rng => ExitCode::GeneralError,
        }
    }
}

impl ExitCode {
    /// Convert to process exit code
    pub fn to_exit_code(self) -> std::process::ExitCode {
        std::process::ExitCode::from(self as u8)
    }

    /// Pick the exit code for a command failure.
    ///
    /// Walks the error chain so context added with `anyhow` does not hide
    /// the underlying crypto or config error.
    pub fn from_error(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(e) = cause.downcast_ref::<ObtError>() {
                return ExitCode::from(e);
            }
            if cause.downcast_ref::<config::ConfigError>().is_some() {
                return ExitCode::ConfigError;
            }
        }
        ExitCode::GeneralError
    }

    /// Get the exit code name as a string
    pub fn name(&self) -> &'static str {
        match self {
            ExitCode::Success => "SUCCESS",
            ExitCode::GeneralError => "GENERAL_ERROR",
            ExitCode::AuthenticationFailed => "AUTH_FAILED",
            ExitCode::InvalidKey => "INVALID_KEY",
            ExitCode::InvalidEnvelope => "INVALID_ENVELOPE",
            ExitCode::InvalidInput => "INVALID_INPUT",
            ExitCode::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Get a human-readable description of the exit code
    pub fn description(&self) -> &'static str {
        match self {
            ExitCode::Success => "Operation completed successfully",
            ExitCode::GeneralError => "An unspecified error occurred",
            ExitCode::AuthenticationFailed => "Envelope failed authentication and was discarded",
            ExitCode::InvalidKey => "Key string is malformed or not a secp256k1 key",
            ExitCode::InvalidEnvelope => "Envelope is malformed",
            ExitCode::InvalidInput => "Payload does not match the requested content type",
            ExitCode::ConfigError => "Configuration file is invalid",
        }
    }
}
