//! Error type shared by every command handler.
//!
//! Handlers return `Result<(), CliError>` and let [`crate::run`] turn the
//! error into an exit code through [`CliError::exit_code`].

use std::fmt;

use blindjack_ai::AiError;
use blindjack_engine::errors::GameError;

use crate::exit_code;

#[derive(Debug)]
pub enum CliError {
    /// File or stream failure
    Io(std::io::Error),

    /// Bad arguments or malformed input data
    InvalidInput(String),

    Config(String),

    /// The engine or an opponent refused an operation
    Engine(String),

    /// The command stopped before finishing (quit, break-after)
    Interrupted(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Interrupted(_) => exit_code::INTERRUPTED,
            _ => exit_code::ERROR,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(msg) => write!(f, "Engine error: {}", msg),
            CliError::Interrupted(msg) => write!(f, "Interrupted: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<GameError> for CliError {
    fn from(error: GameError) -> Self {
        match error {
            GameError::InvalidConfiguration(msg) => CliError::Config(msg),
            other => CliError::Engine(other.to_string()),
        }
    }
}

impl From<AiError> for CliError {
    fn from(error: AiError) -> Self {
        CliError::Config(error.to_string())
    }
}
