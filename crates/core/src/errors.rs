//! Error types and handling
//!
//! Domain-specific error enums (configuration, engine, workflow) are wrapped
//! in the main `RoleboxError` enum for unified handling at the CLI boundary.
//! Messages are operator-facing and name the command that fixes the problem.

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required key absent from the persisted configuration
    #[error("Missing configuration key `{key}`. Run `rolebox setup` before running this command")]
    MissingKey { key: String },

    /// Configuration file parsing error
    #[error("Failed to parse configuration file: {message}")]
    Parsing { message: String },

    /// Configuration file I/O error
    #[error("Failed to access configuration file")]
    Io(#[from] std::io::Error),
}

/// Container engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Engine binary missing from PATH
    #[error("Container engine `{program}` is not installed or not on PATH")]
    NotInstalled { program: String },

    /// Engine invocation could not be spawned for a reason other than a missing binary
    #[error("Failed to execute `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Engine invocation ran and returned a non-zero exit code
    #[error("Command `{command}` failed with exit code {code}")]
    CommandFailed { command: String, code: i32 },

    /// Copy into a container reported failure; there is no partial-copy recovery
    #[error("Failed to copy `{src}` into container path `{dst}`")]
    CopyFailed { src: String, dst: String },

    /// Committing container state to an image failed
    #[error("Failed to commit container changes to image `{image}`")]
    CommitFailed { image: String },

    /// Referenced image is not present locally
    #[error("Image `{image}` is not available. Run `rolebox create` or pull it before running this command")]
    MissingImage { image: String },

    /// The cidfile side-channel was empty after a run that needed the handle
    #[error("Container id was not captured; the engine may have exited before writing it")]
    ContainerUnknown,

    /// Unrecognized runtime name
    #[error("Unknown runtime `{name}`. Supported runtimes: docker, podman")]
    UnknownRuntime { name: String },

    /// Scratch file handling around an engine invocation failed
    #[error("Engine I/O error")]
    Io(#[from] std::io::Error),
}

/// Workflow errors
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Workflow references a step with no known handler
    #[error("Unknown workflow step `{name}`")]
    UnknownStep { name: String },
}

/// Main error enum wrapping all domain-specific errors
#[derive(Error, Debug)]
pub enum RoleboxError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Container engine errors
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Workflow errors
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),
}

/// Convenience type alias for Results with RoleboxError
pub type Result<T> = std::result::Result<T, RoleboxError>;
