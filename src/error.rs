//! Error types for the Socrates wizard.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Entry step '{0}' not found in the questions catalog")]
    MissingEntryStep(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to read {source_name}: {reason}")]
    Csv { source_name: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while walking the step flow.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Unknown step: {0}")]
    StepNotFound(String),

    #[error("No summary mapping found for summary id: {0}")]
    SummaryNotFound(String),

    #[error("Unknown step type '{kind}' at step '{step_id}'")]
    UnknownStepKind { step_id: String, kind: String },

    #[error("Summary step '{0}' has no trigger summary id")]
    NoSummaryTrigger(String),

    #[error("Step '{0}' is not a summary step")]
    NotASummaryStep(String),

    #[error("No session started")]
    NotStarted,

    #[error("Project name must not be empty")]
    EmptyProjectName,
}

impl FlowError {
    /// Whether this is one of the lookup failures (unknown step or summary).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::StepNotFound(_) | Self::SummaryNotFound(_))
    }
}

/// Text-generation provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },
}

/// Checkpoint decoding errors.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("Malformed checkpoint: {0}")]
    Malformed(String),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
