//! Configuration types.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::LlmConfig;

pub const DEFAULT_QUESTIONS_CSV: &str = "data/questions.csv";
pub const DEFAULT_SUMMARIES_CSV: &str = "data/summary_mappings.csv";
pub const DEFAULT_MODEL: &str = "gpt-4.1";
pub const DEFAULT_PORT: u16 = 8501;

/// Application configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Questions sheet (StepID, StepType, QuestionText, NextStepID, TriggerSummaryID).
    pub questions_csv: PathBuf,
    /// Summary mappings sheet (SummaryID, QuestionIDsIncluded, PromptCategoryHint).
    pub summaries_csv: PathBuf,
    pub bind_addr: SocketAddr,
    /// `None` when no credential is configured; summaries then fail on request.
    pub api_key: Option<SecretString>,
    pub model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            questions_csv: PathBuf::from(DEFAULT_QUESTIONS_CSV),
            summaries_csv: PathBuf::from(DEFAULT_SUMMARIES_CSV),
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let port = match var("SOCRATES_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "SOCRATES_PORT".to_string(),
                message: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };
        let ip = match var("SOCRATES_BIND") {
            Some(raw) => raw.parse::<IpAddr>().map_err(|e| ConfigError::InvalidValue {
                key: "SOCRATES_BIND".to_string(),
                message: e.to_string(),
            })?,
            None => defaults.bind_addr.ip(),
        };

        Ok(Self {
            questions_csv: var("SOCRATES_QUESTIONS_CSV")
                .map(PathBuf::from)
                .unwrap_or(defaults.questions_csv),
            summaries_csv: var("SOCRATES_SUMMARIES_CSV")
                .map(PathBuf::from)
                .unwrap_or(defaults.summaries_csv),
            bind_addr: SocketAddr::new(ip, port),
            api_key: var("OPENAI_API_KEY").map(SecretString::from),
            model: var("OPENAI_MODEL").unwrap_or(defaults.model),
        })
    }

    /// Provider settings, if a credential is present.
    pub fn llm_config(&self) -> Option<LlmConfig> {
        self.api_key.as_ref().map(|api_key| LlmConfig {
            api_key: api_key.clone(),
            model: self.model.clone(),
        })
    }
}
