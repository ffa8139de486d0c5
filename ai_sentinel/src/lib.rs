//! AI Sentinel
//!
//! Serves an informational page about the security risks of everyday AI tool
//! usage, and analyzes free-text usage scenarios through an external
//! generative-AI assessment service.

pub mod analysis;
pub mod analyzer;
pub mod assessment;
pub mod config;
pub mod content;
pub mod error;
pub mod logging;
pub mod page;
pub mod server;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use analysis::{Recommendation, RiskLevel, ScenarioAnalysis, Threat};
pub use analyzer::{AnalyzerState, ScenarioAnalyzer, SkipReason, SubmitOutcome};
pub use assessment::AssessmentService;
pub use assessment::gemini::GeminiService;
pub use error::AnalyzerError;

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Top-level configuration for AI Sentinel
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SentinelConfig {
    /// Assessment service settings
    pub assessment: AssessmentConfig,
    /// Page server settings
    pub server: ServerConfig,
}

/// Settings for the external assessment service
#[derive(Clone, Deserialize, Serialize)]
pub struct AssessmentConfig {
    /// Access credential. Usually supplied through the `API_KEY` environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model identifier sent with every request
    pub model: String,
    /// Base URL of the generative language API
    pub endpoint: String,
    /// Transport timeout for a single request
    pub timeout_secs: u64,
}

impl AssessmentConfig {
    /// The configured credential, or `ConfigurationMissing` when none is set.
    pub fn credential(&self) -> Result<&str, AnalyzerError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(AnalyzerError::ConfigurationMissing)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// Keeps the credential out of debug logs.
impl std::fmt::Debug for AssessmentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssessmentConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Settings for the page server
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub listen_addr: String,
    /// Views without activity for this long are dropped
    pub view_idle_secs: u64,
    /// Upper bound on views held in memory at once
    pub max_views: usize,
}

impl ServerConfig {
    pub fn view_idle(&self) -> Duration {
        Duration::from_secs(self.view_idle_secs)
    }
}
