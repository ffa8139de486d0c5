use thiserror::Error;

/// Shown when an analysis is attempted without a configured credential.
pub const CONFIGURATION_MISSING_MESSAGE: &str =
    "API Key not found. Please configure the environment.";

/// The single message shown for every service-side failure.
pub const SERVICE_FAILURE_MESSAGE: &str = "分析過程中發生錯誤，請稍後再試。";

/// Shown when a page talks to a view the server no longer holds.
pub const VIEW_EXPIRED_MESSAGE: &str = "此分析工作階段已失效，請再按一次「開始檢測」或重新整理頁面。";

/// Failures surfaced by the scenario analyzer.
///
/// Every failure that reaches a view is one of these two kinds. The cause of a
/// `ServiceFailure` is kept for logging; only [`AnalyzerError::user_message`]
/// is ever shown to the end user.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// No access credential for the assessment service is configured.
    #[error("assessment service credential is not configured")]
    ConfigurationMissing,

    /// Network failure, error response, empty payload or undecodable payload.
    #[error("assessment service failed: {0:#}")]
    ServiceFailure(#[source] anyhow::Error),
}

impl AnalyzerError {
    /// Text safe to present to the end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            AnalyzerError::ConfigurationMissing => CONFIGURATION_MISSING_MESSAGE,
            AnalyzerError::ServiceFailure(_) => SERVICE_FAILURE_MESSAGE,
        }
    }

    /// Stable kind label used in API responses and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyzerError::ConfigurationMissing => "configuration_missing",
            AnalyzerError::ServiceFailure(_) => "service_failure",
        }
    }
}

impl From<anyhow::Error> for AnalyzerError {
    fn from(err: anyhow::Error) -> Self {
        AnalyzerError::ServiceFailure(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_failure_hides_cause_from_user() {
        let err = AnalyzerError::from(anyhow::anyhow!("connection reset by peer"));
        assert_eq!(err.user_message(), SERVICE_FAILURE_MESSAGE);
        assert!(!err.user_message().contains("connection reset"));
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(err.kind(), "service_failure");
    }

    #[test]
    fn configuration_missing_has_its_own_message() {
        let err = AnalyzerError::ConfigurationMissing;
        assert_eq!(err.user_message(), CONFIGURATION_MISSING_MESSAGE);
        assert_eq!(err.kind(), "configuration_missing");
    }
}
