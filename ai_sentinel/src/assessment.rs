pub mod gemini;
pub mod prompt;

use anyhow::Result;
use async_trait::async_trait;

use crate::analysis::ScenarioAnalysis;

/// External service that turns a scenario description into a risk assessment.
#[async_trait]
pub trait AssessmentService: Send + Sync {
    fn provider_id(&self) -> &'static str;
    fn model_name(&self) -> &str;

    /// Issue exactly one request for `scenario`. No retries.
    async fn assess(&self, scenario: &str) -> Result<ScenarioAnalysis>;
}
