//! Per-view scenario analyzer.
//!
//! Each view owns one [`ScenarioAnalyzer`]. It holds the only mutable state of
//! the analysis feature as a closed state machine:
//!
//! ```text
//! Idle -> Busy -> Success(analysis) | Failure(message) -> Idle
//! ```
//!
//! A submission moves to `Busy` and clears any previous result or error. At
//! most one request is in flight per view; further submissions are skipped
//! until it settles. Every request carries a generation number so a response
//! that arrives after the view was closed is dropped instead of applied.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::analysis::ScenarioAnalysis;
use crate::assessment::AssessmentService;
use crate::assessment::gemini::GeminiService;
use crate::error::{AnalyzerError, CONFIGURATION_MISSING_MESSAGE};
use crate::AssessmentConfig;

/// What a view currently shows in its analyzer panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum AnalyzerState {
    Idle,
    Busy,
    Success(ScenarioAnalysis),
    Failure(String),
}

impl AnalyzerState {
    pub fn is_busy(&self) -> bool {
        matches!(self, AnalyzerState::Busy)
    }

    pub fn status(&self) -> &'static str {
        match self {
            AnalyzerState::Idle => "idle",
            AnalyzerState::Busy => "busy",
            AnalyzerState::Success(_) => "success",
            AnalyzerState::Failure(_) => "failure",
        }
    }

    pub fn analysis(&self) -> Option<&ScenarioAnalysis> {
        match self {
            AnalyzerState::Success(analysis) => Some(analysis),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            AnalyzerState::Failure(message) => Some(message),
            _ => None,
        }
    }
}

/// Why a submission did not issue a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The text was empty after trimming.
    EmptyInput,
    /// Another request for this view is still in flight.
    Busy,
    /// The view was closed.
    Closed,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Skipped(SkipReason),
    Analyzed(ScenarioAnalysis),
    Failed(AnalyzerError),
    /// The response arrived after the view was closed and was not applied.
    Discarded,
}

#[derive(Debug)]
struct Slot {
    state: AnalyzerState,
    generation: u64,
    closed: bool,
}

pub struct ScenarioAnalyzer {
    service: Option<Arc<dyn AssessmentService>>,
    slot: Mutex<Slot>,
}

impl std::fmt::Debug for ScenarioAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioAnalyzer")
            .field("provider", &self.service.as_ref().map(|s| s.provider_id()))
            .field("slot", &*self.slot())
            .finish()
    }
}

impl ScenarioAnalyzer {
    pub fn new(service: Arc<dyn AssessmentService>) -> Self {
        Self::with_service(Some(service))
    }

    /// An analyzer without a credential: every submission reports
    /// `ConfigurationMissing` and no request is made.
    pub fn unconfigured() -> Self {
        Self::with_service(None)
    }

    /// Build a Gemini-backed analyzer, failing fast when no credential is set.
    pub fn from_config(config: &AssessmentConfig) -> Result<Self, AnalyzerError> {
        let service = GeminiService::from_config(config)?;
        Ok(Self::new(Arc::new(service)))
    }

    fn with_service(service: Option<Arc<dyn AssessmentService>>) -> Self {
        Self {
            service,
            slot: Mutex::new(Slot {
                state: AnalyzerState::Idle,
                generation: 0,
                closed: false,
            }),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn has_credential(&self) -> bool {
        self.service.is_some()
    }

    pub fn state(&self) -> AnalyzerState {
        self.slot().state.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.slot().state.is_busy()
    }

    pub fn is_closed(&self) -> bool {
        self.slot().closed
    }

    /// Whether the submit affordance should be enabled for `text`.
    pub fn can_submit(&self, text: &str) -> bool {
        let slot = self.slot();
        !slot.closed && !slot.state.is_busy() && !text.trim().is_empty()
    }

    /// Analyze `text` with the assessment service.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        if text.trim().is_empty() {
            return SubmitOutcome::Skipped(SkipReason::EmptyInput);
        }

        let (service, generation) = {
            let mut slot = self.slot();
            if slot.closed {
                return SubmitOutcome::Skipped(SkipReason::Closed);
            }
            if slot.state.is_busy() {
                crate::log_debug!("Submission ignored while a request is in flight");
                return SubmitOutcome::Skipped(SkipReason::Busy);
            }
            let Some(service) = self.service.clone() else {
                crate::log_warn!("Analysis requested but no assessment credential is configured");
                slot.state = AnalyzerState::Failure(CONFIGURATION_MISSING_MESSAGE.to_string());
                return SubmitOutcome::Failed(AnalyzerError::ConfigurationMissing);
            };
            slot.generation += 1;
            slot.state = AnalyzerState::Busy;
            (service, slot.generation)
        };

        let mut in_flight = InFlight {
            analyzer: self,
            generation,
            settled: false,
        };
        let result = service.assess(text).await;
        in_flight.settled = true;

        let mut slot = self.slot();
        if slot.closed || slot.generation != generation {
            crate::log_debug!("Dropping response for generation {} of a closed view", generation);
            return SubmitOutcome::Discarded;
        }

        match result {
            Ok(analysis) => {
                slot.state = AnalyzerState::Success(analysis.clone());
                SubmitOutcome::Analyzed(analysis)
            }
            Err(cause) => {
                crate::log_error!(
                    "Scenario analysis via {} failed: {:#}",
                    service.provider_id(),
                    cause
                );
                let err = AnalyzerError::ServiceFailure(cause);
                slot.state = AnalyzerState::Failure(err.user_message().to_string());
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// The input changed: a shown result or error is cleared.
    pub fn edit_input(&self) -> bool {
        let mut slot = self.slot();
        match slot.state {
            AnalyzerState::Success(_) | AnalyzerState::Failure(_) => {
                slot.state = AnalyzerState::Idle;
                true
            }
            AnalyzerState::Idle | AnalyzerState::Busy => false,
        }
    }

    /// Tear the view down. A response still in flight will be discarded.
    pub fn close(&self) {
        let mut slot = self.slot();
        slot.closed = true;
        slot.generation += 1;
        slot.state = AnalyzerState::Idle;
    }
}

/// Returns the view to `Idle` if a submission is abandoned mid-request.
struct InFlight<'a> {
    analyzer: &'a ScenarioAnalyzer,
    generation: u64,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut slot = self.analyzer.slot();
        if slot.generation == self.generation && slot.state.is_busy() {
            crate::log_debug!("Submission abandoned before the service replied");
            slot.state = AnalyzerState::Idle;
        }
    }
}
