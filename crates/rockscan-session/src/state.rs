//! Session states and settings

use rockscan_analyzer::AnalysisError;
use rockscan_capture::CaptureUnavailable;
use rockscan_domain::{AccessTier, AnalysisResult, BasinId, OperatingMode};
use thiserror::Error;

/// Why the session is in [`SessionState::Failed`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionFailure {
    /// The camera could not be acquired or read
    #[error(transparent)]
    Capture(#[from] CaptureUnavailable),

    /// The analysis call failed
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Where the session is in the scan cycle
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Camera not acquired
    #[default]
    Idle,
    /// Camera live, ready to scan
    CaptureReady,
    /// One analysis in flight
    Analyzing,
    /// A validated result is on display
    ResultReady(AnalysisResult),
    /// Capture or analysis failed; the operator may retry
    Failed(SessionFailure),
}

impl SessionState {
    /// State name
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::CaptureReady => "CaptureReady",
            SessionState::Analyzing => "Analyzing",
            SessionState::ResultReady(_) => "ResultReady",
            SessionState::Failed(_) => "Failed",
        }
    }

    /// Result on display, if any
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            SessionState::ResultReady(result) => Some(result),
            _ => None,
        }
    }

    /// Failure reason, if any
    pub fn failure(&self) -> Option<&SessionFailure> {
        match self {
            SessionState::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Mode, tier and basin for the next analysis
///
/// Changing these never triggers a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanSettings {
    /// Imaging mode
    pub mode: OperatingMode,
    /// Access tier
    pub tier: AccessTier,
    /// Regional context
    pub basin: BasinId,
}
