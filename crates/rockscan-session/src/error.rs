//! Error types for session intents

use thiserror::Error;

/// An intent that does not apply to the current state
///
/// Failures of capture or analysis are never reported here; they are
/// states ([`SessionState::Failed`](crate::SessionState::Failed)).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The intent is not valid from the current state
    #[error("Cannot {intent} while {state}")]
    InvalidTransition {
        /// Intent that was attempted
        intent: &'static str,
        /// State it was attempted in
        state: &'static str,
    },

    /// The session was torn down
    #[error("Session has been torn down")]
    TornDown,
}
