//! Render-on-transition hooks

use crate::state::SessionState;
use rockscan_domain::FieldLogEntry;

/// Notified after every state transition and log append
///
/// Observers are called synchronously, in subscription order, after the
/// session has committed the change.
pub trait SessionObserver {
    /// The session entered `state`
    fn on_transition(&self, state: &SessionState);

    /// `entry` was appended to the field log
    fn on_log_appended(&self, _entry: &FieldLogEntry) {}
}
