//! Error types for the capture surface

use rockscan_domain::DeviceFault;
use thiserror::Error;

/// The camera could not deliver a still
///
/// Permission, busy and missing-device cases are deliberately one error type;
/// the `fault` is kept for logging only.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Camera unavailable: {fault}")]
pub struct CaptureUnavailable {
    /// Underlying cause
    pub fault: DeviceFault,
}

impl From<DeviceFault> for CaptureUnavailable {
    fn from(fault: DeviceFault) -> Self {
        Self { fault }
    }
}
