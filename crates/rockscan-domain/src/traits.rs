//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and the outside
//! world (camera hardware, hosted inference). Implementations live in other
//! crates.

use crate::{CaptureConstraints, EncodedImage, Frame};
use std::fmt;
use std::future::Future;

/// Why a still could not be captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFault {
    /// The operator or platform refused access
    PermissionDenied,
    /// Another process holds the device
    DeviceBusy,
    /// No matching device exists
    NoDevice,
    /// The stream is live but has not produced a frame
    NoFrame,
    /// The surface was used after release
    Released,
    /// The frame could not be compressed for transmission
    EncodeFailed,
}

impl fmt::Display for DeviceFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DeviceFault::PermissionDenied => "permission denied",
            DeviceFault::DeviceBusy => "device busy",
            DeviceFault::NoDevice => "no device present",
            DeviceFault::NoFrame => "no frame available",
            DeviceFault::Released => "capture released",
            DeviceFault::EncodeFailed => "frame encoding failed",
        };
        f.write_str(text)
    }
}

/// A hardware (or simulated) video source
///
/// Implemented by the capture layer (rockscan-capture)
pub trait VideoDevice {
    /// Live stream handle returned on a successful open
    type Stream: VideoStream;

    /// Request access with the given constraints
    fn open(&mut self, constraints: &CaptureConstraints) -> Result<Self::Stream, DeviceFault>;
}

/// A live frame stream, valid until stopped
pub trait VideoStream {
    /// Most recent frame, if the stream has produced one
    fn latest_frame(&mut self) -> Option<Frame>;

    /// Stop the underlying source and free the device
    fn stop(&mut self);
}

/// Trait for hosted multimodal inference
///
/// Implemented by the infrastructure layer (rockscan-llm)
pub trait VisionProvider {
    /// Error type for provider operations
    type Error;

    /// Model identifier requests are sent to
    fn model(&self) -> &str;

    /// Generate a JSON document from an instruction and an inline image,
    /// constrained by `schema` (a JSON schema document)
    fn generate_structured(
        &self,
        instruction: &str,
        image: &EncodedImage,
        schema: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
