//! Exclusive access to a video source

use crate::encode::encode_jpeg;
use crate::error::CaptureUnavailable;
use rockscan_domain::traits::{VideoDevice, VideoStream};
use rockscan_domain::{CaptureConstraints, DeviceFault, EncodedImage};
use tracing::{debug, info, warn};

/// Owns a video device and at most one live stream from it
///
/// The stream is stopped exactly once per successful [`acquire`](Self::acquire):
/// on [`release`](Self::release), on re-acquire, or on drop, whichever comes
/// first.
pub struct CaptureSurface<D: VideoDevice> {
    device: D,
    constraints: CaptureConstraints,
    stream: Option<D::Stream>,
}

impl<D: VideoDevice> CaptureSurface<D> {
    /// Create an inactive surface over `device`
    pub fn new(device: D, constraints: CaptureConstraints) -> Self {
        Self {
            device,
            constraints,
            stream: None,
        }
    }

    /// Constraints used on acquire
    pub fn constraints(&self) -> &CaptureConstraints {
        &self.constraints
    }

    /// Borrow the underlying device
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Whether a live stream is held
    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    /// Request the video source
    ///
    /// Any stream already held is released first.
    pub fn acquire(&mut self) -> Result<(), CaptureUnavailable> {
        self.release();

        match self.device.open(&self.constraints) {
            Ok(stream) => {
                info!(
                    "Capture acquired ({}x{} ideal, facing {})",
                    self.constraints.ideal_width,
                    self.constraints.ideal_height,
                    self.constraints.facing.as_str()
                );
                self.stream = Some(stream);
                Ok(())
            }
            Err(fault) => {
                warn!("Capture unavailable: {}", fault);
                Err(CaptureUnavailable::from(fault))
            }
        }
    }

    /// Snapshot the most recent frame as a JPEG still
    pub fn capture_still(&mut self) -> Result<EncodedImage, CaptureUnavailable> {
        let stream = self.stream.as_mut().ok_or(DeviceFault::Released)?;
        let frame = stream.latest_frame().ok_or(DeviceFault::NoFrame)?;

        let still = encode_jpeg(&frame, self.constraints.jpeg_quality).map_err(|e| {
            warn!("{}", e);
            DeviceFault::EncodeFailed
        })?;

        debug!(
            "Captured {}x{} still ({} bytes)",
            frame.width,
            frame.height,
            still.len()
        );
        Ok(still)
    }

    /// Stop the stream if one is held; safe to call repeatedly
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            info!("Capture released");
        }
    }
}

impl<D: VideoDevice> Drop for CaptureSurface<D> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<D: VideoDevice + std::fmt::Debug> std::fmt::Debug for CaptureSurface<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSurface")
            .field("device", &self.device)
            .field("constraints", &self.constraints)
            .field("active", &self.is_active())
            .finish()
    }
}
