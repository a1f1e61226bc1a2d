//! Rockscan Capture Surface
//!
//! Owns exclusive access to a video source and turns its most recent frame
//! into a JPEG still suitable for transmission.
//!
//! # Architecture
//!
//! ```text
//! VideoDevice --open--> VideoStream --latest_frame--> Frame --encode--> EncodedImage
//! ```
//!
//! Every failure (permission denied, device busy, no device, no frame)
//! collapses into a single [`CaptureUnavailable`] error that callers present
//! as retryable. The stream is stopped exactly once per acquisition, whether
//! the surface is released explicitly, re-acquired, or dropped.
//!
//! # Example Usage
//!
//! ```no_run
//! use rockscan_capture::{CaptureSurface, FileDevice};
//! use rockscan_domain::CaptureConstraints;
//!
//! # fn example() -> Result<(), rockscan_capture::CaptureUnavailable> {
//! let device = FileDevice::new("samples/outcrop.jpg");
//! let mut surface = CaptureSurface::new(device, CaptureConstraints::default());
//!
//! surface.acquire()?;
//! let still = surface.capture_still()?;
//! println!("{} bytes of {}", still.len(), still.mime_type);
//! surface.release();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod encode;
mod error;
mod file_device;
mod mock;
mod surface;

pub use encode::encode_jpeg;
pub use error::CaptureUnavailable;
pub use file_device::{FileDevice, FileStream};
pub use mock::{MockDevice, MockStream};
pub use surface::CaptureSurface;
