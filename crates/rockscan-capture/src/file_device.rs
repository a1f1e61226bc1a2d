//! File-backed video source
//!
//! Stands in for a camera on machines without one: a single image file is a
//! static feed, a directory of images is replayed in name order, looping.

use image::imageops::FilterType;
use rockscan_domain::traits::{VideoDevice, VideoStream};
use rockscan_domain::{CaptureConstraints, DeviceFault, Frame};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

const FRAME_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "tif", "tiff"];

/// A video device reading frames from an image file or directory
///
/// Only one stream may be open at a time; a second `open` while a stream is
/// live fails with [`DeviceFault::DeviceBusy`]. A device with no path
/// behaves like a machine without a camera: every `open` is
/// [`DeviceFault::NoDevice`].
#[derive(Debug, Clone)]
pub struct FileDevice {
    path: Option<PathBuf>,
    in_use: Arc<AtomicBool>,
}

impl FileDevice {
    /// Create a device for the given file or directory
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            in_use: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a device with no frame source
    pub fn unconfigured() -> Self {
        Self {
            path: None,
            in_use: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Path frames are read from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn list_frames(&self) -> Result<Vec<PathBuf>, DeviceFault> {
        let Some(path) = &self.path else {
            warn!("No frame source configured");
            return Err(DeviceFault::NoDevice);
        };
        let metadata = std::fs::metadata(path).map_err(io_fault)?;

        if metadata.is_file() {
            return Ok(vec![path.clone()]);
        }

        let mut frames: Vec<PathBuf> = std::fs::read_dir(path)
            .map_err(io_fault)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && has_frame_extension(p))
            .collect();
        frames.sort();

        if frames.is_empty() {
            return Err(DeviceFault::NoDevice);
        }
        Ok(frames)
    }
}

impl VideoDevice for FileDevice {
    type Stream = FileStream;

    fn open(&mut self, constraints: &CaptureConstraints) -> Result<FileStream, DeviceFault> {
        let frames = self.list_frames()?;

        if self
            .in_use
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(DeviceFault::DeviceBusy);
        }

        debug!(
            "Facing '{}' ignored for file source",
            constraints.facing.as_str()
        );
        info!("Opened file source ({} frame(s))", frames.len());

        Ok(FileStream {
            frames,
            cursor: 0,
            max_width: constraints.ideal_width,
            max_height: constraints.ideal_height,
            in_use: Some(Arc::clone(&self.in_use)),
        })
    }
}

/// Live stream over a [`FileDevice`]
#[derive(Debug)]
pub struct FileStream {
    frames: Vec<PathBuf>,
    cursor: usize,
    max_width: u32,
    max_height: u32,
    in_use: Option<Arc<AtomicBool>>,
}

impl FileStream {
    fn load(&self, path: &Path) -> Option<Frame> {
        let mut img = match image::open(path) {
            Ok(img) => img,
            Err(e) => {
                warn!("Skipping unreadable frame {}: {}", path.display(), e);
                return None;
            }
        };

        if img.width() > self.max_width || img.height() > self.max_height {
            img = img.resize(self.max_width, self.max_height, FilterType::Triangle);
        }

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        Frame::new(width, height, rgb.into_raw()).ok()
    }
}

impl VideoStream for FileStream {
    fn latest_frame(&mut self) -> Option<Frame> {
        self.in_use.as_ref()?;

        // Try each frame at most once per call so a bad file can't spin forever.
        for _ in 0..self.frames.len() {
            let path = self.frames[self.cursor].clone();
            self.cursor = (self.cursor + 1) % self.frames.len();
            if let Some(frame) = self.load(&path) {
                return Some(frame);
            }
        }
        None
    }

    fn stop(&mut self) {
        if let Some(flag) = self.in_use.take() {
            flag.store(false, Ordering::Release);
        }
    }
}

impl Drop for FileStream {
    fn drop(&mut self) {
        self.stop();
    }
}

fn has_frame_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            FRAME_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn io_fault(err: std::io::Error) -> DeviceFault {
    match err.kind() {
        ErrorKind::PermissionDenied => DeviceFault::PermissionDenied,
        _ => DeviceFault::NoDevice,
    }
}
