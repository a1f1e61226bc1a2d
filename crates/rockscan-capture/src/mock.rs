//! Scripted video device for testing

use rockscan_domain::traits::{VideoDevice, VideoStream};
use rockscan_domain::{CaptureConstraints, DeviceFault, Frame};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock video device
///
/// Open outcomes are consumed in order; once the script is exhausted every
/// open succeeds. Each stream hands out the configured frame. Counters are
/// shared with clones so a test can keep a handle after moving the device
/// into a surface.
#[derive(Debug, Clone)]
pub struct MockDevice {
    outcomes: VecDeque<Result<(), DeviceFault>>,
    frame: Option<Frame>,
    opens: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
}

impl MockDevice {
    /// Device whose streams produce a small uniform frame
    pub fn new() -> Self {
        Self::with_frame(Some(Self::sample_frame()))
    }

    /// Device whose streams produce `frame` (or never produce one)
    pub fn with_frame(frame: Option<Frame>) -> Self {
        Self {
            outcomes: VecDeque::new(),
            frame,
            opens: Arc::new(AtomicUsize::new(0)),
            stops: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Device that refuses every open with `fault` until scripted otherwise
    pub fn failing(fault: DeviceFault, times: usize) -> Self {
        let mut device = Self::new();
        for _ in 0..times {
            device.push_outcome(Err(fault));
        }
        device
    }

    /// Queue the outcome of the next open
    pub fn push_outcome(&mut self, outcome: Result<(), DeviceFault>) {
        self.outcomes.push_back(outcome);
    }

    /// Number of successful opens so far
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Number of `stop` calls across all streams
    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    fn sample_frame() -> Frame {
        let (width, height) = (4, 4);
        let rgb = vec![96; (width * height * 3) as usize];
        Frame { width, height, rgb }
    }
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoDevice for MockDevice {
    type Stream = MockStream;

    fn open(&mut self, _constraints: &CaptureConstraints) -> Result<MockStream, DeviceFault> {
        if let Some(outcome) = self.outcomes.pop_front() {
            outcome?;
        }
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(MockStream {
            frame: self.frame.clone(),
            stops: Arc::clone(&self.stops),
        })
    }
}

/// Stream handed out by [`MockDevice`]
///
/// Every `stop` call is counted, so double stops show up in tests.
#[derive(Debug)]
pub struct MockStream {
    frame: Option<Frame>,
    stops: Arc<AtomicUsize>,
}

impl VideoStream for MockStream {
    fn latest_frame(&mut self) -> Option<Frame> {
        self.frame.clone()
    }

    fn stop(&mut self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}
