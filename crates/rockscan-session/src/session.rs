//! The session state owner

use crate::error::SessionError;
use crate::notes::FieldNotes;
use crate::observer::SessionObserver;
use crate::state::{ScanSettings, SessionFailure, SessionState};
use rockscan_analyzer::{AnalysisError, Analyzer};
use rockscan_capture::CaptureSurface;
use rockscan_domain::traits::{VideoDevice, VisionProvider};
use rockscan_domain::{AccessTier, AnalysisResult, BasinId, EncodedImage, FieldLogEntry, OperatingMode};
use rockscan_llm::LlmError;
use tracing::{debug, info, warn};

/// Identifies one scan; completions carrying an older ticket are discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanTicket(u64);

/// Everything needed to run one analysis outside the session
#[derive(Debug, Clone)]
pub struct ScanJob {
    /// Ticket to hand back to [`Session::complete_scan`]
    pub ticket: ScanTicket,
    /// The captured still
    pub image: EncodedImage,
    /// Settings in force when the scan began
    pub settings: ScanSettings,
}

/// Holds the capture surface, scan state, settings and field log
///
/// Every mutation is a named intent. Observers are notified after each
/// transition.
pub struct Session<D: VideoDevice> {
    capture: CaptureSurface<D>,
    state: SessionState,
    settings: ScanSettings,
    log: Vec<FieldLogEntry>,
    observers: Vec<Box<dyn SessionObserver>>,
    next_ticket: u64,
    in_flight: Option<ScanTicket>,
    torn_down: bool,
}

impl<D: VideoDevice> Session<D> {
    /// Create an idle session over `capture`
    pub fn new(capture: CaptureSurface<D>, settings: ScanSettings) -> Self {
        Self {
            capture,
            state: SessionState::Idle,
            settings,
            log: Vec::new(),
            observers: Vec::new(),
            next_ticket: 0,
            in_flight: None,
            torn_down: false,
        }
    }

    /// Current state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Settings for the next analysis
    pub fn settings(&self) -> &ScanSettings {
        &self.settings
    }

    /// Field log, in insertion order
    pub fn log(&self) -> &[FieldLogEntry] {
        &self.log
    }

    /// Whether the camera is held
    pub fn capture_active(&self) -> bool {
        self.capture.is_active()
    }

    /// Register an observer
    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Acquire the camera: `Idle -> CaptureReady | Failed(Capture)`
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.ensure_live()?;
        if self.state != SessionState::Idle {
            return Err(self.invalid("start"));
        }

        match self.capture.acquire() {
            Ok(()) => self.transition(SessionState::CaptureReady),
            Err(e) => self.transition(SessionState::Failed(SessionFailure::Capture(e))),
        }
        Ok(())
    }

    /// From `Failed`, release the camera, return to `Idle` and re-acquire
    pub fn retry(&mut self) -> Result<(), SessionError> {
        self.ensure_live()?;
        if !matches!(self.state, SessionState::Failed(_)) {
            return Err(self.invalid("retry"));
        }

        info!("Retrying capture");
        self.capture.release();
        self.transition(SessionState::Idle);
        self.start()
    }

    /// Snapshot a still and enter `Analyzing`
    ///
    /// Allowed from `CaptureReady`, or from an analysis failure while the
    /// camera is still live. Returns `None` otherwise, including while a scan
    /// is already in flight; nothing is queued.
    pub fn begin_scan(&mut self) -> Option<ScanJob> {
        if self.torn_down || self.in_flight.is_some() {
            debug!("Scan ignored: {}", self.state.name());
            return None;
        }

        let ready = match &self.state {
            SessionState::CaptureReady => true,
            SessionState::Failed(SessionFailure::Analysis(_)) => self.capture.is_active(),
            _ => false,
        };
        if !ready {
            debug!("Scan ignored: {}", self.state.name());
            return None;
        }

        let image = match self.capture.capture_still() {
            Ok(image) => image,
            Err(e) => {
                warn!("Still capture failed: {}", e);
                self.transition(SessionState::Failed(SessionFailure::Capture(e)));
                return None;
            }
        };

        self.next_ticket += 1;
        let ticket = ScanTicket(self.next_ticket);
        self.in_flight = Some(ticket);
        self.transition(SessionState::Analyzing);

        Some(ScanJob {
            ticket,
            image,
            settings: self.settings,
        })
    }

    /// Apply the outcome of a scan: `Analyzing -> ResultReady | Failed(Analysis)`
    ///
    /// Returns `false` (and drops the outcome) if the ticket is not the one in
    /// flight or the session was torn down.
    pub fn complete_scan(
        &mut self,
        ticket: ScanTicket,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> bool {
        if self.torn_down || self.in_flight != Some(ticket) {
            debug!("Discarding stale scan outcome {:?}", ticket);
            return false;
        }

        self.in_flight = None;
        match outcome {
            Ok(result) => self.transition(SessionState::ResultReady(result)),
            Err(e) => {
                warn!("Analysis failed: {}", e);
                self.transition(SessionState::Failed(SessionFailure::Analysis(e)))
            }
        }
        true
    }

    /// Begin a scan, run it through `analyzer`, and apply the outcome
    ///
    /// Returns whether a scan was run.
    pub async fn scan<P>(&mut self, analyzer: &Analyzer<P>) -> bool
    where
        P: VisionProvider<Error = LlmError> + Send + Sync,
    {
        let Some(job) = self.begin_scan() else {
            return false;
        };

        let outcome = analyzer
            .analyze(
                &job.image,
                job.settings.mode,
                job.settings.tier,
                job.settings.basin.basin(),
            )
            .await;
        self.complete_scan(job.ticket, outcome)
    }

    /// Put the result away: `ResultReady -> CaptureReady`
    pub fn dismiss(&mut self) -> Result<(), SessionError> {
        self.ensure_live()?;
        if self.state.result().is_none() {
            return Err(self.invalid("dismiss"));
        }
        self.transition(SessionState::CaptureReady);
        Ok(())
    }

    /// Record the result on display in the field log
    ///
    /// The state is unchanged. Returns the appended entry.
    pub fn add_to_log(&mut self, notes: FieldNotes) -> Result<FieldLogEntry, SessionError> {
        self.ensure_live()?;
        let Some(result) = self.state.result() else {
            return Err(self.invalid("add to log"));
        };

        let entry = notes.into_entry(result);
        self.log.push(entry.clone());
        info!("Logged {} ({} entries)", entry.id.short(), self.log.len());

        for observer in &self.observers {
            observer.on_log_appended(&entry);
        }
        Ok(entry)
    }

    /// Change the imaging mode for the next analysis
    pub fn set_mode(&mut self, mode: OperatingMode) {
        self.settings.mode = mode;
    }

    /// Change the access tier for the next analysis
    pub fn set_tier(&mut self, tier: AccessTier) {
        self.settings.tier = tier;
    }

    /// Change the regional context for the next analysis
    pub fn set_basin(&mut self, basin: BasinId) {
        self.settings.basin = basin;
    }

    /// Release the camera and stop accepting intents
    ///
    /// A scan still in flight may finish; its outcome is discarded.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.capture.release();
        self.in_flight = None;
        self.torn_down = true;
        self.transition(SessionState::Idle);
        info!("Session torn down");
    }

    fn transition(&mut self, next: SessionState) {
        debug!("{} -> {}", self.state.name(), next.name());
        self.state = next;
        for observer in &self.observers {
            observer.on_transition(&self.state);
        }
    }

    fn ensure_live(&self) -> Result<(), SessionError> {
        if self.torn_down {
            Err(SessionError::TornDown)
        } else {
            Ok(())
        }
    }

    fn invalid(&self, intent: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            intent,
            state: self.state.name(),
        }
    }
}

impl<D: VideoDevice> Drop for Session<D> {
    fn drop(&mut self) {
        self.teardown();
    }
}
