//! Rockscan Session State
//!
//! A single owner for the camera, the scan cycle, the scan settings and the
//! in-memory field log.
//!
//! # States
//!
//! ```text
//!            start ok                 begin_scan            complete Ok
//!   Idle ────────────▶ CaptureReady ────────────▶ Analyzing ───────────▶ ResultReady
//!    │ ▲                    ▲                         │                     │
//!    │ └── retry ──┐        └──────── dismiss ────────┼─────────────────────┘
//!    │ start err   │                                  │ complete Err
//!    └──────────▶ Failed ◀────────────────────────────┘
//! ```
//!
//! At most one analysis is in flight. A second scan request is ignored, not
//! queued. The camera is released exactly once per acquisition: on retry,
//! on teardown, or when the session is dropped.
//!
//! The session never runs the analysis itself unless asked to via
//! [`Session::scan`]; [`Session::begin_scan`] and [`Session::complete_scan`]
//! let a caller drive the remote call on its own schedule.

#![warn(missing_docs)]

mod error;
mod notes;
mod observer;
mod session;
mod state;


pub use error::SessionError;
pub use notes::{FieldNotes, UNMEASURED};
pub use observer::SessionObserver;
pub use session::{ScanJob, ScanTicket, Session};
pub use state::{ScanSettings, SessionFailure, SessionState};
