//! Rockscan Domain Layer
//!
//! This crate contains the core vocabulary of the rock scanner. It depends on
//! nothing but `uuid` and defines the value objects and trait interfaces that
//! the capture, analysis, session and presentation layers share.
//!
//! ## Key Concepts
//!
//! - **Operating mode**: Field (macro, outdoor) vs Lab (thin section, microscope)
//! - **Access tier**: Student vs Researcher, gates narrative depth and visible fields
//! - **Basin**: a closed catalog of regional contexts passed to the model as hints
//! - **Analysis result**: the validated report decoded from the remote model
//! - **Field log**: in-memory, insertion-ordered observation records
//!
//! ## Architecture
//!
//! - Pure data and validation only
//! - Hardware and network live behind the traits in [`traits`]
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod basin;
pub mod field_log;
pub mod media;
pub mod mode;
pub mod score;
pub mod tier;
pub mod traits;

// Re-exports for convenience
pub use analysis::{AnalysisResult, PhysicalProperties, Provenance};
pub use basin::{Basin, BasinId, BASINS};
pub use field_log::{EntryId, FieldLogEntry};
pub use media::{CaptureConstraints, EncodedImage, Facing, Frame};
pub use mode::OperatingMode;
pub use score::UnitScore;
pub use tier::AccessTier;
pub use traits::DeviceFault;
