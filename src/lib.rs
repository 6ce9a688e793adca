//! gfm-iaif: Glottal Flow Model-based Iterative Adaptive Inverse Filtering
//!
//! This library estimates, from a single frame of a speech waveform, the
//! linear-prediction filters of the three cascaded contributions to the
//! speech spectrum: lip radiation, vocal-tract resonance, and glottal
//! source. It is intended as a preprocessing stage for voice-source
//! analysis (e.g., vocal effort or tenseness estimation).
//!
//! # Pipeline
//!
//! 1. Pad the frame with a symmetric ramp and cancel lip radiation with a
//!    leaky integrator (`[1, -d]`).
//! 2. Build a gross glottis estimate as a cascade of first-order filters,
//!    each fit on the residual left by the current cascade.
//! 3. Re-estimate a single compact glottis filter on the residual after
//!    the gross cascade.
//! 4. Estimate the vocal-tract filter on the residual after the fine
//!    glottis filter.
//!
//! # Example
//!
//! ```
//! use gfm_iaif::{estimate, Parameters};
//!
//! let frame: Vec<f64> = (1..=200).map(|k| k as f64 / 200.0).collect();
//! let params = Parameters { nv: 16, ..Parameters::default() };
//! let result = estimate(&frame, &params).unwrap();
//!
//! assert_eq!(result.vocal_tract().len(), 17);
//! assert_eq!(result.glottis().len(), 4);
//! assert_eq!(result.lip_radiation(), [1.0, -0.99]);
//! ```

pub mod estimate;
pub mod filter;
pub mod frame;
pub mod glottis;
pub mod lpc;
pub mod stability;
pub mod vocal_tract;
pub mod window;

// Re-export main types at crate root
pub use estimate::{estimate, Estimation, FilterStage, GfmIaif, Parameters, StabilityWarning};
pub use lpc::{Burg, LpcEstimator};
pub use window::WindowShape;

use thiserror::Error;

/// Errors that can occur during GFM-IAIF estimation
#[derive(Error, Debug)]
pub enum GfmIaifError {
    /// A parameter or input shape failed validation before any filtering.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An LPC fit encountered a signal segment with insufficient energy or
    /// rank to produce an estimate. The frame should be skipped; retrying
    /// with the same input cannot succeed.
    #[error("Degenerate frame: {0}")]
    DegenerateFrame(String),
}

pub type Result<T> = std::result::Result<T, GfmIaifError>;
