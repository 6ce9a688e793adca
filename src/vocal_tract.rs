//! Vocal-tract resonance estimation
//!
//! The final estimation pass: once the fine glottis filter is known, the
//! remaining spectral envelope of the residual is attributed to the vocal
//! tract and captured by a single order-`nv` fit.

use crate::frame::PreprocessedFrame;
use crate::glottis::windowed;
use crate::lpc::LpcEstimator;
use crate::Result;

/// Estimate the order-`nv` vocal-tract filter
///
/// Inverse-filters the padded integrated signal through the fine glottis
/// filter, strips the pre-frame, and fits an order-`nv` model on the
/// windowed residual. Returns `nv + 1` monic coefficients.
pub fn estimate_fine_vocal_tract<E: LpcEstimator>(
    lpc: &E,
    pre: &PreprocessedFrame,
    window: &[f64],
    fine_glottis: &[f64],
    nv: usize,
) -> Result<Vec<f64>> {
    let residual = pre.residual(fine_glottis);
    lpc.estimate(&windowed(&residual, window), nv)
}
