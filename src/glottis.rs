//! Glottal source estimation
//!
//! Two passes. The gross pass approximates a wide-band glottis response
//! as a cascade of first-order filters, each fit on the residual left by
//! the current cascade; fitting one high-order model directly would be
//! numerically sensitive to pitch harmonics in short frames. The fine
//! pass then compresses what the cascade captured into a single compact
//! order-`ng` filter suitable for downstream analysis.

use crate::filter::convolve;
use crate::frame::PreprocessedFrame;
use crate::lpc::LpcEstimator;
use crate::Result;

/// Multiply a signal by the analysis taper. Lengths must agree; callers
/// validate the window against the frame before the pipeline runs.
pub(crate) fn windowed(signal: &[f64], window: &[f64]) -> Vec<f64> {
    debug_assert_eq!(signal.len(), window.len());
    signal.iter().zip(window.iter()).map(|(&s, &w)| s * w).collect()
}

/// Estimate the gross glottis response as a cascade of first-order filters
///
/// Seeds the cascade with an order-1 fit on the windowed integrated frame,
/// then runs `ng` refinement rounds: inverse-filter through the current
/// cascade, strip the pre-frame, fit a new first-order filter on the
/// windowed residual, and fold it into the cascade by polynomial
/// multiplication. The result has `ng + 2` coefficients (`ng + 1`
/// first-order sections).
pub fn estimate_gross_cascade<E: LpcEstimator>(
    lpc: &E,
    pre: &PreprocessedFrame,
    window: &[f64],
    ng: usize,
) -> Result<Vec<f64>> {
    let mut cascade = lpc.estimate(&windowed(pre.integrated(), window), 1)?;
    for _ in 0..ng {
        let residual = pre.residual(&cascade);
        let section = lpc.estimate(&windowed(&residual, window), 1)?;
        cascade = convolve(&cascade, &section);
    }
    Ok(cascade)
}

/// Re-estimate a single order-`ng` glottis filter
///
/// Inverse-filters through the gross cascade, strips the pre-frame, and
/// fits one order-`ng` model on the windowed residual. Returns `ng + 1`
/// monic coefficients.
pub fn estimate_fine_glottis<E: LpcEstimator>(
    lpc: &E,
    pre: &PreprocessedFrame,
    window: &[f64],
    cascade: &[f64],
    ng: usize,
) -> Result<Vec<f64>> {
    let residual = pre.residual(cascade);
    lpc.estimate(&windowed(&residual, window), ng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::preprocess;
    use crate::lpc::Burg;
    use crate::window::hann;

    fn test_frame() -> Vec<f64> {
        (0..160)
            .map(|i| {
                let t = i as f64;
                (0.07 * t).sin() * 0.8 + (0.19 * t + 0.3).sin() * 0.25
            })
            .collect()
    }

    #[test]
    fn test_cascade_length() {
        let frame = test_frame();
        let pre = preprocess(&frame, 10, 0.99).unwrap();
        let win = hann(frame.len());
        for ng in 1..=4 {
            let cascade = estimate_gross_cascade(&Burg, &pre, &win, ng).unwrap();
            assert_eq!(cascade.len(), ng + 2);
            assert_eq!(cascade[0], 1.0);
        }
    }

    #[test]
    fn test_fine_glottis_shape() {
        let frame = test_frame();
        let pre = preprocess(&frame, 10, 0.99).unwrap();
        let win = hann(frame.len());
        let cascade = estimate_gross_cascade(&Burg, &pre, &win, 3).unwrap();
        let ag = estimate_fine_glottis(&Burg, &pre, &win, &cascade, 3).unwrap();
        assert_eq!(ag.len(), 4);
        assert_eq!(ag[0], 1.0);
        assert!(ag.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_cascade_whitens() {
        // The windowed residual after the cascade carries no more energy
        // than the windowed integrated frame it was fit on.
        let frame = test_frame();
        let pre = preprocess(&frame, 10, 0.99).unwrap();
        let win = hann(frame.len());
        let cascade = estimate_gross_cascade(&Burg, &pre, &win, 3).unwrap();
        let residual = pre.residual(&cascade);
        let energy = |s: &[f64]| -> f64 {
            windowed(s, &win).iter().map(|v| v * v).sum()
        };
        assert!(energy(&residual) <= energy(pre.integrated()));
    }

    #[test]
    fn test_zero_frame_is_degenerate() {
        let frame = vec![0.0; 100];
        let pre = preprocess(&frame, 10, 0.99).unwrap();
        let win = hann(frame.len());
        assert!(estimate_gross_cascade(&Burg, &pre, &win, 3).is_err());
    }
}
