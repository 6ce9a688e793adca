//! Linear-prediction coefficient estimation
//!
//! The estimation pipeline treats LPC fitting as a replaceable oracle: any
//! implementation that returns a monic all-pole filter of the requested
//! order satisfies the contract. The default is Burg's method, fitting
//! forward and backward prediction errors jointly; it needs no explicit
//! autocorrelation and behaves well on the short residuals this pipeline
//! produces.

use crate::{GfmIaifError, Result};

/// Oracle fitting a monic all-pole filter to a windowed signal
///
/// Implementations return `[1, a1, ..., a_order]` such that
/// `A(z) = 1 + a1 z^-1 + ... + a_order z^-order` minimizes the prediction
/// residual of `samples`, or [`GfmIaifError::DegenerateFrame`] when the
/// input has too little energy or rank for a fit.
pub trait LpcEstimator {
    /// Fit an all-pole filter of the given order to `samples`.
    fn estimate(&self, samples: &[f64], order: usize) -> Result<Vec<f64>>;
}

/// Burg's method: the default [`LpcEstimator`]
///
/// The reflection coefficient at each order is estimated from the forward
/// and backward prediction-error vectors. The error power is recomputed
/// from those vectors at every order, so it is a true sum of squares and
/// rank loss surfaces as a zero denominator rather than a negative one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Burg;

impl LpcEstimator for Burg {
    fn estimate(&self, samples: &[f64], order: usize) -> Result<Vec<f64>> {
        let mut ar = vec![0.0; order + 1];
        ar[0] = 1.0;
        if order == 0 {
            return Ok(ar);
        }
        if samples.len() < 2 {
            return Err(GfmIaifError::DegenerateFrame(format!(
                "cannot fit order {} to {} samples",
                order,
                samples.len()
            )));
        }

        let mut fwd: Vec<f64> = samples[1..].to_vec();
        let mut bwd: Vec<f64> = samples[..samples.len() - 1].to_vec();

        for i in 0..order {
            let mut den = 0.0;
            for &v in &fwd {
                den += v * v;
            }
            for &v in &bwd {
                den += v * v;
            }
            if den <= 0.0 || !den.is_finite() {
                return Err(GfmIaifError::DegenerateFrame(format!(
                    "prediction error power is {} at order {}",
                    den,
                    i + 1
                )));
            }

            let mut num = 0.0;
            for (&f, &b) in fwd.iter().zip(bwd.iter()) {
                num += b * f;
            }
            let reflect = -2.0 * num / den;

            let prev = ar.clone();
            for j in 1..=i + 1 {
                ar[j] = prev[j] + reflect * prev[i + 1 - j];
            }

            // Update error vectors, then drop the first forward and last
            // backward sample for the next order.
            let fwd_new: Vec<f64> = fwd
                .iter()
                .zip(bwd.iter())
                .map(|(&f, &b)| f + reflect * b)
                .collect();
            let bwd_new: Vec<f64> = fwd
                .iter()
                .zip(bwd.iter())
                .map(|(&f, &b)| b + reflect * f)
                .collect();
            fwd = fwd_new[1..].to_vec();
            bwd = bwd_new[..bwd_new.len() - 1].to_vec();
        }

        Ok(ar)
    }
}
