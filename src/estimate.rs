//! Estimation driver: parameters, pipeline orchestration, and results
//!
//! The pipeline is strictly linear: preprocess, gross glottis cascade,
//! fine glottis, fine vocal tract, assemble. Each stage is a pure
//! function over its declared inputs; nothing persists across frames, so
//! independent frames can be processed in parallel with no coordination.

use crate::frame::preprocess;
use crate::glottis::{estimate_fine_glottis, estimate_gross_cascade};
use crate::lpc::{Burg, LpcEstimator};
use crate::stability::max_pole_magnitude;
use crate::vocal_tract::estimate_fine_vocal_tract;
use crate::window::hann;
use crate::{GfmIaifError, Result};

/// Tunable parameters for GFM-IAIF estimation
///
/// The [`Default`] implementation provides the suggested values for
/// ordinary speech frames.
#[derive(Debug, Clone)]
pub struct Parameters {
    /// Vocal-tract filter order. The suggested default is `48`.
    pub nv: usize,

    /// Glottis filter order. `3` is strongly recommended: the glottal
    /// flow model behind the cascade assumes a third-order source.
    pub ng: usize,

    /// Leaky-integration coefficient for lip-radiation cancellation,
    /// strictly inside (0, 1). The suggested default is `0.99`.
    pub d: f64,

    /// Analysis taper. `None` selects a symmetric Hann window over the
    /// frame; a supplied window must match the frame length.
    pub window: Option<Vec<f64>>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            nv: 48,
            ng: 3,
            d: 0.99,
            window: None,
        }
    }
}

/// Which estimated filter a warning refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStage {
    /// The order-`nv` vocal-tract filter
    VocalTract,
    /// The order-`ng` fine glottis filter
    Glottis,
}

/// Advisory notice that a returned filter is unstable as a synthesis
/// filter (some pole magnitude reached the unit circle)
///
/// Inverse filtering does not require stability, so estimation still
/// succeeds; consumers that resynthesize through the filter should check
/// for these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityWarning {
    /// The filter concerned
    pub stage: FilterStage,
    /// Its largest pole magnitude (>= 1)
    pub max_pole_magnitude: f64,
}

/// The three estimated filters for one frame
#[derive(Debug, Clone)]
pub struct Estimation {
    vocal_tract: Vec<f64>,
    glottis: Vec<f64>,
    lip_radiation: [f64; 2],
    warnings: Vec<StabilityWarning>,
}

impl Estimation {
    /// Vocal-tract filter, `nv + 1` monic coefficients
    pub fn vocal_tract(&self) -> &[f64] {
        &self.vocal_tract
    }

    /// Fine glottis filter, `ng + 1` monic coefficients
    pub fn glottis(&self) -> &[f64] {
        &self.glottis
    }

    /// Lip-radiation filter, always exactly `[1, -d]`
    pub fn lip_radiation(&self) -> [f64; 2] {
        self.lip_radiation
    }

    /// Stability advisories for the returned filters
    pub fn warnings(&self) -> &[StabilityWarning] {
        &self.warnings
    }

    /// Whether every returned filter is stable as a synthesis filter
    pub fn is_stable(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// GFM-IAIF estimator for speech frames
///
/// Construction validates the parameters once; the estimator can then be
/// applied to any number of frames. The LPC oracle is a seam: the default
/// is Burg's method, but any [`LpcEstimator`] can be substituted with
/// [`GfmIaif::with_estimator`].
#[derive(Debug, Clone)]
pub struct GfmIaif<E: LpcEstimator = Burg> {
    params: Parameters,
    lpc: E,
}

impl GfmIaif<Burg> {
    /// Create an estimator with the default Burg LPC oracle.
    pub fn new(params: Parameters) -> Result<Self> {
        Self::with_estimator(params, Burg)
    }
}

impl<E: LpcEstimator> GfmIaif<E> {
    /// Create an estimator with a caller-supplied LPC oracle.
    pub fn with_estimator(params: Parameters, lpc: E) -> Result<Self> {
        if params.nv < 1 {
            return Err(GfmIaifError::InvalidParameter(
                "vocal-tract order nv must be at least 1".to_string(),
            ));
        }
        if params.ng < 1 {
            return Err(GfmIaifError::InvalidParameter(
                "glottis order ng must be at least 1".to_string(),
            ));
        }
        if !(params.d > 0.0 && params.d < 1.0) {
            return Err(GfmIaifError::InvalidParameter(format!(
                "leaky integration coefficient d must lie in (0, 1), got {}",
                params.d
            )));
        }
        Ok(Self { params, lpc })
    }

    /// The validated parameters this estimator runs with.
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Estimate the three filters for one frame.
    ///
    /// # Errors
    /// `InvalidParameter` for an empty frame or a supplied window whose
    /// length differs from the frame's; `DegenerateFrame` when any LPC
    /// fit encounters a zero-energy or rank-deficient residual.
    pub fn estimate(&self, frame: &[f64]) -> Result<Estimation> {
        let window = match &self.params.window {
            Some(w) => {
                if w.len() != frame.len() {
                    return Err(GfmIaifError::InvalidParameter(format!(
                        "window length {} does not match frame length {}",
                        w.len(),
                        frame.len()
                    )));
                }
                w.clone()
            }
            None => hann(frame.len()),
        };

        let pre = preprocess(frame, self.params.nv, self.params.d)?;
        let cascade = estimate_gross_cascade(&self.lpc, &pre, &window, self.params.ng)?;
        let glottis = estimate_fine_glottis(&self.lpc, &pre, &window, &cascade, self.params.ng)?;
        let vocal_tract =
            estimate_fine_vocal_tract(&self.lpc, &pre, &window, &glottis, self.params.nv)?;

        let mut warnings = Vec::new();
        for (stage, coefficients) in [
            (FilterStage::VocalTract, &vocal_tract),
            (FilterStage::Glottis, &glottis),
        ] {
            let magnitude = max_pole_magnitude(coefficients);
            if magnitude >= 1.0 {
                warnings.push(StabilityWarning {
                    stage,
                    max_pole_magnitude: magnitude,
                });
            }
        }

        Ok(Estimation {
            vocal_tract,
            glottis,
            lip_radiation: pre.lip_radiation(),
            warnings,
        })
    }
}

/// Estimate the three filters for one frame with a one-shot estimator.
///
/// Convenience wrapper over [`GfmIaif::new`] + [`GfmIaif::estimate`].
pub fn estimate(frame: &[f64], params: &Parameters) -> Result<Estimation> {
    GfmIaif::new(params.clone())?.estimate(frame)
}
