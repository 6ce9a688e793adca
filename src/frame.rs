//! Frame preprocessing
//!
//! Builds the padded working signal and cancels the lip-radiation
//! contribution by leaky integration. The pre-frame is a linear ramp from
//! `-s[0]` to `s[0]`: it damps the edge ripple that repeated inverse
//! filtering would otherwise introduce, and is stripped from every
//! residual before fitting.

use crate::filter::{inverse_filter, leaky_integrate};
use crate::{GfmIaifError, Result};

/// A frame prepared for iterative inverse filtering
///
/// Holds the leaky-integrated frame in two variants: unpadded (used for
/// the initial LPC fit) and padded with the pre-frame ramp (used for
/// every inverse-filtering pass, so filtering transients land in the
/// ramp rather than the frame).
#[derive(Debug, Clone)]
pub struct PreprocessedFrame {
    s_int: Vec<f64>,
    x_int: Vec<f64>,
    pre_len: usize,
    lip_radiation: [f64; 2],
}

/// Build the padded signal and cancel lip radiation
///
/// `nv` sets the pre-frame length `Lpf = nv + 1`; `d` is the leaky
/// integration coefficient, strictly inside (0, 1).
///
/// # Errors
/// `InvalidParameter` if the frame is empty, `nv` is zero, or `d` lies
/// outside (0, 1).
pub fn preprocess(frame: &[f64], nv: usize, d: f64) -> Result<PreprocessedFrame> {
    if frame.is_empty() {
        return Err(GfmIaifError::InvalidParameter(
            "frame must contain at least one sample".to_string(),
        ));
    }
    if nv < 1 {
        return Err(GfmIaifError::InvalidParameter(
            "vocal-tract order nv must be at least 1".to_string(),
        ));
    }
    if !(d > 0.0 && d < 1.0) {
        return Err(GfmIaifError::InvalidParameter(format!(
            "leaky integration coefficient d must lie in (0, 1), got {}",
            d
        )));
    }

    let pre_len = nv + 1;
    let mut padded = Vec::with_capacity(pre_len + frame.len());
    padded.extend(pre_frame_ramp(frame[0], pre_len));
    padded.extend_from_slice(frame);

    // The lip-radiation filter is parameterized, never estimated.
    let lip_radiation = [1.0, -d];
    let s_int = leaky_integrate(d, frame);
    let x_int = leaky_integrate(d, &padded);

    Ok(PreprocessedFrame {
        s_int,
        x_int,
        pre_len,
        lip_radiation,
    })
}

impl PreprocessedFrame {
    /// Integrated frame without the pre-frame, same length as the input
    pub fn integrated(&self) -> &[f64] {
        &self.s_int
    }

    /// Integrated frame with the pre-frame ramp prefix
    pub fn padded_integrated(&self) -> &[f64] {
        &self.x_int
    }

    /// Length of the pre-frame ramp (`nv + 1`)
    pub fn pre_frame_len(&self) -> usize {
        self.pre_len
    }

    /// The lip-radiation filter `[1, -d]`
    pub fn lip_radiation(&self) -> [f64; 2] {
        self.lip_radiation
    }

    /// Inverse-filter the padded signal through a monic all-pole model and
    /// strip the pre-frame, leaving a residual as long as the input frame.
    pub fn residual(&self, model: &[f64]) -> Vec<f64> {
        let padded = inverse_filter(model, &self.x_int);
        padded[self.pre_len..].to_vec()
    }
}

/// Linearly spaced ramp of `len` samples from `-first` to `first` inclusive
fn pre_frame_ramp(first: f64, len: usize) -> Vec<f64> {
    debug_assert!(len >= 2);
    (0..len)
        .map(|i| -first + (2.0 * first) * i as f64 / (len - 1) as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ramp_endpoints_and_length() {
        let frame = vec![0.4, 0.2, -0.1, 0.3];
        let pre = preprocess(&frame, 8, 0.99).unwrap();
        assert_eq!(pre.pre_frame_len(), 9);
        assert_eq!(pre.padded_integrated().len(), frame.len() + 9);
        assert_eq!(pre.integrated().len(), frame.len());
    }

    #[test]
    fn test_ramp_values() {
        let ramp = pre_frame_ramp(0.5, 5);
        assert_eq!(ramp.len(), 5);
        assert_relative_eq!(ramp[0], -0.5, epsilon = 1e-15);
        assert_relative_eq!(ramp[2], 0.0, epsilon = 1e-15);
        assert_relative_eq!(ramp[4], 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_integration_matches_recursion() {
        // y[n] = x[n] + d * y[n-1]
        let frame = vec![1.0, 0.0, 0.0];
        let pre = preprocess(&frame, 1, 0.5).unwrap();
        let s = pre.integrated();
        assert_relative_eq!(s[0], 1.0, epsilon = 1e-15);
        assert_relative_eq!(s[1], 0.5, epsilon = 1e-15);
        assert_relative_eq!(s[2], 0.25, epsilon = 1e-15);
    }

    #[test]
    fn test_lip_radiation_is_parameterized() {
        for d in [0.5, 0.9, 0.99] {
            let pre = preprocess(&[1.0, -1.0, 1.0], 4, d).unwrap();
            assert_eq!(pre.lip_radiation(), [1.0, -d]);
        }
    }

    #[test]
    fn test_invalid_d_rejected() {
        for d in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let err = preprocess(&[1.0, 2.0], 4, d).unwrap_err();
            assert!(matches!(err, GfmIaifError::InvalidParameter(_)));
        }
    }

    #[test]
    fn test_zero_order_rejected() {
        let err = preprocess(&[1.0, 2.0], 0, 0.99).unwrap_err();
        assert!(matches!(err, GfmIaifError::InvalidParameter(_)));
    }

    #[test]
    fn test_empty_frame_rejected() {
        let err = preprocess(&[], 4, 0.99).unwrap_err();
        assert!(matches!(err, GfmIaifError::InvalidParameter(_)));
    }

    #[test]
    fn test_residual_strips_pre_frame() {
        let frame = vec![0.3, 0.1, -0.2, 0.4, 0.0];
        let pre = preprocess(&frame, 2, 0.9).unwrap();
        // Identity model: residual is the tail of the padded integrated
        // signal (which differs from the unpadded integration, since the
        // ramp's integration history bleeds into the frame region).
        let r = pre.residual(&[1.0]);
        assert_eq!(r.len(), frame.len());
        let tail = &pre.padded_integrated()[pre.pre_frame_len()..];
        for (a, b) in r.iter().zip(tail.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-15);
        }
    }
}
