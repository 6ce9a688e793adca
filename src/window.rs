//! Window functions for LPC fitting
//!
//! Every LPC fit in the pipeline is performed on a windowed signal to
//! reduce the influence of frame edges. The default taper is a symmetric
//! Hann window spanning the full frame.

use std::f64::consts::PI;

/// Window shapes available for the analysis taper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowShape {
    /// Rectangular window (no tapering)
    Rectangular,
    /// Hann window (raised cosine)
    #[default]
    Hanning,
    /// Hamming window
    Hamming,
}

impl WindowShape {
    /// Compute the window value at a normalized position
    ///
    /// `position` is normalized to [-0.5, 0.5], where 0 is the center of
    /// the window. Positions outside that range evaluate to 0.
    pub fn value_at(self, position: f64) -> f64 {
        if position.abs() > 0.5 {
            return 0.0;
        }
        match self {
            WindowShape::Rectangular => 1.0,
            WindowShape::Hanning => 0.5 + 0.5 * (2.0 * PI * position).cos(),
            WindowShape::Hamming => 0.54 + 0.46 * (2.0 * PI * position).cos(),
        }
    }

    /// Generate a symmetric window of the given size
    ///
    /// The first and last values are equal; for the Hann shape they are
    /// exactly zero, which is the convention the estimation pipeline
    /// assumes for its default taper.
    pub fn generate_symmetric(self, size: usize) -> Vec<f64> {
        if size == 0 {
            return Vec::new();
        }
        if size == 1 {
            return vec![1.0];
        }
        match self {
            // Direct form keeps the endpoints exactly zero.
            WindowShape::Hanning => hann(size),
            _ => (0..size)
                .map(|i| {
                    let position = i as f64 / (size - 1) as f64 - 0.5;
                    self.value_at(position)
                })
                .collect(),
        }
    }
}

/// Symmetric Hann window: `w[i] = 0.5 - 0.5 cos(2 pi i / (N - 1))`
///
/// This is the default taper over a frame of `size` samples.
pub fn hann(size: usize) -> Vec<f64> {
    if size == 0 {
        return Vec::new();
    }
    if size == 1 {
        return vec![1.0];
    }
    (0..size)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / (size - 1) as f64).cos())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hann_symmetry_and_endpoints() {
        let window = hann(200);
        assert_eq!(window.len(), 200);

        // Zero endpoints
        assert_relative_eq!(window[0], 0.0, epsilon = 1e-15);
        assert_relative_eq!(window[199], 0.0, epsilon = 1e-12);

        // Symmetric
        for i in 0..100 {
            assert_relative_eq!(window[i], window[199 - i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_hann_peak() {
        // Odd length puts the peak exactly at the center sample
        let window = hann(201);
        assert_relative_eq!(window[100], 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_hann_degenerate_sizes() {
        assert!(hann(0).is_empty());
        assert_eq!(hann(1), vec![1.0]);
    }

    #[test]
    fn test_shapes_agree_with_value_at() {
        let hamming = WindowShape::Hamming.generate_symmetric(64);
        assert_relative_eq!(hamming[0], 0.08, epsilon = 1e-12);
        assert_relative_eq!(hamming[63], 0.08, epsilon = 1e-12);

        let rect = WindowShape::Rectangular.generate_symmetric(16);
        assert!(rect.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_default_shape_matches_hann() {
        let a = WindowShape::default().generate_symmetric(50);
        let b = hann(50);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_relative_eq!(x, y, epsilon = 1e-15);
        }
    }
}
