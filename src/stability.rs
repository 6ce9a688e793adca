//! Pole-magnitude analysis of estimated filters
//!
//! Inverse filtering (the analysis direction) does not require stable
//! filters, but downstream consumers that resynthesize through an
//! estimated filter do. The driver flags any returned filter whose pole
//! magnitude reaches the unit circle.

use nalgebra::linalg::Schur;
use nalgebra::DMatrix;
use num_complex::Complex;

/// Iteration bound handed to nalgebra's Schur decomposition. Companion
/// matrices with several roots on one modulus can defeat the plain
/// double-shift strategy, so the solve must be bounded and backed by the
/// exceptional-shift fallback below.
const SCHUR_MAX_ITERATIONS: usize = 200;

/// Largest pole magnitude of a monic all-pole filter
///
/// `coefficients` are `[1, a1, ..., ap]` for
/// `A(z) = 1 + a1 z^-1 + ... + ap z^-p`; the poles are the roots of
/// `z^p + a1 z^(p-1) + ... + ap`. Degrees 1 and 2 use closed forms; higher
/// degrees use the eigenvalues of the companion matrix.
pub fn max_pole_magnitude(coefficients: &[f64]) -> f64 {
    let p = coefficients.len().saturating_sub(1);
    match p {
        0 => 0.0,
        1 => coefficients[1].abs(),
        2 => {
            let a1 = coefficients[1];
            let a2 = coefficients[2];
            let discriminant = a1 * a1 - 4.0 * a2;
            if discriminant >= 0.0 {
                let sqrt_d = discriminant.sqrt();
                let r1 = (-a1 + sqrt_d) / 2.0;
                let r2 = (-a1 - sqrt_d) / 2.0;
                r1.abs().max(r2.abs())
            } else {
                // Complex-conjugate pair: |z|^2 equals the product of the
                // roots, which is a2.
                a2.sqrt()
            }
        }
        _ => companion_eigenvalues(coefficients)
            .iter()
            .map(|c| c.norm())
            .fold(0.0, f64::max),
    }
}

/// Whether every pole lies strictly inside the unit circle
pub fn is_stable(coefficients: &[f64]) -> bool {
    max_pole_magnitude(coefficients) < 1.0
}

/// Eigenvalues of the companion matrix of `z^p + a1 z^(p-1) + ... + ap`
///
/// Tries nalgebra's Schur decomposition with a bounded iteration count
/// first. Equal-modulus root constellations (e.g. the roots of
/// `z^p - c`) can cycle there, so on non-convergence this falls back to a
/// Francis double-shift QR iteration with exceptional shifts, which
/// handles those cases. The companion form built here is already upper
/// Hessenberg, so the fallback needs no reduction step.
fn companion_eigenvalues(coefficients: &[f64]) -> Vec<Complex<f64>> {
    let p = coefficients.len() - 1;
    let mut companion = DMatrix::<f64>::zeros(p, p);
    for i in 1..p {
        companion[(i, i - 1)] = 1.0;
    }
    for i in 0..p {
        companion[(i, p - 1)] = -coefficients[p - i];
    }
    match Schur::try_new(companion.clone(), f64::EPSILON, SCHUR_MAX_ITERATIONS) {
        Some(schur) => schur
            .complex_eigenvalues()
            .iter()
            .map(|c| Complex::new(c.re, c.im))
            .collect(),
        None => hessenberg_eigenvalues(companion),
    }
}

/// Eigenvalues of an upper-Hessenberg matrix by Francis double-shift QR
///
/// Deflates from the bottom; every tenth non-deflating iteration uses an
/// exceptional shift (the dhseqr constants) to break the cycling that the
/// plain trailing-block shift exhibits on equal-modulus eigenvalues. If a
/// block still refuses to deflate within the bound, the current diagonal
/// stands in for its eigenvalues, so the caller always terminates.
fn hessenberg_eigenvalues(mut h: DMatrix<f64>) -> Vec<Complex<f64>> {
    let n = h.nrows();
    let mut eigenvalues = Vec::with_capacity(n);
    let max_iterations = 100;

    let mut p = n;
    while p > 0 {
        let mut iter = 0;
        while iter < max_iterations {
            // Look for a negligible subdiagonal entry to deflate at.
            let mut q = p;
            while q > 1 {
                let scale = h[(q - 2, q - 2)].abs() + h[(q - 1, q - 1)].abs();
                let scale = if scale == 0.0 { 1.0 } else { scale };
                if h[(q - 1, q - 2)].abs() <= 1e-14 * scale {
                    h[(q - 1, q - 2)] = 0.0;
                    break;
                }
                q -= 1;
            }

            if q == p {
                eigenvalues.push(Complex::new(h[(p - 1, p - 1)], 0.0));
                p -= 1;
                break;
            } else if q == p - 1 {
                // Trailing 2x2 block, possibly a complex pair.
                let a = h[(p - 2, p - 2)];
                let b = h[(p - 2, p - 1)];
                let c = h[(p - 1, p - 2)];
                let d = h[(p - 1, p - 1)];
                let trace = a + d;
                let det = a * d - b * c;
                let discriminant = trace * trace - 4.0 * det;
                if discriminant >= 0.0 {
                    let sqrt_d = discriminant.sqrt();
                    eigenvalues.push(Complex::new((trace + sqrt_d) / 2.0, 0.0));
                    eigenvalues.push(Complex::new((trace - sqrt_d) / 2.0, 0.0));
                } else {
                    let sqrt_d = (-discriminant).sqrt();
                    eigenvalues.push(Complex::new(trace / 2.0, sqrt_d / 2.0));
                    eigenvalues.push(Complex::new(trace / 2.0, -sqrt_d / 2.0));
                }
                p -= 2;
                break;
            }

            let exceptional = iter > 0 && iter % 10 == 0;
            francis_step(&mut h, q - 1, p - 1, exceptional);
            iter += 1;
        }

        if iter >= max_iterations && p > 0 {
            for i in 0..p {
                eigenvalues.push(Complex::new(h[(i, i)], 0.0));
            }
            break;
        }
    }

    eigenvalues
}

/// One implicit double-shift QR sweep over the active block `lo..=hi`
fn francis_step(h: &mut DMatrix<f64>, lo: usize, hi: usize, exceptional: bool) {
    if hi - lo + 1 < 2 {
        return;
    }

    let (trace, det) = if exceptional {
        let s = h[(hi, hi - 1)].abs()
            + if hi - 1 > lo { h[(hi - 1, hi - 2)].abs() } else { 0.0 };
        let shift = 0.75 * s + h[(hi, hi)];
        (2.0 * shift, shift * shift + 0.4375 * s * s)
    } else {
        let a = h[(hi - 1, hi - 1)];
        let b = h[(hi - 1, hi)];
        let c = h[(hi, hi - 1)];
        let d = h[(hi, hi)];
        (a + d, a * d - b * c)
    };

    // First column of H^2 - trace*H + det*I restricted to the block.
    let h00 = h[(lo, lo)];
    let h01 = h[(lo, lo + 1)];
    let h10 = h[(lo + 1, lo)];
    let h11 = if lo + 1 <= hi { h[(lo + 1, lo + 1)] } else { 0.0 };
    let h21 = if lo + 2 <= hi { h[(lo + 2, lo + 1)] } else { 0.0 };

    let mut x = h00 * h00 + h01 * h10 - trace * h00 + det;
    let mut y = h10 * (h00 + h11 - trace);
    let mut z = h10 * h21;

    for k in lo..hi {
        // Chase the bulge with a 3-element Householder reflector.
        let norm = (x * x + y * y + z * z).sqrt();
        if norm < 1e-30 {
            x = 1.0;
            y = 0.0;
            z = 0.0;
        } else {
            x /= norm;
            y /= norm;
            z /= norm;
        }

        let sign = if x >= 0.0 { 1.0 } else { -1.0 };
        let v0 = x + sign;
        let v_norm_sq = v0 * v0 + y * y + z * z;

        if v_norm_sq > 1e-30 {
            let scale = 2.0 / v_norm_sq;
            let third_row = k + 2 <= hi;

            let row_start = if k > lo { k - 1 } else { k };
            for j in row_start..=hi {
                let mut t = v0 * h[(k, j)] + y * h[(k + 1, j)];
                if third_row {
                    t += z * h[(k + 2, j)];
                }
                t *= scale;
                h[(k, j)] -= t * v0;
                h[(k + 1, j)] -= t * y;
                if third_row {
                    h[(k + 2, j)] -= t * z;
                }
            }

            let col_end = (k + 3).min(hi);
            for i in lo..=col_end {
                let mut t = v0 * h[(i, k)] + y * h[(i, k + 1)];
                if third_row {
                    t += z * h[(i, k + 2)];
                }
                t *= scale;
                h[(i, k)] -= t * v0;
                h[(i, k + 1)] -= t * y;
                if third_row {
                    h[(i, k + 2)] -= t * z;
                }
            }
        }

        if k + 1 < hi {
            x = h[(k + 1, k)];
            y = h[(k + 2, k)];
            z = if k + 3 <= hi { h[(k + 3, k)] } else { 0.0 };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::convolve;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_order() {
        assert_relative_eq!(max_pole_magnitude(&[1.0, -0.5]), 0.5, epsilon = 1e-15);
        assert_relative_eq!(max_pole_magnitude(&[1.0, 0.99]), 0.99, epsilon = 1e-15);
        assert!(!is_stable(&[1.0, -1.5]));
    }

    #[test]
    fn test_second_order_complex_pair() {
        // Poles at 0.6 +- 0.6i: |z| = 0.6 sqrt(2)
        let a = [1.0, -1.2, 0.72];
        assert_relative_eq!(max_pole_magnitude(&a), 0.72f64.sqrt(), epsilon = 1e-12);
        assert!(is_stable(&a));
    }

    #[test]
    fn test_second_order_real_roots() {
        // (z - 0.9)(z + 0.4) = z^2 - 0.5 z - 0.36
        let a = [1.0, -0.5, -0.36];
        assert_relative_eq!(max_pole_magnitude(&a), 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_higher_degree_from_known_roots() {
        // Cascade of first-order sections with roots 0.9, -0.8, 0.6, 0.3, -0.1
        let mut a = vec![1.0, -0.9];
        for root in [-0.8, 0.6, 0.3, -0.1] {
            a = convolve(&a, &[1.0, -root]);
        }
        assert_eq!(a.len(), 6);
        assert_relative_eq!(max_pole_magnitude(&a), 0.9, epsilon = 1e-8);
    }

    #[test]
    fn test_unstable_higher_degree() {
        let a = convolve(&convolve(&[1.0, -1.05], &[1.0, -0.5]), &[1.0, 0.2]);
        assert!(!is_stable(&a));
        assert_relative_eq!(max_pole_magnitude(&a), 1.05, epsilon = 1e-8);
    }

    #[test]
    fn test_roots_of_equal_modulus() {
        // All six roots of z^6 = c share the modulus c^(1/6); this root
        // constellation makes plain double-shift QR cycle forever, so it
        // must resolve through the exceptional-shift path and terminate.
        let stable = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, -0.1];
        assert_relative_eq!(
            max_pole_magnitude(&stable),
            0.1f64.powf(1.0 / 6.0),
            epsilon = 1e-6
        );
        assert!(is_stable(&stable));

        let unstable = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.5];
        assert_relative_eq!(
            max_pole_magnitude(&unstable),
            1.5f64.powf(1.0 / 6.0),
            epsilon = 1e-6
        );
        assert!(!is_stable(&unstable));
    }

    #[test]
    fn test_fourth_roots_of_unity() {
        // Roots at 1, -1, i, -i, all exactly on the unit circle
        let a = [1.0, 0.0, 0.0, 0.0, -1.0];
        assert_relative_eq!(max_pole_magnitude(&a), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fallback_agrees_with_closed_forms() {
        // Degree-3 polynomial with known roots, solved through the
        // companion path and cross-checked against the quadratic closed
        // form of its dominant pair.
        let a = convolve(&[1.0, -1.2, 0.72], &[1.0, -0.3]);
        assert_relative_eq!(
            max_pole_magnitude(&a),
            max_pole_magnitude(&[1.0, -1.2, 0.72]),
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_trivial_filter() {
        assert_eq!(max_pole_magnitude(&[1.0]), 0.0);
        assert!(is_stable(&[1.0]));
    }
}
