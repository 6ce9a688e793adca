//! Digital filtering primitives
//!
//! Rational filter application with zero initial state, plus polynomial
//! convolution for composing filters in cascade. All buffers are local to
//! one call; nothing is carried between invocations.

/// Apply a rational filter `B(z)/A(z)` to a signal
///
/// Direct form I with internal state initialized to zero:
///
/// `a[0] y[n] = sum_k b[k] x[n-k] - sum_{k>=1} a[k] y[n-k]`
///
/// The output has the same length as the input. `a` must be monic
/// (`a[0] == 1`); every filter produced by this crate is.
///
/// # Panics
/// Panics if `b` or `a` is empty.
pub fn apply_filter(b: &[f64], a: &[f64], x: &[f64]) -> Vec<f64> {
    assert!(!b.is_empty() && !a.is_empty(), "filter coefficients must be non-empty");

    let mut y = vec![0.0; x.len()];
    for n in 0..x.len() {
        let mut acc = 0.0;
        for (k, &bk) in b.iter().enumerate() {
            if n >= k {
                acc += bk * x[n - k];
            }
        }
        for (k, &ak) in a.iter().enumerate().skip(1) {
            if n >= k {
                acc -= ak * y[n - k];
            }
        }
        y[n] = acc;
    }
    y
}

/// Inverse-filter a signal through a monic all-pole model
///
/// Applying the fitted denominator polynomial as an FIR numerator whitens
/// the spectral contribution that model captures. This is the residual
/// computation used by every estimation stage.
pub fn inverse_filter(coefficients: &[f64], x: &[f64]) -> Vec<f64> {
    apply_filter(coefficients, &[1.0], x)
}

/// Leaky integration: the all-pole filter `1 / (1 - d z^-1)`
///
/// Cancels the first-order differentiation conventionally attributed to
/// lip radiation. `d` is the leak coefficient, strictly inside (0, 1).
pub fn leaky_integrate(d: f64, x: &[f64]) -> Vec<f64> {
    apply_filter(&[1.0], &[1.0, -d], x)
}

/// Polynomial multiplication of two coefficient sequences
///
/// Composing two filters in series multiplies their polynomials; the
/// result has `a.len() + b.len() - 1` coefficients.
pub fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &av) in a.iter().enumerate() {
        for (j, &bv) in b.iter().enumerate() {
            out[i + j] += av * bv;
        }
    }
    out
}
