//! Estimate the source-filter decomposition of a synthetic vowel-like
//! frame and print the three filters.
//!
//! The frame is generated in-process: white-ish noise from a linear
//! congruential generator driving a two-resonance all-pole filter, which
//! is enough structure for the estimation to produce a meaningful
//! vocal-tract fit without needing an audio file.
//!
//! Run with `cargo run --example analyze_frame`.

use gfm_iaif::filter::{apply_filter, convolve};
use gfm_iaif::{estimate, Parameters};

fn synthetic_frame(len: usize) -> Vec<f64> {
    let mut state: u32 = 0x2545_f491;
    let excitation: Vec<f64> = (0..len)
        .map(|_| {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            (state >> 16) as f64 / 65536.0 * 2.0 - 1.0
        })
        .collect();
    // Resonances near 500 Hz and 1500 Hz at 16 kHz sampling, roughly
    // where the first two formants of an open vowel sit.
    let denominator = convolve(&[1.0, -1.90, 0.94], &[1.0, -1.60, 0.92]);
    apply_filter(&[1.0], &denominator, &excitation)
}

fn print_filter(label: &str, coefficients: &[f64]) {
    println!("{label} (order {}):", coefficients.len() - 1);
    for (i, c) in coefficients.iter().enumerate() {
        println!("  a[{i:2}] = {c:+.6}");
    }
}

fn main() -> gfm_iaif::Result<()> {
    let frame = synthetic_frame(400);
    let params = Parameters { nv: 16, ..Parameters::default() };
    let result = estimate(&frame, &params)?;

    print_filter("vocal tract", result.vocal_tract());
    print_filter("glottis", result.glottis());
    print_filter("lip radiation", &result.lip_radiation());

    if result.is_stable() {
        println!("all filters stable");
    } else {
        for warning in result.warnings() {
            println!(
                "warning: {:?} filter unstable, max pole magnitude {:.4}",
                warning.stage, warning.max_pole_magnitude
            );
        }
    }
    Ok(())
}
