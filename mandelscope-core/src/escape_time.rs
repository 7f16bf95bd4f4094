//! Escape-time evaluation of the Mandelbrot recurrence `z ← z² + c`.
//!
//! Returns a real-valued iteration count. Points that never leave the escape
//! radius within the iteration cap return exactly `max_iterations`; escaped
//! points return the continuous (smooth) count μ = n + 1 - log₂(ln|z|).

use std::f64::consts::LN_2;

/// Squared escape radius. Comparing |z|² avoids a square root per iteration.
pub const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// Evaluate the escape value of `c = (real, imag)`.
///
/// `max_iterations == 0` performs no iterations and returns 0.
pub fn evaluate(c: (f64, f64), max_iterations: u32) -> f64 {
    let (cx, cy) = c;
    let mut zx = 0.0_f64;
    let mut zy = 0.0_f64;

    for n in 0..max_iterations {
        let zx_sq = zx * zx;
        let zy_sq = zy * zy;

        zy = 2.0 * zx * zy + cy;
        zx = zx_sq - zy_sq + cx;

        let norm_sq = zx * zx + zy * zy;
        if norm_sq > ESCAPE_RADIUS_SQ {
            return smooth_iteration(n, norm_sq);
        }
    }

    max_iterations as f64
}

/// Smooth iteration count for a point that escaped at iteration `n` with `|z|² = norm_sq`.
///
/// `norm_sq > 4` guarantees both logarithm arguments exceed 1. Points far
/// outside the set can produce a slightly negative μ; the result is floored at 0.
pub fn smooth_iteration(n: u32, norm_sq: f64) -> f64 {
    let log_zn = norm_sq.ln() / 2.0;
    let nu = (log_zn / LN_2).ln() / LN_2;
    (n as f64 + 1.0 - nu).max(0.0)
}

/// True when `escape_value` marks presumed set membership.
pub fn is_interior(escape_value: f64, max_iterations: u32) -> bool {
    escape_value >= max_iterations as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes() {
        for max in [1, 10, 100, 5000] {
            assert_eq!(evaluate((0.0, 0.0), max), max as f64);
        }
    }

    #[test]
    fn zero_iterations_returns_zero() {
        assert_eq!(evaluate((0.0, 0.0), 0), 0.0);
        assert_eq!(evaluate((3.0, 0.0), 0), 0.0);
    }

    #[test]
    fn three_escapes_on_first_iteration() {
        // z₁ = 3, |z₁|² = 9 > 4
        let value = evaluate((3.0, 0.0), 100);
        let expected = smooth_iteration(0, 9.0);
        assert_eq!(value, expected);
        assert!(value > 0.0 && value < 1.0, "got {value}");
    }

    #[test]
    fn two_sits_on_boundary_and_escapes_later() {
        // z₁ = 2 gives |z|² = 4 which is not > 4, z₂ = 6 escapes
        let value = evaluate((2.0, 0.0), 100);
        assert_eq!(value, smooth_iteration(1, 36.0));
        assert!(value > evaluate((3.0, 0.0), 100), "got {value}");
    }

    #[test]
    fn escaped_value_is_below_cap() {
        let max = 50;
        let value = evaluate((0.5, 0.5), max);
        assert!(value < max as f64);
        assert!(!is_interior(value, max));
    }

    #[test]
    fn interior_points_report_cap() {
        let value = evaluate((-1.0, 0.0), 300);
        assert!(is_interior(value, 300));
    }

    #[test]
    fn larger_final_magnitude_gives_smaller_smooth_value() {
        assert!(smooth_iteration(10, 5.0) > smooth_iteration(10, 1.0e6));
    }

    #[test]
    fn smooth_iteration_is_never_negative() {
        assert_eq!(smooth_iteration(0, 1.0e300), 0.0);
    }
}
