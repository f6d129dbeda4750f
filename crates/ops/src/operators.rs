//! Elementary scalar operators and their backward helpers

use crate::error::{OpsError, Result};

/// Tolerance used by [`is_close`].
pub const CLOSE_TOLERANCE: f64 = 1e-2;

pub fn mul(a: f64, b: f64) -> f64 {
    a * b
}

pub fn id(x: f64) -> f64 {
    x
}

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn neg(x: f64) -> f64 {
    -x
}

pub fn lt(a: f64, b: f64) -> bool {
    a < b
}

pub fn eq(a: f64, b: f64) -> bool {
    a == b
}

/// Larger of `a` and `b`; `a` on ties.
pub fn max(a: f64, b: f64) -> f64 {
    if b > a { b } else { a }
}

/// `|a - b| < 1e-2`
pub fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() < CLOSE_TOLERANCE
}

/// Logistic sigmoid.
///
/// Negative inputs use `e^x / (1 + e^x)` so that `exp` never overflows.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

pub fn relu(x: f64) -> f64 {
    max(0.0, x)
}

pub fn exp(x: f64) -> f64 {
    x.exp()
}

/// Natural logarithm, defined for `x > 0`.
pub fn log(x: f64) -> Result<f64> {
    if x <= 0.0 {
        return Err(OpsError::Domain { op: "log", value: x });
    }
    Ok(x.ln())
}

/// `1 / x`
pub fn inv(x: f64) -> Result<f64> {
    if x == 0.0 {
        return Err(OpsError::DivisionByZero { op: "inv" });
    }
    Ok(1.0 / x)
}

/// Derivative of `log` at `x` times `grad`.
pub fn log_back(x: f64, grad: f64) -> Result<f64> {
    if x == 0.0 {
        return Err(OpsError::DivisionByZero { op: "log_back" });
    }
    Ok(grad / x)
}

/// Derivative of `inv` at `x` times `grad`.
pub fn inv_back(x: f64, grad: f64) -> Result<f64> {
    if x == 0.0 {
        return Err(OpsError::DivisionByZero { op: "inv_back" });
    }
    Ok(-grad / (x * x))
}

/// Derivative of `relu` at `x` times `grad`.
pub fn relu_back(x: f64, grad: f64) -> f64 {
    if x > 0.0 { grad } else { 0.0 }
}

/// First integer `x >= 0` past which `sigmoid` stops growing by at least
/// `threshold` over a step of `delta`.
///
/// Property tests of `sigmoid` monotonicity only sample below this bound.
/// `threshold` must be finite and positive: `sigmoid` saturates to exactly
/// `1.0`, so a zero threshold would never be undercut.
pub fn sigmoid_monotonic_bound(delta: f64, threshold: f64) -> Result<u64> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(OpsError::InvalidThreshold { value: threshold });
    }
    let mut x = 0u64;
    while sigmoid(x as f64 + delta) - sigmoid(x as f64) >= threshold {
        x += 1;
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2.0, 3.0, 6.0, 5.0)]
    #[case(-1.5, 2.0, -3.0, 0.5)]
    #[case(0.0, 7.0, 0.0, 7.0)]
    fn test_mul_add(#[case] a: f64, #[case] b: f64, #[case] product: f64, #[case] sum: f64) {
        assert_eq!(mul(a, b), product);
        assert_eq!(add(a, b), sum);
    }

    #[test]
    fn test_id_neg() {
        assert_eq!(id(3.5), 3.5);
        assert_eq!(neg(3.5), -3.5);
        assert_eq!(neg(-2.0), 2.0);
    }

    #[rstest]
    #[case(1.0, 2.0, true, false)]
    #[case(2.0, 1.0, false, false)]
    #[case(1.0, 1.0, false, true)]
    fn test_comparisons(#[case] a: f64, #[case] b: f64, #[case] less: bool, #[case] equal: bool) {
        assert_eq!(lt(a, b), less);
        assert_eq!(eq(a, b), equal);
    }

    #[rstest]
    #[case(1.0, 2.0, 2.0)]
    #[case(2.0, 1.0, 2.0)]
    #[case(-3.0, -3.0, -3.0)]
    fn test_max(#[case] a: f64, #[case] b: f64, #[case] expected: f64) {
        assert_eq!(max(a, b), expected);
    }

    #[test]
    fn test_max_prefers_first_on_signed_zero_tie() {
        assert!(max(-0.0, 0.0).is_sign_negative());
    }

    #[rstest]
    #[case(1.0, 1.005, true)]
    #[case(1.0, 1.02, false)]
    #[case(-5.0, -5.0, true)]
    fn test_is_close(#[case] a: f64, #[case] b: f64, #[case] expected: bool) {
        assert_eq!(is_close(a, b), expected);
    }

    #[test]
    fn test_sigmoid_properties() {
        assert_eq!(sigmoid(0.0), 0.5);
        for x in [-30.0, -2.5, -0.1, 0.0, 0.1, 2.5, 30.0] {
            let s = sigmoid(x);
            assert!((0.0..=1.0).contains(&s));
            assert!(is_close(1.0 - s, sigmoid(-x)));
        }
        assert!(sigmoid(-1000.0).is_finite());
        assert!(sigmoid(1.0) < sigmoid(2.0));
    }

    #[rstest]
    #[case(-2.0, 0.0)]
    #[case(0.0, 0.0)]
    #[case(3.0, 3.0)]
    fn test_relu(#[case] x: f64, #[case] expected: f64) {
        assert_eq!(relu(x), expected);
    }

    #[test]
    fn test_exp_log() {
        assert_eq!(exp(0.0), 1.0);
        assert!(is_close(log(exp(2.0)).unwrap(), 2.0));
        assert_eq!(log(0.0), Err(OpsError::Domain { op: "log", value: 0.0 }));
        assert!(log(-1.0).is_err());
    }

    #[test]
    fn test_inv() {
        assert_eq!(inv(4.0).unwrap(), 0.25);
        assert_eq!(inv(0.0), Err(OpsError::DivisionByZero { op: "inv" }));
    }

    #[test]
    fn test_backward_helpers() {
        assert_eq!(log_back(2.0, 3.0).unwrap(), 1.5);
        assert_eq!(inv_back(2.0, 4.0).unwrap(), -1.0);
        assert!(log_back(0.0, 1.0).is_err());
        assert!(inv_back(0.0, 1.0).is_err());
        assert_eq!(relu_back(1.0, 5.0), 5.0);
        assert_eq!(relu_back(0.0, 5.0), 0.0);
        assert_eq!(relu_back(-1.0, 5.0), 0.0);
    }

    #[test]
    fn test_sigmoid_monotonic_bound() {
        let bound = sigmoid_monotonic_bound(1e-2, 1e-15).unwrap();
        assert!(bound > 0);
        let x = bound as f64;
        assert!(sigmoid(x + 1e-2) - sigmoid(x) < 1e-15);
        let prev = x - 1.0;
        assert!(sigmoid(prev + 1e-2) - sigmoid(prev) >= 1e-15);
    }

    #[test]
    fn test_sigmoid_monotonic_bound_with_large_threshold() {
        // sigmoid'(0) = 0.25, so a step of 1 grows by less than 0.5 already
        assert_eq!(sigmoid_monotonic_bound(1.0, 0.5), Ok(0));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::INFINITY)]
    fn test_sigmoid_monotonic_bound_rejects_threshold(#[case] threshold: f64) {
        assert_eq!(
            sigmoid_monotonic_bound(1e-2, threshold),
            Err(OpsError::InvalidThreshold { value: threshold })
        );
    }

    #[test]
    fn test_sigmoid_monotonic_bound_rejects_nan_threshold() {
        assert!(matches!(
            sigmoid_monotonic_bound(1e-2, f64::NAN),
            Err(OpsError::InvalidThreshold { value }) if value.is_nan()
        ));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn test_sigmoid_monotonic_bound_degenerate_delta_stops_at_zero(#[case] delta: f64) {
        assert_eq!(sigmoid_monotonic_bound(delta, 1e-15), Ok(0));
    }
}
