//! Standard test objectives with known minima.
//!
//! | Function | Dimensions | Domain | Minimum |
//! |----------|-----------|--------|---------|
//! | [`bench1`] | 1 | `[-2, 2]` | `0` at `x = 0` |
//! | [`bench2`] | 1 | `[-6, 6]` | `-5` at `x = 5` |
//! | [`bench3`] | 1 | `[-2, 2]` | `≈ -0.909` near `x = -0.29` |
//! | [`branin`] | 2 | `[-5, 10] × [0, 15]` | `≈ 0.397887` (three minimizers) |
//! | [`hart6`] | 6 | `[0, 1]^6` | `≈ -3.32237` |

use core::f64::consts::PI;

/// `x²`. Only the first coordinate is used.
///
/// # Panics
///
/// Panics if `x` is empty.
#[must_use]
pub fn bench1(x: &[f64]) -> f64 {
    x[0] * x[0]
}

/// A parabola at 0 for negative inputs and a deeper one at 5 otherwise.
/// Only the first coordinate is used.
///
/// # Panics
///
/// Panics if `x` is empty.
#[must_use]
pub fn bench2(x: &[f64]) -> f64 {
    let x = x[0];
    if x < 0.0 { x * x } else { (x - 5.0).powi(2) - 5.0 }
}

/// `sin(5x) (1 - tanh(x²))`: oscillating with a damped envelope.
/// Only the first coordinate is used.
///
/// # Panics
///
/// Panics if `x` is empty.
#[must_use]
pub fn bench3(x: &[f64]) -> f64 {
    let x = x[0];
    (5.0 * x).sin() * (1.0 - (x * x).tanh())
}

/// Branin-Hoo function.
///
/// # Panics
///
/// Panics if `x` has fewer than 2 elements.
#[must_use]
pub fn branin(x: &[f64]) -> f64 {
    const A: f64 = 1.0;
    const R: f64 = 6.0;
    const S: f64 = 10.0;
    let b = 5.1 / (4.0 * PI * PI);
    let c = 5.0 / PI;
    let t = 1.0 / (8.0 * PI);

    let (x1, x2) = (x[0], x[1]);
    A * (x2 - b * x1 * x1 + c * x1 - R).powi(2) + S * (1.0 - t) * x1.cos() + S
}

const HART6_ALPHA: [f64; 4] = [1.0, 1.2, 3.0, 3.2];
const HART6_A: [[f64; 6]; 4] = [
    [10.0, 3.0, 17.0, 3.5, 1.7, 8.0],
    [0.05, 10.0, 17.0, 0.1, 8.0, 14.0],
    [3.0, 3.5, 1.7, 10.0, 17.0, 8.0],
    [17.0, 8.0, 0.05, 10.0, 0.1, 14.0],
];
const HART6_P: [[f64; 6]; 4] = [
    [0.1312, 0.1696, 0.5569, 0.0124, 0.8283, 0.5886],
    [0.2329, 0.4135, 0.8307, 0.3736, 0.1004, 0.9991],
    [0.2348, 0.1451, 0.3522, 0.2883, 0.3047, 0.6650],
    [0.4047, 0.8828, 0.8732, 0.5743, 0.1091, 0.0381],
];

/// Six-dimensional Hartmann function.
///
/// # Panics
///
/// Panics if `x` has fewer than 6 elements.
#[must_use]
pub fn hart6(x: &[f64]) -> f64 {
    let x = &x[..6];
    HART6_ALPHA
        .iter()
        .zip(HART6_A.iter().zip(&HART6_P))
        .map(|(alpha, (a, p))| {
            let inner: f64 = x
                .iter()
                .zip(a.iter().zip(p))
                .map(|(xj, (aj, pj))| aj * (xj - pj).powi(2))
                .sum();
            -alpha * (-inner).exp()
        })
        .sum()
}
