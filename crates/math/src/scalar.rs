//! Scalar helpers shared by the vector, matrix and quaternion types.

use core::f64::consts::PI;

/// Default tolerance for approximate comparisons.
pub const EPSILON: f64 = 0.000001;

/// Multiply degrees by this to get radians.
pub const RAD: f64 = PI / 180.0;

/// Multiply radians by this to get degrees.
pub const DEG: f64 = 180.0 / PI;

/// Converts `angle` in degrees to radians.
#[inline]
pub fn rad(angle: f64) -> f64 {
    angle * RAD
}

/// Converts `angle` in radians to degrees.
#[inline]
pub fn deg(angle: f64) -> f64 {
    angle * DEG
}

/// Clamps `n` to `[min, max]`.
///
/// Hitting a bound exactly returns the bound itself, and no ordering of `min`
/// and `max` is checked: `min` wins when both apply.
#[inline]
pub fn clamp(n: f64, min: f64, max: f64) -> f64 {
    if n <= min {
        return min;
    }
    if n >= max {
        return max;
    }
    n
}

/// Linear interpolation from `start` to `end`. `weight` is not restricted to
/// `[0, 1]`, so this extrapolates as well.
#[inline]
pub fn lerp(start: f64, end: f64, weight: f64) -> f64 {
    start * (1.0 - weight) + end * weight
}

/// Inverse of [`lerp`]: where `value` sits between `start` and `end`.
///
/// Not finite when `start == end`.
#[inline]
pub fn norm(start: f64, end: f64, value: f64) -> f64 {
    (value - start) / (end - start)
}

/// Euclidean norm of `values`.
///
/// Plain sum of squares, no rescaling against overflow.
#[inline]
pub fn fhypot(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Rounds `n` up to the nearest power of two.
pub fn ceil2(n: f64) -> f64 {
    n.log2().ceil().exp2()
}

/// `1`, `-1` or `n` itself for zeroes and NaN.
#[inline]
pub fn sign(n: f64) -> f64 {
    if n > 0.0 {
        1.0
    } else if n < 0.0 {
        -1.0
    } else {
        n
    }
}
