//! Flat buffer access for the `*_into` / `read_from` / `write_into` family.
//!
//! Math is done in `f64`; the destination can be either `f64` scratch storage
//! or an `f32` array headed for the GPU.

use bytemuck::Pod;

/// Element type of a flat numeric buffer.
pub trait Element: Pod {
    fn from_f64(value: f64) -> Self;
    fn to_f64(self) -> f64;
}

impl Element for f32 {
    #[inline]
    fn from_f64(value: f64) -> f32 {
        value as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Element for f64 {
    #[inline]
    fn from_f64(value: f64) -> f64 {
        value
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

/// Writes `values` to `buffer[offset..offset + values.len()]`.
///
/// # Panics
///
/// Panics if the range is out of bounds.
#[inline]
pub fn write<E: Element>(buffer: &mut [E], offset: usize, values: &[f64]) {
    let dst = &mut buffer[offset..offset + values.len()];
    for (d, &v) in dst.iter_mut().zip(values) {
        *d = E::from_f64(v);
    }
}

/// Reads `N` values starting at `buffer[offset]`.
///
/// # Panics
///
/// Panics if the range is out of bounds.
#[inline]
pub fn read<E: Element, const N: usize>(buffer: &[E], offset: usize) -> [f64; N] {
    let src = &buffer[offset..offset + N];
    core::array::from_fn(|i| src[i].to_f64())
}
