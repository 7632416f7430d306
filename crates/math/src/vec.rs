use core::f64::consts::PI;
use core::fmt;
use core::ops;

use bytemuck::{Pod, Zeroable};

use crate::buffer::{self, Element};
use crate::mat::{Mat2, Mat3, Mat4};
use crate::quat::Quat;
use crate::scalar::{self, EPSILON};

macro_rules! vec_op_impl {
    ($trait: ident, $func: ident, $v: ident, $($e: ident),*) => {
        impl ops::$trait<$v> for $v {
            type Output = $v;

            #[inline]
            fn $func(self, rhs: $v) -> $v {
                $v { $( $e: ops::$trait::$func(self.$e, rhs.$e), )* }
            }
        }
    }
}

macro_rules! vec_assign_op_impl {
    ($trait: ident, $func: ident, $v: ident, $($e: ident),*) => {
        impl ops::$trait<$v> for $v {
            #[inline]
            fn $func(&mut self, rhs: $v) {
                $( ops::$trait::$func(&mut self.$e, rhs.$e); )*
            }
        }
    }
}

macro_rules! scalar_op_impl {
    ($trait: ident, $func: ident, $v: ident, $($e: ident),*) => {
        impl ops::$trait<f64> for $v {
            type Output = $v;

            #[inline]
            fn $func(self, rhs: f64) -> $v {
                $v { $( $e: ops::$trait::$func(self.$e, rhs), )* }
            }
        }

        impl ops::$trait<$v> for f64 {
            type Output = $v;

            #[inline]
            fn $func(self, rhs: $v) -> $v {
                $v { $( $e: ops::$trait::$func(self, rhs.$e), )* }
            }
        }
    }
}

macro_rules! scalar_assign_op_impl {
    ($trait: ident, $func: ident, $v: ident, $($e: ident),*) => {
        impl ops::$trait<f64> for $v {
            #[inline]
            fn $func(&mut self, rhs: f64) {
                $( ops::$trait::$func(&mut self.$e, rhs); )*
            }
        }
    }
}

macro_rules! vec_impl {
    ($v: ident, $n: expr, $($e: ident),*) => {
        #[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(C)]
        pub struct $v {
            $( pub $e: f64, )*
        }

        impl $v {
            /// Number of components.
            pub const DIM: usize = $n;

            pub const ZERO: $v = $v { $( $e: 0.0, )* };

            #[inline]
            pub const fn new($( $e: f64, )*) -> $v {
                $v { $( $e, )* }
            }

            #[inline]
            pub const fn from_scalar(a: f64) -> $v {
                $v { $( $e: a, )* }
            }

            #[inline]
            pub fn from_array(a: [f64; $n]) -> $v {
                bytemuck::cast(a)
            }

            #[inline]
            pub fn to_array(self) -> [f64; $n] {
                bytemuck::cast(self)
            }

            #[inline]
            pub fn as_array(&self) -> &[f64; $n] {
                bytemuck::cast_ref(self)
            }

            #[inline]
            pub fn as_mut_array(&mut self) -> &mut [f64; $n] {
                bytemuck::cast_mut(self)
            }

            /// Reads a vector from `buffer[offset..]`.
            pub fn read_from<E: Element>(buffer: &[E], offset: usize) -> $v {
                $v::from_array(buffer::read(buffer, offset))
            }

            /// Writes the components to `buffer[offset..]`.
            pub fn write_into<E: Element>(&self, buffer: &mut [E], offset: usize) {
                buffer::write(buffer, offset, self.as_array());
            }

            /// Component-wise minimum of `a` and `b`.
            #[inline]
            pub fn min(a: $v, b: $v) -> $v {
                $v { $( $e: a.$e.min(b.$e), )* }
            }

            /// Component-wise maximum of `a` and `b`.
            #[inline]
            pub fn max(a: $v, b: $v) -> $v {
                $v { $( $e: a.$e.max(b.$e), )* }
            }

            /// Component-wise clamp between `min` and `max`, see [`scalar::clamp`].
            #[inline]
            pub fn clamp(self, min: $v, max: $v) -> $v {
                $v { $( $e: scalar::clamp(self.$e, min.$e, max.$e), )* }
            }

            /// New vector holding the sign of each component.
            #[inline]
            pub fn sign(self) -> $v {
                $v { $( $e: scalar::sign(self.$e), )* }
            }

            pub fn ceil(&mut self) -> &mut $v {
                $( self.$e = self.$e.ceil(); )*
                self
            }

            pub fn floor(&mut self) -> &mut $v {
                $( self.$e = self.$e.floor(); )*
                self
            }

            pub fn round(&mut self) -> &mut $v {
                $( self.$e = self.$e.round(); )*
                self
            }

            /// Component-wise `self += that`. Chains, unlike `+=`.
            pub fn add(&mut self, that: $v) -> &mut $v {
                *self += that;
                self
            }

            pub fn sub(&mut self, that: $v) -> &mut $v {
                *self -= that;
                self
            }

            /// Component-wise product, not a dot or cross product.
            pub fn mult(&mut self, that: $v) -> &mut $v {
                *self *= that;
                self
            }

            pub fn div(&mut self, that: $v) -> &mut $v {
                *self /= that;
                self
            }

            pub fn scale(&mut self, value: f64) -> &mut $v {
                $( self.$e *= value; )*
                self
            }

            pub fn negate(&mut self) -> &mut $v {
                $( self.$e = -self.$e; )*
                self
            }

            /// Replaces each component with its reciprocal. Zero components
            /// become infinite.
            pub fn invert(&mut self) -> &mut $v {
                $( self.$e = 1.0 / self.$e; )*
                self
            }

            /// Scales `self` to unit length. A zero vector is left untouched.
            pub fn normalize(&mut self) -> &mut $v {
                let len2 = self.len2();
                if len2 > 0.0 {
                    let inv = 1.0 / len2.sqrt();
                    $( self.$e *= inv; )*
                }
                self
            }

            #[inline]
            pub fn normalized(self) -> $v {
                let mut v = self;
                v.normalize();
                v
            }

            pub fn zero(&mut self) -> &mut $v {
                *self = $v::ZERO;
                self
            }

            #[inline]
            pub fn dot(self, b: $v) -> f64 {
                // -0.0 is the additive identity in IEEE 754, +0.0 is not.
                $( self.$e * b.$e + )* (-0.0)
            }

            #[inline]
            pub fn len2(self) -> f64 {
                $v::dot(self, self)
            }

            #[inline]
            pub fn len(self) -> f64 {
                scalar::fhypot(self.as_array())
            }

            #[inline]
            pub fn dist(self, that: $v) -> f64 {
                (that - self).len()
            }

            #[inline]
            pub fn dist2(self, that: $v) -> f64 {
                (that - self).len2()
            }

            /// Interpolates from `a` to `b` by `t`.
            #[inline]
            pub fn lerp(a: $v, b: $v, t: f64) -> $v {
                $v { $( $e: a.$e + t * (b.$e - a.$e), )* }
            }

            /// Compares each component with an absolute margin of `epsilon`.
            ///
            /// Pass `0.0` for exact comparison.
            pub fn equals(&self, that: &$v, epsilon: f64) -> bool {
                $( (self.$e - that.$e).abs() <= epsilon )&&*
            }

            /// [`equals`](Self::equals) with [`EPSILON`].
            #[inline]
            pub fn approx_eq(&self, that: &$v) -> bool {
                self.equals(that, EPSILON)
            }
        }

        impl From<[f64; $n]> for $v {
            #[inline]
            fn from(a: [f64; $n]) -> $v {
                $v::from_array(a)
            }
        }

        impl From<$v> for [f64; $n] {
            #[inline]
            fn from(v: $v) -> [f64; $n] {
                v.to_array()
            }
        }

        impl ops::Index<usize> for $v {
            type Output = f64;

            #[inline]
            fn index(&self, i: usize) -> &f64 {
                &self.as_array()[i]
            }
        }

        impl ops::IndexMut<usize> for $v {
            #[inline]
            fn index_mut(&mut self, i: usize) -> &mut f64 {
                &mut self.as_mut_array()[i]
            }
        }

        impl ops::Neg for $v {
            type Output = $v;

            #[inline]
            fn neg(self) -> $v {
                $v { $( $e: -self.$e, )* }
            }
        }

        impl fmt::Display for $v {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}({})", stringify!($v),
                        [$(
                           format!("{:.prec$}", self.$e, prec = f.precision().unwrap_or(2)),
                        )*].join(", "))
            }
        }

        vec_op_impl!(Add, add, $v, $($e),*);
        vec_op_impl!(Sub, sub, $v, $($e),*);
        vec_op_impl!(Mul, mul, $v, $($e),*);
        vec_op_impl!(Div, div, $v, $($e),*);

        vec_assign_op_impl!(AddAssign, add_assign, $v, $($e),*);
        vec_assign_op_impl!(SubAssign, sub_assign, $v, $($e),*);
        vec_assign_op_impl!(MulAssign, mul_assign, $v, $($e),*);
        vec_assign_op_impl!(DivAssign, div_assign, $v, $($e),*);

        scalar_op_impl!(Add, add, $v, $($e),*);
        scalar_op_impl!(Sub, sub, $v, $($e),*);
        scalar_op_impl!(Mul, mul, $v, $($e),*);
        scalar_op_impl!(Div, div, $v, $($e),*);

        scalar_assign_op_impl!(AddAssign, add_assign, $v, $($e),*);
        scalar_assign_op_impl!(SubAssign, sub_assign, $v, $($e),*);
        scalar_assign_op_impl!(MulAssign, mul_assign, $v, $($e),*);
        scalar_assign_op_impl!(DivAssign, div_assign, $v, $($e),*);
    }
}

vec_impl!(Vec2, 2, x, y);
vec_impl!(Vec3, 3, x, y, z);
vec_impl!(Vec4, 4, x, y, z, w);

#[inline]
pub const fn vec2(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

#[inline]
pub const fn vec3(x: f64, y: f64, z: f64) -> Vec3 {
    Vec3::new(x, y, z)
}

#[inline]
pub const fn vec4(x: f64, y: f64, z: f64, w: f64) -> Vec4 {
    Vec4::new(x, y, z, w)
}

/// Unsigned angle from the lengths and dot product of two vectors. Zero when
/// either vector has zero length.
fn angle_between(len2_a: f64, len2_b: f64, dot: f64) -> f64 {
    let mag = len2_a.sqrt() * len2_b.sqrt();
    let cosine = if mag != 0.0 { dot / mag } else { 0.0 };
    scalar::clamp(cosine, -1.0, 1.0).acos()
}

impl Vec2 {
    pub const X: Vec2 = Vec2::new(1.0, 0.0);
    pub const Y: Vec2 = Vec2::new(0.0, 1.0);

    /// The z axis of the 3D cross product of `self` and `that`.
    #[inline]
    pub fn cross(self, that: Vec2) -> Vec3 {
        Vec3::new(0.0, 0.0, self.x * that.y - self.y * that.x)
    }

    /// Angle between `self` and `that`, in radians.
    pub fn angle(self, that: Vec2) -> f64 {
        angle_between(self.len2(), that.len2(), self.dot(that))
    }

    /// Rotates `self` around `origin` by `angle` radians.
    pub fn rotate(&mut self, origin: Vec2, angle: f64) -> &mut Vec2 {
        let p = *self - origin;
        let (s, c) = angle.sin_cos();
        self.x = p.x * c - p.y * s + origin.x;
        self.y = p.x * s + p.y * c + origin.y;
        self
    }

    pub fn transform_mat2(&mut self, mat: &Mat2) -> &mut Vec2 {
        let m = mat.as_array();
        let Vec2 { x, y } = *self;
        self.x = m[0] * x + m[2] * y;
        self.y = m[1] * x + m[3] * y;
        self
    }

    /// Transforms `self` as a point (implicit `z = 1`).
    pub fn transform_mat3(&mut self, mat: &Mat3) -> &mut Vec2 {
        let m = mat.as_array();
        let Vec2 { x, y } = *self;
        self.x = m[0] * x + m[3] * y + m[6];
        self.y = m[1] * x + m[4] * y + m[7];
        self
    }

    /// Transforms `self` as a point on the `z = 0` plane.
    pub fn transform_mat4(&mut self, mat: &Mat4) -> &mut Vec2 {
        let m = mat.as_array();
        let Vec2 { x, y } = *self;
        self.x = m[0] * x + m[4] * y + m[12];
        self.y = m[1] * x + m[5] * y + m[13];
        self
    }

    /// Random unit vector. `rng` must return uniform values in `[0, 1)`.
    pub fn random<R: FnMut() -> f64>(mut rng: R) -> Vec2 {
        let angle = rng() * 2.0 * PI;
        let (s, c) = angle.sin_cos();
        Vec2::new(c, s)
    }

    #[inline]
    pub fn extend(self, z: f64) -> Vec3 {
        Vec3::new(self.x, self.y, z)
    }
}

impl Vec3 {
    pub const X: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const Y: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    #[inline]
    pub fn cross(self, b: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * b.z - self.z * b.y,
            y: self.z * b.x - self.x * b.z,
            z: self.x * b.y - self.y * b.x,
        }
    }

    /// Angle between `self` and `that`, in radians.
    pub fn angle(self, that: Vec3) -> f64 {
        angle_between(self.len2(), that.len2(), self.dot(that))
    }

    pub fn transform_mat3(&mut self, mat: &Mat3) -> &mut Vec3 {
        let m = mat.as_array();
        let Vec3 { x, y, z } = *self;
        self.x = x * m[0] + y * m[3] + z * m[6];
        self.y = x * m[1] + y * m[4] + z * m[7];
        self.z = x * m[2] + y * m[5] + z * m[8];
        self
    }

    /// Transforms `self` as a point (implicit `w = 1`) and divides by the
    /// resulting `w`, unless that is zero.
    pub fn transform_mat4(&mut self, mat: &Mat4) -> &mut Vec3 {
        let m = mat.as_array();
        let Vec3 { x, y, z } = *self;
        let mut w = m[3] * x + m[7] * y + m[11] * z + m[15];
        if w == 0.0 {
            w = 1.0;
        }
        self.x = (m[0] * x + m[4] * y + m[8] * z + m[12]) / w;
        self.y = (m[1] * x + m[5] * y + m[9] * z + m[13]) / w;
        self.z = (m[2] * x + m[6] * y + m[10] * z + m[14]) / w;
        self
    }

    /// Rotates `self` by `quat`.
    pub fn transform_quat(&mut self, quat: Quat) -> &mut Vec3 {
        let Quat { x: qx, y: qy, z: qz, w: qw } = quat;
        let Vec3 { x, y, z } = *self;
        let uv = Vec3::new(qy * z - qz * y, qz * x - qx * z, qx * y - qy * x);
        let uuv = Vec3::new(
            qy * uv.z - qz * uv.y,
            qz * uv.x - qx * uv.z,
            qx * uv.y - qy * uv.x,
        );
        let w2 = qw * 2.0;
        self.x = x + uv.x * w2 + uuv.x * 2.0;
        self.y = y + uv.y * w2 + uuv.y * 2.0;
        self.z = z + uv.z * w2 + uuv.z * 2.0;
        self
    }

    /// Rotates `self` around the X axis through `origin` by `angle` radians.
    pub fn rotate_x(&mut self, origin: Vec3, angle: f64) -> &mut Vec3 {
        let (s, c) = angle.sin_cos();
        let p = *self - origin;
        let r = Vec3::new(p.x, p.y * c - p.z * s, p.y * s + p.z * c);
        *self = r + origin;
        self
    }

    /// Rotates `self` around the Y axis through `origin` by `angle` radians.
    pub fn rotate_y(&mut self, origin: Vec3, angle: f64) -> &mut Vec3 {
        let (s, c) = angle.sin_cos();
        let p = *self - origin;
        let r = Vec3::new(p.z * s + p.x * c, p.y, p.z * c - p.x * s);
        *self = r + origin;
        self
    }

    /// Rotates `self` around the Z axis through `origin` by `angle` radians.
    pub fn rotate_z(&mut self, origin: Vec3, angle: f64) -> &mut Vec3 {
        let (s, c) = angle.sin_cos();
        let p = *self - origin;
        let r = Vec3::new(p.x * c - p.y * s, p.x * s + p.y * c, p.z);
        *self = r + origin;
        self
    }

    /// Random unit vector. `rng` must return uniform values in `[0, 1)`.
    ///
    /// Samples the cylinder around the unit sphere and projects onto it, which
    /// preserves area.
    pub fn random<R: FnMut() -> f64>(mut rng: R) -> Vec3 {
        let angle = rng() * 2.0 * PI;
        let z = rng() * 2.0 - 1.0;
        let d = (1.0 - z * z).sqrt();
        let (s, c) = angle.sin_cos();
        Vec3::new(c * d, s * d, z)
    }

    #[inline]
    pub fn extend(self, w: f64) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }

    #[inline]
    pub fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Error returned by [`Vec4::from_hex`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexError {
    #[error("expected 8 hex digits (RRGGBBAA), found {0}")]
    InvalidLength(usize),
    #[error("invalid hex digit {found:?} at position {index}")]
    InvalidDigit { index: usize, found: char },
}

impl Vec4 {
    pub const X: Vec4 = Vec4::new(1.0, 0.0, 0.0, 0.0);
    pub const Y: Vec4 = Vec4::new(0.0, 1.0, 0.0, 0.0);
    pub const Z: Vec4 = Vec4::new(0.0, 0.0, 1.0, 0.0);
    pub const W: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);

    /// The 4D cross product of `self`, `a` and `b`: a vector orthogonal to
    /// all three.
    pub fn cross(self, a: Vec4, b: Vec4) -> Vec4 {
        let ab_xy = a.x * b.y - a.y * b.x;
        let ab_xz = a.x * b.z - a.z * b.x;
        let ab_xw = a.x * b.w - a.w * b.x;
        let ab_yz = a.y * b.z - a.z * b.y;
        let ab_yw = a.y * b.w - a.w * b.y;
        let ab_zw = a.z * b.w - a.w * b.z;
        let Vec4 { x, y, z, w } = self;
        Vec4::new(
            y * ab_zw - z * ab_yw + w * ab_yz,
            -(x * ab_zw) + z * ab_xw - w * ab_xz,
            x * ab_yw - y * ab_xw + w * ab_xy,
            -(x * ab_yz) + y * ab_xz - z * ab_xy,
        )
    }

    pub fn transform_mat4(&mut self, mat: &Mat4) -> &mut Vec4 {
        let m = mat.as_array();
        let Vec4 { x, y, z, w } = *self;
        self.x = m[0] * x + m[4] * y + m[8] * z + m[12] * w;
        self.y = m[1] * x + m[5] * y + m[9] * z + m[13] * w;
        self.z = m[2] * x + m[6] * y + m[10] * z + m[14] * w;
        self.w = m[3] * x + m[7] * y + m[11] * z + m[15] * w;
        self
    }

    /// Rotates the `xyz` part by `quat`; `w` is kept.
    pub fn transform_quat(&mut self, quat: Quat) -> &mut Vec4 {
        let Quat { x: qx, y: qy, z: qz, w: qw } = quat;
        let Vec4 { x, y, z, .. } = *self;
        let ix = qw * x + qy * z - qz * y;
        let iy = qw * y + qz * x - qx * z;
        let iz = qw * z + qx * y - qy * x;
        let iw = -qx * x - qy * y - qz * z;
        self.x = ix * qw + iw * -qx + iy * -qz - iz * -qy;
        self.y = iy * qw + iw * -qy + iz * -qx - ix * -qz;
        self.z = iz * qw + iw * -qz + ix * -qy - iy * -qx;
        self
    }

    /// Random point on the unit 3-sphere. `rng` must return uniform values in
    /// `[0, 1)`.
    ///
    /// Marsaglia, "Choosing a Point from the Surface of a Sphere",
    /// Ann. Math. Statist. 43 (1972), no. 2, 645–646.
    pub fn random<R: FnMut() -> f64>(mut rng: R) -> Vec4 {
        let (v1, v2, s1) = loop {
            let v1 = rng() * 2.0 - 1.0;
            let v2 = rng() * 2.0 - 1.0;
            let s1 = v1 * v1 + v2 * v2;
            if s1 < 1.0 {
                break (v1, v2, s1);
            }
        };
        let (v3, v4, s2) = loop {
            let v3 = rng() * 2.0 - 1.0;
            let v4 = rng() * 2.0 - 1.0;
            let s2 = v3 * v3 + v4 * v4;
            if s2 < 1.0 {
                break (v3, v4, s2);
            }
        };
        let d = ((1.0 - s1) / s2).sqrt();
        Vec4::new(v1, v2, v3 * d, v4 * d)
    }

    /// Parses `RRGGBBAA`, optionally prefixed with `0x` or `#`, into a colour
    /// with each channel in `[0, 1]`.
    pub fn from_hex(hex: &str) -> Result<Vec4, HexError> {
        let digits = hex
            .strip_prefix("0x")
            .or_else(|| hex.strip_prefix('#'))
            .unwrap_or(hex);
        let count = digits.chars().count();
        if count != 8 {
            return Err(HexError::InvalidLength(count));
        }

        let mut nibbles = [0u8; 8];
        for (index, found) in digits.chars().enumerate() {
            let digit = found
                .to_digit(16)
                .ok_or(HexError::InvalidDigit { index, found })?;
            nibbles[index] = digit as u8;
        }

        let channel = |i: usize| f64::from(nibbles[2 * i] * 16 + nibbles[2 * i + 1]) / 255.0;
        Ok(Vec4::new(channel(0), channel(1), channel(2), channel(3)))
    }

    /// Formats `self` as lowercase `rrggbbaa`. Channels are scaled by 255,
    /// rounded and clamped to a byte.
    pub fn to_hex(&self) -> String {
        let byte = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        format!(
            "{:02x}{:02x}{:02x}{:02x}",
            byte(self.x),
            byte(self.y),
            byte(self.z),
            byte(self.w)
        )
    }

    #[inline]
    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn rng(seed: u64) -> impl FnMut() -> f64 {
        let mut rng = fastrand::Rng::with_seed(seed);
        move || rng.f64()
    }

    #[test]
    fn arithmetic_ops() {
        let a = vec3(1.0, 2.0, 3.0);
        let b = vec3(4.0, 5.0, 6.0);
        assert_eq!(a + b, vec3(5.0, 7.0, 9.0));
        assert_eq!(b - a, vec3(3.0, 3.0, 3.0));
        assert_eq!(a * b, vec3(4.0, 10.0, 18.0));
        assert_eq!(b / a, vec3(4.0, 2.5, 2.0));
        assert_eq!(2.0 * a, vec3(2.0, 4.0, 6.0));
        assert_eq!(-a, vec3(-1.0, -2.0, -3.0));

        let mut c = a;
        c += b;
        c -= 1.0;
        assert_eq!(c, vec3(4.0, 6.0, 8.0));
    }

    #[test]
    fn named_arithmetic_chains() {
        let mut v = vec3(1.0, 2.0, 3.0);
        v.add(vec3(1.0, 1.0, 1.0))
            .mult(vec3(2.0, 3.0, 4.0))
            .sub(vec3(0.0, 1.0, 2.0))
            .div(vec3(2.0, 4.0, 7.0));
        assert_eq!(v, vec3(2.0, 2.0, 2.0));

        let mut w = vec2(3.0, 4.0);
        w.add(vec2(1.0, 0.0)).scale(0.5);
        assert_eq!(w, vec2(2.0, 2.0));
    }

    #[test]
    fn chained_mutators() {
        let mut v = vec2(3.0, -4.0);
        v.scale(2.0).negate();
        assert_eq!(v, vec2(-6.0, 8.0));

        v.normalize();
        assert_relative_eq!(v.len(), 1.0);

        let mut r = vec4(1.4, -1.6, 2.5, 0.2);
        let (mut f, mut c) = (r, r);
        assert_eq!(*f.floor(), vec4(1.0, -2.0, 2.0, 0.0));
        assert_eq!(*c.ceil(), vec4(2.0, -1.0, 3.0, 1.0));
        assert_eq!(*r.round(), vec4(1.0, -2.0, 3.0, 0.0));
        assert_eq!(*r.zero(), Vec4::ZERO);
    }

    #[test]
    fn normalize_zero_is_noop() {
        let mut v = Vec3::ZERO;
        v.normalize();
        assert_eq!(v, Vec3::ZERO);
        assert!(!v.x.is_nan());
    }

    #[test]
    fn invert_reciprocates() {
        let mut v = vec2(4.0, 0.0);
        v.invert();
        assert_eq!(v.x, 0.25);
        assert_eq!(v.y, f64::INFINITY);
    }

    #[test]
    fn min_max_clamp_sign() {
        let a = vec2(1.0, 5.0);
        let b = vec2(3.0, 2.0);
        assert_eq!(Vec2::min(a, b), vec2(1.0, 2.0));
        assert_eq!(Vec2::max(a, b), vec2(3.0, 5.0));
        assert_eq!(
            vec3(-5.0, 0.5, 9.0).clamp(Vec3::ZERO, Vec3::from_scalar(1.0)),
            vec3(0.0, 0.5, 1.0)
        );
        assert_eq!(vec3(-2.0, 0.0, 7.0).sign(), vec3(-1.0, 0.0, 1.0));
    }

    #[test]
    fn distances() {
        let a = vec2(1.0, 1.0);
        let b = vec2(4.0, 5.0);
        assert_eq!(a.dist(b), 5.0);
        assert_eq!(a.dist2(b), 25.0);
        assert_eq!(vec4(1.0, 2.0, 3.0, 4.0).dot(vec4(1.0, 1.0, 1.0, 1.0)), 10.0);
        assert_eq!(vec4(1.0, 1.0, 1.0, 1.0).len(), 2.0);
    }

    #[test]
    fn lerp_extrapolates() {
        let a = vec3(0.0, 0.0, 0.0);
        let b = vec3(2.0, 4.0, -2.0);
        assert_eq!(Vec3::lerp(a, b, 0.5), vec3(1.0, 2.0, -1.0));
        assert_eq!(Vec3::lerp(a, b, 2.0), vec3(4.0, 8.0, -4.0));
    }

    #[test]
    fn equals_uses_margin() {
        let a = vec4(1.0, 2.0, 3.0, 4.0);
        let b = vec4(1.0, 2.0, 3.0, 4.0 + 1e-7);
        assert!(a.approx_eq(&b));
        assert!(!a.equals(&b, 0.0));
        assert!(!a.approx_eq(&vec4(1.0, 2.0, 3.0, 4.1)));
    }

    #[test]
    fn cross_products() {
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec2::X.cross(Vec2::Y), vec3(0.0, 0.0, 1.0));

        let a = vec4(1.0, 2.0, 0.5, -1.0);
        let b = vec4(0.0, 1.0, 3.0, 2.0);
        let c = vec4(-2.0, 0.5, 1.0, 1.0);
        let d = c.cross(a, b);
        assert_abs_diff_eq!(d.dot(a), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d.dot(b), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d.dot(c), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn angles() {
        assert_relative_eq!(Vec2::X.angle(Vec2::Y), PI / 2.0);
        assert_relative_eq!(Vec3::X.angle(-Vec3::X), PI);
        assert_eq!(Vec3::ZERO.angle(Vec3::X), PI / 2.0);
    }

    #[test]
    fn rotate_around_origin() {
        let mut p = vec2(2.0, 1.0);
        p.rotate(vec2(1.0, 1.0), PI / 2.0);
        assert!(p.approx_eq(&vec2(1.0, 2.0)));

        let mut q = vec3(1.0, 1.0, 0.0);
        q.rotate_z(vec3(0.0, 1.0, 0.0), PI);
        assert!(q.approx_eq(&vec3(-1.0, 1.0, 0.0)));

        let mut r = vec3(0.0, 1.0, 0.0);
        r.rotate_x(Vec3::ZERO, PI / 2.0);
        assert!(r.approx_eq(&Vec3::Z));

        let mut s = vec3(0.0, 0.0, 1.0);
        s.rotate_y(Vec3::ZERO, PI / 2.0);
        assert!(s.approx_eq(&Vec3::X));
    }

    #[test]
    fn transforms_read_all_inputs_first() {
        // A swap matrix exposes any component overwritten before it is read.
        let swap = Mat3::from_array([0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        let mut v = vec3(1.0, 2.0, 3.0);
        v.transform_mat3(&swap);
        assert_eq!(v, vec3(2.0, 1.0, 3.0));

        let mut p = vec2(1.0, 2.0);
        p.transform_mat3(&Mat3::translated(vec2(10.0, 20.0)));
        assert_eq!(p, vec2(11.0, 22.0));

        let mut h = vec4(1.0, 2.0, 3.0, 1.0);
        h.transform_mat4(&Mat4::translated(vec3(1.0, 1.0, 1.0)));
        assert_eq!(h, vec4(2.0, 3.0, 4.0, 1.0));
    }

    #[test]
    fn transform_mat4_divides_by_w() {
        let mut m = Mat4::identity();
        m.e[3][3] = 2.0;
        let mut v = vec3(2.0, 4.0, 6.0);
        v.transform_mat4(&m);
        assert_eq!(v, vec3(1.0, 2.0, 3.0));
    }

    #[test]
    fn transform_quat_rotates() {
        let q = *Quat::identity().rotate(Vec3::Z, PI / 2.0);
        let mut v = Vec3::X;
        v.transform_quat(q);
        assert!(v.approx_eq(&Vec3::Y));

        let mut h = vec4(1.0, 0.0, 0.0, 7.0);
        h.transform_quat(q);
        assert!(h.approx_eq(&vec4(0.0, 1.0, 0.0, 7.0)));
    }

    #[test]
    fn random_vectors_are_unit_length() {
        let mut r = rng(7);
        for _ in 0..200 {
            assert_relative_eq!(Vec2::random(&mut r).len(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(Vec3::random(&mut r).len(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(Vec4::random(&mut r).len(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn hex_round_trip() {
        let red = Vec4::from_hex("FF0000FF").unwrap();
        assert_eq!(red, vec4(1.0, 0.0, 0.0, 1.0));
        assert_eq!(red.to_hex(), "ff0000ff");

        let teal = Vec4::from_hex("0x0AAFA0FF").unwrap();
        assert_eq!(teal.to_hex(), "0aafa0ff");
        assert_eq!(Vec4::from_hex("#0aafa0ff").unwrap(), teal);

        // Fractional channels round to the nearest byte instead of truncating.
        assert_eq!(vec4(0.5, 0.001, 1.2, -0.3).to_hex(), "8000ff00");
    }

    #[test]
    fn hex_errors() {
        assert_eq!(Vec4::from_hex("FFF"), Err(HexError::InvalidLength(3)));
        assert_eq!(
            Vec4::from_hex("FF00G0FF"),
            Err(HexError::InvalidDigit { index: 4, found: 'G' })
        );
    }

    #[test]
    fn buffer_round_trip() {
        let mut buf = vec![0.0f32; 8];
        vec3(1.0, 2.0, 3.0).write_into(&mut buf, 4);
        assert_eq!(&buf[4..7], &[1.0, 2.0, 3.0]);
        assert_eq!(Vec3::read_from(&buf, 4), vec3(1.0, 2.0, 3.0));
    }

    #[test]
    fn display() {
        assert_eq!(vec3(1.0, 2.5, -3.0).to_string(), "Vec3(1.00, 2.50, -3.00)");
        assert_eq!(format!("{:.0}", vec2(1.0, 2.0)), "Vec2(1, 2)");
    }

    #[test]
    fn array_views() {
        let mut v = vec4(1.0, 2.0, 3.0, 4.0);
        assert_eq!(v.as_array(), &[1.0, 2.0, 3.0, 4.0]);
        v.as_mut_array()[2] = 9.0;
        v[3] = 8.0;
        assert_eq!(v[2], 9.0);
        assert_eq!(<[f64; 4]>::from(v), [1.0, 2.0, 9.0, 8.0]);
        assert_eq!(Vec4::from([1.0, 2.0, 9.0, 8.0]), v);
    }
}
