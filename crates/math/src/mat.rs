//! Column-major square matrices.
//!
//! `e[col][row]`, so the flat view is `[col * N + row]`. Matrices go on the
//! left of column vectors, and the composing methods (`translate`, `scale`,
//! `rotate`, `mult`) multiply on the right: the new transform applies in the
//! local frame, before everything already in the matrix.

use core::fmt;
use core::ops;

use bytemuck::{Pod, Zeroable};

use crate::buffer::{self, Element};
use crate::quat::Quat;
use crate::scalar::{self, EPSILON};
use crate::vec::*;

macro_rules! mat_impl {
    ($m: ident, $v: ident, $n: literal, $nn: literal) => {
        #[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(C)]
        pub struct $m {
            pub e: [[f64; $n]; $n],
        }

        impl $m {
            pub const ZERO: $m = $m { e: [[0.0; $n]; $n] };

            pub const IDENTITY: $m = {
                let mut e = [[0.0; $n]; $n];
                let mut i = 0;
                while i < $n {
                    e[i][i] = 1.0;
                    i += 1;
                }
                $m { e }
            };

            #[inline]
            pub fn identity() -> $m {
                $m::IDENTITY
            }

            #[inline]
            pub fn from_array(a: [f64; $nn]) -> $m {
                bytemuck::cast(a)
            }

            #[inline]
            pub fn to_array(self) -> [f64; $nn] {
                bytemuck::cast(self)
            }

            #[inline]
            pub fn as_array(&self) -> &[f64; $nn] {
                bytemuck::cast_ref(self)
            }

            #[inline]
            pub fn as_mut_array(&mut self) -> &mut [f64; $nn] {
                bytemuck::cast_mut(self)
            }

            #[inline]
            pub fn from_columns(cols: [$v; $n]) -> $m {
                $m { e: cols.map($v::to_array) }
            }

            #[inline]
            pub fn to_columns(self) -> [$v; $n] {
                self.e.map($v::from_array)
            }

            #[inline]
            pub fn col(&self, i: usize) -> $v {
                $v::from_array(self.e[i])
            }

            #[inline]
            pub fn row(&self, i: usize) -> $v {
                $v::from_array(core::array::from_fn(|c| self.e[c][i]))
            }

            #[inline]
            pub fn from_diagonal(d: $v) -> $m {
                let mut m = $m::ZERO;
                for i in 0..$n {
                    m.e[i][i] = d[i];
                }
                m
            }

            /// Reads a matrix from `buffer[offset..]`.
            pub fn read_from<E: Element>(buffer: &[E], offset: usize) -> $m {
                $m::from_array(buffer::read(buffer, offset))
            }

            /// Writes the flat column-major representation to `buffer[offset..]`.
            pub fn write_into<E: Element>(&self, buffer: &mut [E], offset: usize) {
                buffer::write(buffer, offset, self.as_array());
            }

            /// `self = self · that`.
            pub fn mult(&mut self, that: &$m) -> &mut $m {
                let a = *self;
                for c in 0..$n {
                    for r in 0..$n {
                        self.e[c][r] = (0..$n).map(|k| a.e[k][r] * that.e[c][k]).sum();
                    }
                }
                self
            }

            /// Element-wise `self += that`. Chains, unlike `+=`.
            pub fn add(&mut self, that: &$m) -> &mut $m {
                *self += *that;
                self
            }

            pub fn sub(&mut self, that: &$m) -> &mut $m {
                *self -= *that;
                self
            }

            pub fn mult_scalar(&mut self, value: f64) -> &mut $m {
                for v in self.as_mut_array() {
                    *v *= value;
                }
                self
            }

            pub fn transpose(&mut self) -> &mut $m {
                for c in 0..$n {
                    for r in (c + 1)..$n {
                        let t = self.e[c][r];
                        self.e[c][r] = self.e[r][c];
                        self.e[r][c] = t;
                    }
                }
                self
            }

            #[inline]
            pub fn transposed(&self) -> $m {
                let mut m = *self;
                m.transpose();
                m
            }

            /// Inverts `self` in place, or returns `None` and leaves it
            /// untouched when the determinant is zero.
            pub fn invert(&mut self) -> Option<&mut $m> {
                let det = self.determinant();
                if det == 0.0 || det.is_nan() {
                    log::trace!("{} is singular, not inverting", stringify!($m));
                    return None;
                }
                self.adjoint().mult_scalar(1.0 / det);
                Some(self)
            }

            #[inline]
            pub fn inverse(&self) -> Option<$m> {
                let mut m = *self;
                m.invert()?;
                Some(m)
            }

            /// Frobenius norm.
            #[inline]
            pub fn frob(&self) -> f64 {
                scalar::fhypot(self.as_array())
            }

            /// Compares each element with a margin of `epsilon` scaled by the
            /// larger magnitude, but never less than `epsilon` itself.
            pub fn equals(&self, that: &$m, epsilon: f64) -> bool {
                self.as_array()
                    .iter()
                    .zip(that.as_array())
                    .all(|(a, b)| (a - b).abs() <= epsilon * 1f64.max(a.abs()).max(b.abs()))
            }

            #[inline]
            pub fn approx_eq(&self, that: &$m) -> bool {
                self.equals(that, EPSILON)
            }
        }

        impl Default for $m {
            #[inline]
            fn default() -> $m {
                $m::IDENTITY
            }
        }

        impl From<[f64; $nn]> for $m {
            #[inline]
            fn from(a: [f64; $nn]) -> $m {
                $m::from_array(a)
            }
        }

        impl ops::Index<usize> for $m {
            type Output = $v;

            /// Column `i`.
            #[inline]
            fn index(&self, i: usize) -> &$v {
                bytemuck::cast_ref(&self.e[i])
            }
        }

        impl ops::IndexMut<usize> for $m {
            #[inline]
            fn index_mut(&mut self, i: usize) -> &mut $v {
                bytemuck::cast_mut(&mut self.e[i])
            }
        }

        impl ops::Add<$m> for $m {
            type Output = $m;

            #[inline]
            fn add(mut self, rhs: $m) -> $m {
                self += rhs;
                self
            }
        }

        impl ops::AddAssign<$m> for $m {
            #[inline]
            fn add_assign(&mut self, rhs: $m) {
                for (a, b) in self.as_mut_array().iter_mut().zip(rhs.as_array()) {
                    *a += b;
                }
            }
        }

        impl ops::Sub<$m> for $m {
            type Output = $m;

            #[inline]
            fn sub(mut self, rhs: $m) -> $m {
                self -= rhs;
                self
            }
        }

        impl ops::SubAssign<$m> for $m {
            #[inline]
            fn sub_assign(&mut self, rhs: $m) {
                for (a, b) in self.as_mut_array().iter_mut().zip(rhs.as_array()) {
                    *a -= b;
                }
            }
        }

        impl ops::Mul<f64> for $m {
            type Output = $m;

            #[inline]
            fn mul(mut self, rhs: f64) -> $m {
                self.mult_scalar(rhs);
                self
            }
        }

        impl ops::Mul<$m> for $m {
            type Output = $m;

            #[inline]
            fn mul(mut self, rhs: $m) -> $m {
                self.mult(&rhs);
                self
            }
        }

        impl ops::MulAssign<$m> for $m {
            #[inline]
            fn mul_assign(&mut self, rhs: $m) {
                self.mult(&rhs);
            }
        }

        impl ops::Mul<$v> for $m {
            type Output = $v;

            #[inline]
            fn mul(self, rhs: $v) -> $v {
                let mut v = $v::ZERO;
                for c in 0..$n {
                    v += self.col(c) * rhs[c];
                }
                v
            }
        }

        impl fmt::Display for $m {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                let prec = f.precision().unwrap_or(2);
                let cols: Vec<String> = self
                    .e
                    .iter()
                    .map(|col| {
                        col.iter()
                            .map(|v| format!("{:.*}", prec, v))
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .collect();
                write!(f, "{}({})", stringify!($m), cols.join("; "))
            }
        }
    };
}

mat_impl!(Mat2, Vec2, 2, 4);
mat_impl!(Mat3, Vec3, 3, 9);

mod mat4;
pub use mat4::Mat4;

impl Mat2 {
    #[inline]
    pub fn determinant(&self) -> f64 {
        let [a0, a1, a2, a3] = self.to_array();
        a0 * a3 - a2 * a1
    }

    pub fn adjoint(&mut self) -> &mut Mat2 {
        let [a0, a1, a2, a3] = self.to_array();
        *self = Mat2::from_array([a3, -a1, -a2, a0]);
        self
    }

    /// Scales column `i` by `v[i]`.
    pub fn scale(&mut self, v: Vec2) -> &mut Mat2 {
        self[0] *= v.x;
        self[1] *= v.y;
        self
    }

    pub fn rotate(&mut self, angle: f64) -> &mut Mat2 {
        let (s, c) = angle.sin_cos();
        let [c0, c1] = self.to_columns();
        self[0] = c0 * c + c1 * s;
        self[1] = c1 * c - c0 * s;
        self
    }

    #[inline]
    pub fn scaled(v: Vec2) -> Mat2 {
        Mat2::from_diagonal(v)
    }

    pub fn rotated(angle: f64) -> Mat2 {
        let (s, c) = angle.sin_cos();
        Mat2::from_array([c, s, -s, c])
    }

    /// Factors `self` into `(L, D, U)`: unit lower triangular, diagonal and
    /// unit upper triangular, with `L · D · U == self`.
    ///
    /// `None` when the leading element is zero, as no such factorisation
    /// exists without pivoting.
    pub fn ldu(&self) -> Option<(Mat2, Mat2, Mat2)> {
        let [a, b, c, d] = self.to_array();
        if a == 0.0 {
            return None;
        }
        let l = Mat2::from_array([1.0, b / a, 0.0, 1.0]);
        let dd = Mat2::from_array([a, 0.0, 0.0, d - b * c / a]);
        let u = Mat2::from_array([1.0, 0.0, c / a, 1.0]);
        Some((l, dd, u))
    }
}

impl Mat3 {
    pub fn determinant(&self) -> f64 {
        let [a00, a01, a02, a10, a11, a12, a20, a21, a22] = self.to_array();
        a00 * (a22 * a11 - a12 * a21)
            + a01 * (-a22 * a10 + a12 * a20)
            + a02 * (a21 * a10 - a11 * a20)
    }

    pub fn adjoint(&mut self) -> &mut Mat3 {
        let [a00, a01, a02, a10, a11, a12, a20, a21, a22] = self.to_array();
        *self = Mat3::from_array([
            a11 * a22 - a12 * a21,
            a02 * a21 - a01 * a22,
            a01 * a12 - a02 * a11,
            a12 * a20 - a10 * a22,
            a00 * a22 - a02 * a20,
            a02 * a10 - a00 * a12,
            a10 * a21 - a11 * a20,
            a01 * a20 - a00 * a21,
            a00 * a11 - a01 * a10,
        ]);
        self
    }

    pub fn translate(&mut self, v: Vec2) -> &mut Mat3 {
        self[2] = self[0] * v.x + self[1] * v.y + self[2];
        self
    }

    pub fn scale(&mut self, v: Vec2) -> &mut Mat3 {
        self[0] *= v.x;
        self[1] *= v.y;
        self
    }

    pub fn rotate(&mut self, angle: f64) -> &mut Mat3 {
        let (s, c) = angle.sin_cos();
        let (c0, c1) = (self[0], self[1]);
        self[0] = c0 * c + c1 * s;
        self[1] = c1 * c - c0 * s;
        self
    }

    pub fn translated(v: Vec2) -> Mat3 {
        let mut m = Mat3::IDENTITY;
        m[2] = Vec3::new(v.x, v.y, 1.0);
        m
    }

    #[inline]
    pub fn scaled(v: Vec2) -> Mat3 {
        Mat3::from_diagonal(v.extend(1.0))
    }

    pub fn rotated(angle: f64) -> Mat3 {
        let (s, c) = angle.sin_cos();
        Mat3::from_array([c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0])
    }

    pub fn from_quat(q: Quat) -> Mat3 {
        let Quat { x, y, z, w } = q;
        let (x2, y2, z2) = (x + x, y + y, z + z);
        let (xx, yx, yy) = (x * x2, y * x2, y * y2);
        let (zx, zy, zz) = (z * x2, z * y2, z * z2);
        let (wx, wy, wz) = (w * x2, w * y2, w * z2);
        Mat3::from_array([
            1.0 - yy - zz,
            yx + wz,
            zx - wy,
            yx - wz,
            1.0 - xx - zz,
            zy + wx,
            zx + wy,
            zy - wx,
            1.0 - xx - yy,
        ])
    }

    /// Maps pixel coordinates with a top-left origin over a `width` by
    /// `height` area to clip space.
    pub fn projection(width: f64, height: f64) -> Mat3 {
        Mat3::from_array([
            2.0 / width,
            0.0,
            0.0,
            0.0,
            -2.0 / height,
            0.0,
            -1.0,
            1.0,
            1.0,
        ])
    }

    /// Upper-left 3x3 of `m`.
    pub fn from_mat4(m: &Mat4) -> Mat3 {
        let e = &m.e;
        Mat3 {
            e: [
                [e[0][0], e[0][1], e[0][2]],
                [e[1][0], e[1][1], e[1][2]],
                [e[2][0], e[2][1], e[2][2]],
            ],
        }
    }

    /// Inverse transpose of the upper-left 3x3 of `m`, for transforming
    /// normals. `None` when that part is singular.
    pub fn normal_matrix(m: &Mat4) -> Option<Mat3> {
        let mut n = Mat3::from_mat4(m);
        n.invert()?.transpose();
        Some(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f64::consts::PI;

    #[test]
    fn identity_is_neutral() {
        let m = Mat3::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0]);
        assert_eq!(Mat3::identity() * m, m);
        assert_eq!(m * Mat3::identity(), m);
        assert_eq!(Mat3::default(), Mat3::IDENTITY);
        assert!(m.equals(&m, 0.0));
    }

    #[test]
    fn mult_composes_on_the_right() {
        let a = Mat2::from_array([1.0, 3.0, 2.0, 4.0]);
        let b = Mat2::from_array([5.0, 7.0, 6.0, 8.0]);
        let mut c = a;
        c.mult(&b);
        // [1 2; 3 4] · [5 6; 7 8] in row notation.
        assert_eq!(c, Mat2::from_array([19.0, 43.0, 22.0, 50.0]));
        assert_eq!(a * b, c);
    }

    #[test]
    fn mult_matches_vector_application() {
        let a = Mat3::rotated(0.3) * Mat3::translated(vec2(2.0, -1.0));
        let b = Mat3::scaled(vec2(2.0, 3.0));
        let v = vec3(1.0, 2.0, 1.0);
        assert!(((a * b) * v).approx_eq(&(a * (b * v))));
    }

    #[test]
    fn mat2_inverse() {
        let mut m = Mat2::from_array([4.0, 2.0, 7.0, 6.0]);
        assert_eq!(m.determinant(), 10.0);
        let original = m;
        m.invert().unwrap();
        assert!((m * original).approx_eq(&Mat2::IDENTITY));
    }

    #[test]
    fn singular_matrices_do_not_invert() {
        let mut m2 = Mat2::from_array([1.0, 2.0, 2.0, 4.0]);
        assert!(m2.invert().is_none());
        assert_eq!(m2, Mat2::from_array([1.0, 2.0, 2.0, 4.0]));

        let mut m3 = Mat3::identity();
        m3.e[0][0] = 0.0;
        m3.e[1][0] = 0.0;
        m3.e[2][0] = 0.0;
        assert_eq!(m3.determinant(), 0.0);
        assert!(m3.invert().is_none());
        assert!(m3.inverse().is_none());
    }

    #[test]
    fn mat3_inverse_round_trip() {
        let mut m = Mat3::rotated(1.2);
        m.translate(vec2(3.0, -4.0)).scale(vec2(2.0, 0.5));
        let inv = m.inverse().unwrap();
        assert!((inv * m).approx_eq(&Mat3::IDENTITY));
        assert!((m * inv).approx_eq(&Mat3::IDENTITY));
    }

    #[test]
    fn adjoint_scales_to_inverse() {
        let m = Mat3::from_array([2.0, 0.0, 1.0, 1.0, 3.0, 0.0, 0.0, 1.0, 4.0]);
        let det = m.determinant();
        let mut adj = m;
        adj.adjoint().mult_scalar(1.0 / det);
        assert!(adj.approx_eq(&m.inverse().unwrap()));
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let m = Mat3::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let t = m.transposed();
        assert_eq!(t.row(0), m.col(0));
        assert_eq!(t.col(2), vec3(3.0, 6.0, 9.0));
        assert_eq!(t.transposed(), m);
    }

    #[test]
    fn composing_matches_factories() {
        let mut m = Mat2::identity();
        m.rotate(0.7).scale(vec2(2.0, 3.0));
        assert!(m.approx_eq(&(Mat2::rotated(0.7) * Mat2::scaled(vec2(2.0, 3.0)))));

        let mut n = Mat3::identity();
        n.translate(vec2(1.0, 2.0)).rotate(0.4).scale(vec2(5.0, 1.0));
        let expected =
            Mat3::translated(vec2(1.0, 2.0)) * Mat3::rotated(0.4) * Mat3::scaled(vec2(5.0, 1.0));
        assert!(n.approx_eq(&expected));
    }

    #[test]
    fn rotated_turns_counter_clockwise() {
        let v = Mat2::rotated(PI / 2.0) * Vec2::X;
        assert!(v.approx_eq(&Vec2::Y));
    }

    #[test]
    fn ldu_factorises() {
        let m = Mat2::from_array([4.0, 6.0, 3.0, 3.0]);
        let (l, d, u) = m.ldu().unwrap();
        assert_eq!(l.e[1][0], 0.0);
        assert_eq!(u.e[0][1], 0.0);
        assert_eq!(d.e[0][1], 0.0);
        assert!((l * d * u).approx_eq(&m));

        assert!(Mat2::from_array([0.0, 1.0, 1.0, 0.0]).ldu().is_none());
    }

    #[test]
    fn projection_maps_pixels_to_clip_space() {
        let p = Mat3::projection(800.0, 600.0);
        assert!((p * vec3(0.0, 0.0, 1.0)).approx_eq(&vec3(-1.0, 1.0, 1.0)));
        assert!((p * vec3(800.0, 600.0, 1.0)).approx_eq(&vec3(1.0, -1.0, 1.0)));
    }

    #[test]
    fn from_quat_rotates_like_quat() {
        let q = Quat::from_euler(30.0, -45.0, 60.0);
        let m = Mat3::from_quat(q);
        let mut v = vec3(1.0, 2.0, 3.0);
        let rotated = m * v;
        v.transform_quat(q);
        assert!(rotated.approx_eq(&v));
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let m = Mat4::scaled(vec3(2.0, 1.0, 1.0));
        let n = Mat3::normal_matrix(&m).unwrap();
        assert!(n.approx_eq(&Mat3::from_diagonal(vec3(0.5, 1.0, 1.0))));
        assert!(Mat3::normal_matrix(&Mat4::scaled(vec3(0.0, 1.0, 1.0))).is_none());
    }

    #[test]
    fn equals_scales_margin_with_magnitude() {
        let a = Mat2::from_array([1e6, 0.0, 0.0, 1.0]);
        let b = Mat2::from_array([1e6 + 0.5, 0.0, 0.0, 1.0]);
        assert!(a.approx_eq(&b));
        assert!(!a.approx_eq(&Mat2::from_array([1e6, 0.0, 0.0, 1.01])));
    }

    #[test]
    fn named_add_sub_chain() {
        let mut m = Mat2::IDENTITY;
        m.add(&Mat2::from_array([1.0, 2.0, 3.0, 4.0]))
            .sub(&Mat2::IDENTITY)
            .mult_scalar(2.0);
        assert_eq!(m, Mat2::from_array([2.0, 4.0, 6.0, 8.0]));
    }

    #[test]
    fn frob_norm() {
        assert_relative_eq!(Mat2::from_array([1.0, 2.0, 2.0, 4.0]).frob(), 5.0);
        assert_relative_eq!(Mat3::IDENTITY.frob(), 3f64.sqrt());
    }

    #[test]
    fn add_sub_scalar() {
        let a = Mat2::from_array([1.0, 2.0, 3.0, 4.0]);
        let b = Mat2::from_array([4.0, 3.0, 2.0, 1.0]);
        assert_eq!(a + b, Mat2::from_array([5.0; 4]));
        assert_eq!(a - a, Mat2::ZERO);
        assert_eq!(a * 2.0, Mat2::from_array([2.0, 4.0, 6.0, 8.0]));
    }

    #[test]
    fn columns_and_buffers() {
        let m = Mat3::from_columns([Vec3::X, Vec3::Z, Vec3::Y]);
        assert_eq!(m[1], Vec3::Z);
        assert_eq!(m.to_columns(), [Vec3::X, Vec3::Z, Vec3::Y]);

        let mut buf = [0.0f32; 12];
        m.write_into(&mut buf, 3);
        assert_eq!(&buf[3..6], &[1.0, 0.0, 0.0]);
        assert_eq!(Mat3::read_from(&buf, 3), m);
    }

    #[test]
    fn display() {
        assert_eq!(Mat2::IDENTITY.to_string(), "Mat2(1.00, 0.00; 0.00, 1.00)");
        assert_eq!(format!("{:.1}", Mat2::scaled(vec2(2.0, 3.0))), "Mat2(2.0, 0.0; 0.0, 3.0)");
    }
}
