use core::f64::consts::PI;
use core::fmt;
use core::ops;

use bytemuck::{Pod, Zeroable};

use crate::buffer::{self, Element};
use crate::mat::{Mat3, Mat4};
use crate::scalar::{self, EPSILON};
use crate::vec::{Vec3, Vec4};

/// Half of [`RAD`](crate::scalar::RAD): Euler angles in degrees to half-angle radians.
const HALF_TO_RAD: f64 = 0.5 * PI / 180.0;

/// Quaternion with vector part `x, y, z` and scalar part `w`.
///
/// Rotations are unit quaternions. Nothing keeps them unit length
/// automatically, call [`normalize`](Quat::normalize) after accumulating.
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

#[inline]
pub const fn quat(x: f64, y: f64, z: f64, w: f64) -> Quat {
    Quat::new(x, y, z, w)
}

impl Quat {
    pub const IDENTITY: Quat = Quat::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Quat {
        Quat { x, y, z, w }
    }

    #[inline]
    pub fn identity() -> Quat {
        Quat::IDENTITY
    }

    pub fn set_identity(&mut self) -> &mut Quat {
        *self = Quat::IDENTITY;
        self
    }

    #[inline]
    pub fn re(&self) -> f64 {
        self.w
    }

    #[inline]
    pub fn im(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    fn from_parts(im: Vec3, re: f64) -> Quat {
        Quat::new(im.x, im.y, im.z, re)
    }

    #[inline]
    pub fn from_vec4(v: Vec4) -> Quat {
        Quat::new(v.x, v.y, v.z, v.w)
    }

    #[inline]
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, self.w)
    }

    #[inline]
    pub fn from_array(a: [f64; 4]) -> Quat {
        bytemuck::cast(a)
    }

    #[inline]
    pub fn to_array(self) -> [f64; 4] {
        bytemuck::cast(self)
    }

    #[inline]
    pub fn as_array(&self) -> &[f64; 4] {
        bytemuck::cast_ref(self)
    }

    #[inline]
    pub fn as_mut_array(&mut self) -> &mut [f64; 4] {
        bytemuck::cast_mut(self)
    }

    pub fn read_from<E: Element>(buffer: &[E], offset: usize) -> Quat {
        Quat::from_array(buffer::read(buffer, offset))
    }

    pub fn write_into<E: Element>(&self, buffer: &mut [E], offset: usize) {
        buffer::write(buffer, offset, self.as_array());
    }

    /// Hamilton product `self = self ⊗ that`: the result applies `that`
    /// first, then `self`.
    pub fn mult(&mut self, that: Quat) -> &mut Quat {
        let (a, b) = (self.im(), that.im());
        let w = self.w * that.w - a.dot(b);
        let im = b * self.w + a * that.w + a.cross(b);
        *self = Quat::from_parts(im, w);
        self
    }

    pub fn scale(&mut self, value: f64) -> &mut Quat {
        self.x *= value;
        self.y *= value;
        self.z *= value;
        self.w *= value;
        self
    }

    #[inline]
    pub fn dot(&self, that: &Quat) -> f64 {
        self.x * that.x + self.y * that.y + self.z * that.z + self.w * that.w
    }

    #[inline]
    pub fn len2(&self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn len(&self) -> f64 {
        scalar::fhypot(self.as_array())
    }

    /// Scales to unit length. A zero quaternion is left untouched.
    pub fn normalize(&mut self) -> &mut Quat {
        let len2 = self.len2();
        if len2 > 0.0 {
            self.scale(1.0 / len2.sqrt());
        }
        self
    }

    #[inline]
    pub fn normalized(self) -> Quat {
        let mut q = self;
        q.normalize();
        q
    }

    /// General inverse, conjugate over squared length. The zero quaternion
    /// inverts to itself.
    pub fn invert(&mut self) -> &mut Quat {
        let len2 = self.len2();
        if len2 == 0.0 {
            *self = Quat::new(0.0, 0.0, 0.0, 0.0);
        } else {
            self.conjugate().scale(1.0 / len2);
        }
        self
    }

    /// Negates the vector part. Same as [`invert`](Self::invert) for unit
    /// quaternions.
    pub fn conjugate(&mut self) -> &mut Quat {
        self.x = -self.x;
        self.y = -self.y;
        self.z = -self.z;
        self
    }

    #[inline]
    pub fn conj(self) -> Quat {
        Quat::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Sets `self` to the rotation of `angle` radians around the unit vector
    /// `axis`, discarding the current value.
    pub fn rotate(&mut self, axis: Vec3, angle: f64) -> &mut Quat {
        let (s, c) = (angle * 0.5).sin_cos();
        *self = Quat::from_parts(axis * s, c);
        self
    }

    /// Composes `self` with a rotation of `angle` radians around X.
    pub fn rotate_x(&mut self, angle: f64) -> &mut Quat {
        let (bx, bw) = (angle * 0.5).sin_cos();
        let Quat { x, y, z, w } = *self;
        *self = Quat::new(x * bw + w * bx, y * bw + z * bx, z * bw - y * bx, w * bw - x * bx);
        self
    }

    /// Composes `self` with a rotation of `angle` radians around Y.
    pub fn rotate_y(&mut self, angle: f64) -> &mut Quat {
        let (by, bw) = (angle * 0.5).sin_cos();
        let Quat { x, y, z, w } = *self;
        *self = Quat::new(x * bw - z * by, y * bw + w * by, z * bw + x * by, w * bw - y * by);
        self
    }

    /// Composes `self` with a rotation of `angle` radians around Z.
    pub fn rotate_z(&mut self, angle: f64) -> &mut Quat {
        let (bz, bw) = (angle * 0.5).sin_cos();
        let Quat { x, y, z, w } = *self;
        *self = Quat::new(x * bw + y * bz, y * bw - x * bz, z * bw + w * bz, w * bw - z * bz);
        self
    }

    /// Recomputes `w` from `x, y, z`, assuming unit length.
    pub fn calc_w(&mut self) -> &mut Quat {
        self.w = (1.0 - self.x * self.x - self.y * self.y - self.z * self.z)
            .abs()
            .sqrt();
        self
    }

    pub fn exp(&mut self) -> &mut Quat {
        let im = self.im();
        let r = im.len();
        let et = self.w.exp();
        let s = if r > 0.0 { et * r.sin() / r } else { 0.0 };
        *self = Quat::from_parts(im * s, et * r.cos());
        self
    }

    pub fn ln(&mut self) -> &mut Quat {
        let im = self.im();
        let r = im.len();
        let t = if r > 0.0 { r.atan2(self.w) / r } else { 0.0 };
        let w = 0.5 * self.len2().ln();
        *self = Quat::from_parts(im * t, w);
        self
    }

    /// Raises `self` to the power `s`.
    pub fn pow(&mut self, s: f64) -> &mut Quat {
        self.ln().scale(s).exp()
    }

    /// Spherical linear interpolation from `self` to `that` by `t`, along the
    /// shorter arc.
    pub fn slerp(&mut self, that: Quat, t: f64) -> &mut Quat {
        let mut b = that;
        let mut cosom = self.dot(&b);
        if cosom < 0.0 {
            cosom = -cosom;
            b = -b;
        }

        let (s0, s1) = if 1.0 - cosom > EPSILON {
            let omega = cosom.acos();
            let sinom = omega.sin();
            (((1.0 - t) * omega).sin() / sinom, (t * omega).sin() / sinom)
        } else {
            // Nearly parallel, sin(omega) is too small to divide by.
            (1.0 - t, t)
        };

        let a = *self;
        self.x = s0 * a.x + s1 * b.x;
        self.y = s0 * a.y + s1 * b.y;
        self.z = s0 * a.z + s1 * b.z;
        self.w = s0 * a.w + s1 * b.w;
        self
    }

    /// Sets `self` to the shortest rotation taking unit vector `a` to unit
    /// vector `b`.
    pub fn rotation_of(&mut self, a: Vec3, b: Vec3) -> &mut Quat {
        let dot = a.dot(b);
        if dot < -0.999999 {
            let mut axis = Vec3::X.cross(a);
            if axis.len() < 0.000001 {
                axis = Vec3::Y.cross(a);
            }
            self.rotate(axis.normalized(), PI)
        } else if dot > 0.999999 {
            self.set_identity()
        } else {
            *self = Quat::from_parts(a.cross(b), 1.0 + dot);
            self.normalize()
        }
    }

    /// Rotation from an orthonormal basis. The result is normalized.
    pub fn from_axes(view: Vec3, right: Vec3, up: Vec3) -> Quat {
        #[rustfmt::skip]
        let m = Mat3::from_array([
            right.x, up.x, -view.x,
            right.y, up.y, -view.y,
            right.z, up.z, -view.z,
        ]);
        Quat::from_mat3(&m).normalized()
    }

    /// Rotation matrix to quaternion, after Ken Shoemake's "Quaternion
    /// Calculus and Fast Animation" (SIGGRAPH 1987 course notes).
    ///
    /// The result is not normalized.
    pub fn from_mat3(m: &Mat3) -> Quat {
        let m = m.as_array();
        let trace = m[0] + m[4] + m[8];
        if trace > 0.0 {
            let root = (trace + 1.0).sqrt();
            let w = 0.5 * root;
            let root = 0.5 / root;
            return Quat::new(
                (m[5] - m[7]) * root,
                (m[6] - m[2]) * root,
                (m[1] - m[3]) * root,
                w,
            );
        }

        // Branch on the largest diagonal element.
        let mut i = 0;
        if m[4] > m[0] {
            i = 1;
        }
        if m[8] > m[i * 3 + i] {
            i = 2;
        }
        let j = (i + 1) % 3;
        let k = (i + 2) % 3;

        let mut out = [0.0; 4];
        let root = (m[i * 3 + i] - m[j * 3 + j] - m[k * 3 + k] + 1.0).sqrt();
        out[i] = 0.5 * root;
        let root = 0.5 / root;
        out[3] = (m[j * 3 + k] - m[k * 3 + j]) * root;
        out[j] = (m[j * 3 + i] + m[i * 3 + j]) * root;
        out[k] = (m[k * 3 + i] + m[i * 3 + k]) * root;
        Quat::from_array(out)
    }

    /// From Euler angles in degrees.
    pub fn from_euler(x: f64, y: f64, z: f64) -> Quat {
        let mut q = Quat::IDENTITY;
        Quat::from_euler_into(q.as_mut_array(), 0, x, y, z);
        q
    }

    /// Writes [`from_euler`](Self::from_euler) as `x, y, z, w` to
    /// `buffer[offset..offset + 4]`.
    pub fn from_euler_into<E: Element>(buffer: &mut [E], offset: usize, x: f64, y: f64, z: f64) {
        let (sx, cx) = (x * HALF_TO_RAD).sin_cos();
        let (sy, cy) = (y * HALF_TO_RAD).sin_cos();
        let (sz, cz) = (z * HALF_TO_RAD).sin_cos();
        let q = [
            sx * cy * cz - cx * sy * sz,
            cx * sy * cz + sx * cy * sz,
            cx * cy * sz - sx * sy * cz,
            cx * cy * cz + sx * sy * sz,
        ];
        buffer::write(buffer, offset, &q);
    }

    #[inline]
    pub fn to_mat3(self) -> Mat3 {
        Mat3::from_quat(self)
    }

    #[inline]
    pub fn to_mat4(self) -> Mat4 {
        Mat4::from_quat(self)
    }

    /// Compares all four components with an absolute margin of `epsilon`.
    pub fn equals(&self, that: &Quat, epsilon: f64) -> bool {
        self.equals_xyz(that, epsilon) && (self.w - that.w).abs() <= epsilon
    }

    /// Compares only the vector part with an absolute margin of `epsilon`.
    pub fn equals_xyz(&self, that: &Quat, epsilon: f64) -> bool {
        (self.x - that.x).abs() <= epsilon
            && (self.y - that.y).abs() <= epsilon
            && (self.z - that.z).abs() <= epsilon
    }

    #[inline]
    pub fn approx_eq(&self, that: &Quat) -> bool {
        self.equals(that, EPSILON)
    }
}

impl Default for Quat {
    #[inline]
    fn default() -> Quat {
        Quat::IDENTITY
    }
}

impl fmt::Display for Quat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Quat(w: {:.prec$}, x: {:.prec$}, y: {:.prec$}, z: {:.prec$})",
            self.w,
            self.x,
            self.y,
            self.z,
            prec = f.precision().unwrap_or(2)
        )
    }
}

impl ops::Neg for Quat {
    type Output = Quat;

    #[inline]
    fn neg(self) -> Quat {
        Quat::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl ops::Add<Quat> for Quat {
    type Output = Quat;

    #[inline]
    fn add(mut self, rhs: Quat) -> Quat {
        self += rhs;
        self
    }
}

impl ops::AddAssign<Quat> for Quat {
    #[inline]
    fn add_assign(&mut self, rhs: Quat) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
        self.w += rhs.w;
    }
}

impl ops::Mul<f64> for Quat {
    type Output = Quat;

    #[inline]
    fn mul(mut self, rhs: f64) -> Quat {
        self.scale(rhs);
        self
    }
}

impl ops::Mul<Quat> for f64 {
    type Output = Quat;

    #[inline]
    fn mul(self, mut rhs: Quat) -> Quat {
        rhs.scale(self);
        rhs
    }
}

impl ops::Mul<Quat> for Quat {
    type Output = Quat;

    #[inline]
    fn mul(mut self, rhs: Quat) -> Quat {
        self.mult(rhs);
        self
    }
}

impl ops::MulAssign<Quat> for Quat {
    #[inline]
    fn mul_assign(&mut self, rhs: Quat) {
        self.mult(rhs);
    }
}

impl ops::Mul<Vec3> for Quat {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        let mut v = rhs;
        v.transform_quat(self);
        v
    }
}
