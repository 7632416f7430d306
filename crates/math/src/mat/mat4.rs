use core::fmt;
use core::ops;

use bytemuck::{Pod, Zeroable};

use crate::buffer::{self, Element};
use crate::quat::Quat;
use crate::scalar::{self, EPSILON};
use crate::vec::{Vec3, Vec4};

mat_impl!(Mat4, Vec4, 4, 16);

impl Mat4 {
    pub fn determinant(&self) -> f64 {
        let [a00, a01, a02, a03, a10, a11, a12, a13, a20, a21, a22, a23, a30, a31, a32, a33] =
            self.to_array();
        let b0 = a00 * a11 - a01 * a10;
        let b1 = a00 * a12 - a02 * a10;
        let b2 = a01 * a12 - a02 * a11;
        let b3 = a20 * a31 - a21 * a30;
        let b4 = a20 * a32 - a22 * a30;
        let b5 = a21 * a32 - a22 * a31;
        let b6 = a00 * b5 - a01 * b4 + a02 * b3;
        let b7 = a10 * b5 - a11 * b4 + a12 * b3;
        let b8 = a20 * b2 - a21 * b1 + a22 * b0;
        let b9 = a30 * b2 - a31 * b1 + a32 * b0;
        a13 * b6 - a03 * b7 + a33 * b8 - a23 * b9
    }

    pub fn adjoint(&mut self) -> &mut Mat4 {
        let [a00, a01, a02, a03, a10, a11, a12, a13, a20, a21, a22, a23, a30, a31, a32, a33] =
            self.to_array();
        let b00 = a00 * a11 - a01 * a10;
        let b01 = a00 * a12 - a02 * a10;
        let b02 = a00 * a13 - a03 * a10;
        let b03 = a01 * a12 - a02 * a11;
        let b04 = a01 * a13 - a03 * a11;
        let b05 = a02 * a13 - a03 * a12;
        let b06 = a20 * a31 - a21 * a30;
        let b07 = a20 * a32 - a22 * a30;
        let b08 = a20 * a33 - a23 * a30;
        let b09 = a21 * a32 - a22 * a31;
        let b10 = a21 * a33 - a23 * a31;
        let b11 = a22 * a33 - a23 * a32;
        *self = Mat4::from_array([
            a11 * b11 - a12 * b10 + a13 * b09,
            a02 * b10 - a01 * b11 - a03 * b09,
            a31 * b05 - a32 * b04 + a33 * b03,
            a22 * b04 - a21 * b05 - a23 * b03,
            a12 * b08 - a10 * b11 - a13 * b07,
            a00 * b11 - a02 * b08 + a03 * b07,
            a32 * b02 - a30 * b05 - a33 * b01,
            a20 * b05 - a22 * b02 + a23 * b01,
            a10 * b10 - a11 * b08 + a13 * b06,
            a01 * b08 - a00 * b10 - a03 * b06,
            a30 * b04 - a31 * b02 + a33 * b00,
            a21 * b02 - a20 * b04 - a23 * b00,
            a11 * b07 - a10 * b09 - a12 * b06,
            a00 * b09 - a01 * b07 + a02 * b06,
            a31 * b01 - a30 * b03 - a32 * b00,
            a20 * b03 - a21 * b01 + a22 * b00,
        ]);
        self
    }

    pub fn translate(&mut self, v: Vec3) -> &mut Mat4 {
        self[3] = self[0] * v.x + self[1] * v.y + self[2] * v.z + self[3];
        self
    }

    pub fn scale(&mut self, v: Vec3) -> &mut Mat4 {
        self[0] *= v.x;
        self[1] *= v.y;
        self[2] *= v.z;
        self
    }

    /// Rotates by `angle` radians around `axis`, which does not need to be
    /// normalized. `None` if `axis` is too short to give a direction.
    pub fn rotate(&mut self, axis: Vec3, angle: f64) -> Option<&mut Mat4> {
        let len = axis.len();
        if len < EPSILON {
            log::trace!("rotation axis {} too short, not rotating", axis);
            return None;
        }
        let Vec3 { x, y, z } = axis / len;
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;

        let r0 = Vec3::new(x * x * t + c, y * x * t + z * s, z * x * t - y * s);
        let r1 = Vec3::new(x * y * t - z * s, y * y * t + c, z * y * t + x * s);
        let r2 = Vec3::new(x * z * t + y * s, y * z * t - x * s, z * z * t + c);

        let [c0, c1, c2, _] = self.to_columns();
        self[0] = c0 * r0.x + c1 * r0.y + c2 * r0.z;
        self[1] = c0 * r1.x + c1 * r1.y + c2 * r1.z;
        self[2] = c0 * r2.x + c1 * r2.y + c2 * r2.z;
        Some(self)
    }

    pub fn rotate_x(&mut self, angle: f64) -> &mut Mat4 {
        let (s, c) = angle.sin_cos();
        let (c1, c2) = (self[1], self[2]);
        self[1] = c1 * c + c2 * s;
        self[2] = c2 * c - c1 * s;
        self
    }

    pub fn rotate_y(&mut self, angle: f64) -> &mut Mat4 {
        let (s, c) = angle.sin_cos();
        let (c0, c2) = (self[0], self[2]);
        self[0] = c0 * c - c2 * s;
        self[2] = c0 * s + c2 * c;
        self
    }

    pub fn rotate_z(&mut self, angle: f64) -> &mut Mat4 {
        let (s, c) = angle.sin_cos();
        let (c0, c1) = (self[0], self[1]);
        self[0] = c0 * c + c1 * s;
        self[1] = c1 * c - c0 * s;
        self
    }

    pub fn translated(v: Vec3) -> Mat4 {
        let mut m = Mat4::ZERO;
        Mat4::translated_into(m.as_mut_array(), 0, v);
        m
    }

    pub fn translated_into<E: Element>(buffer: &mut [E], offset: usize, v: Vec3) {
        #[rustfmt::skip]
        let m = [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            v.x, v.y, v.z, 1.0,
        ];
        buffer::write(buffer, offset, &m);
    }

    pub fn scaled(v: Vec3) -> Mat4 {
        let mut m = Mat4::ZERO;
        Mat4::scaled_into(m.as_mut_array(), 0, v);
        m
    }

    pub fn scaled_into<E: Element>(buffer: &mut [E], offset: usize, v: Vec3) {
        #[rustfmt::skip]
        let m = [
            v.x, 0.0, 0.0, 0.0,
            0.0, v.y, 0.0, 0.0,
            0.0, 0.0, v.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        buffer::write(buffer, offset, &m);
    }

    /// Rotation of `angle` radians around `axis`, see [`rotate`](Self::rotate).
    pub fn rotated(axis: Vec3, angle: f64) -> Option<Mat4> {
        let mut m = Mat4::IDENTITY;
        m.rotate(axis, angle)?;
        Some(m)
    }

    pub fn from_quat(q: Quat) -> Mat4 {
        let mut m = Mat4::ZERO;
        Mat4::from_quat_into(m.as_mut_array(), 0, q);
        m
    }

    pub fn from_quat_into<E: Element>(buffer: &mut [E], offset: usize, q: Quat) {
        Mat4::translated_scaled_rotated_into(
            buffer,
            offset,
            Vec3::ZERO,
            Vec3::from_scalar(1.0),
            q,
        );
    }

    /// `translated(pos) · rotation(rot) · scaled(scale)` in one step.
    pub fn translated_scaled_rotated(pos: Vec3, scale: Vec3, rot: Quat) -> Mat4 {
        let mut m = Mat4::ZERO;
        Mat4::translated_scaled_rotated_into(m.as_mut_array(), 0, pos, scale, rot);
        m
    }

    /// Writes [`translated_scaled_rotated`](Self::translated_scaled_rotated)
    /// to `buffer[offset..offset + 16]`. All 16 elements are written, so the
    /// range may hold anything beforehand.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn translated_scaled_rotated_into<E: Element>(
        buffer: &mut [E],
        offset: usize,
        pos: Vec3,
        scale: Vec3,
        rot: Quat,
    ) {
        let Quat { x, y, z, w } = rot;
        let (x2, y2, z2) = (x + x, y + y, z + z);
        let (xx, xy, xz) = (x * x2, x * y2, x * z2);
        let (yy, yz, zz) = (y * y2, y * z2, z * z2);
        let (wx, wy, wz) = (w * x2, w * y2, w * z2);
        let Vec3 { x: sx, y: sy, z: sz } = scale;
        let m = [
            (1.0 - (yy + zz)) * sx,
            (xy + wz) * sx,
            (xz - wy) * sx,
            0.0,
            (xy - wz) * sy,
            (1.0 - (xx + zz)) * sy,
            (yz + wx) * sy,
            0.0,
            (xz + wy) * sz,
            (yz - wx) * sz,
            (1.0 - (xx + yy)) * sz,
            0.0,
            pos.x,
            pos.y,
            pos.z,
            1.0,
        ];
        buffer::write(buffer, offset, &m);
    }

    /// Orthographic projection onto a `[-1, 1]` depth range.
    pub fn orthographic(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Mat4 {
        let mut m = Mat4::ZERO;
        Mat4::orthographic_into(m.as_mut_array(), 0, left, right, bottom, top, near, far);
        m
    }

    #[allow(clippy::too_many_arguments)]
    pub fn orthographic_into<E: Element>(
        buffer: &mut [E],
        offset: usize,
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
    ) {
        let lr = 1.0 / (left - right);
        let bt = 1.0 / (bottom - top);
        let nf = 1.0 / (near - far);
        #[rustfmt::skip]
        let m = [
            -2.0 * lr, 0.0, 0.0, 0.0,
            0.0, -2.0 * bt, 0.0, 0.0,
            0.0, 0.0, 2.0 * nf, 0.0,
            (left + right) * lr, (top + bottom) * bt, (far + near) * nf, 1.0,
        ];
        buffer::write(buffer, offset, &m);
    }

    /// Perspective projection onto a `[-1, 1]` depth range.
    ///
    /// `fov` is the vertical field of view in radians and `aspect` is width
    /// over height. `far` may be `f64::INFINITY`.
    pub fn perspective(fov: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
        let mut m = Mat4::ZERO;
        Mat4::perspective_into(m.as_mut_array(), 0, fov, aspect, near, far);
        m
    }

    pub fn perspective_into<E: Element>(
        buffer: &mut [E],
        offset: usize,
        fov: f64,
        aspect: f64,
        near: f64,
        far: f64,
    ) {
        let f = 1.0 / (fov / 2.0).tan();
        let (zz, zw) = if far == f64::INFINITY {
            (-1.0, -2.0 * near)
        } else {
            let nf = 1.0 / (near - far);
            ((far + near) * nf, 2.0 * far * near * nf)
        };
        #[rustfmt::skip]
        let m = [
            f / aspect, 0.0, 0.0, 0.0,
            0.0, f, 0.0, 0.0,
            0.0, 0.0, zz, -1.0,
            0.0, 0.0, zw, 0.0,
        ];
        buffer::write(buffer, offset, &m);
    }

    pub fn frustum(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Mat4 {
        let mut m = Mat4::ZERO;
        Mat4::frustum_into(m.as_mut_array(), 0, left, right, bottom, top, near, far);
        m
    }

    #[allow(clippy::too_many_arguments)]
    pub fn frustum_into<E: Element>(
        buffer: &mut [E],
        offset: usize,
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
    ) {
        let rl = 1.0 / (right - left);
        let tb = 1.0 / (top - bottom);
        let nf = 1.0 / (near - far);
        #[rustfmt::skip]
        let m = [
            near * 2.0 * rl, 0.0, 0.0, 0.0,
            0.0, near * 2.0 * tb, 0.0, 0.0,
            (right + left) * rl, (top + bottom) * tb, (far + near) * nf, -1.0,
            0.0, 0.0, far * near * 2.0 * nf, 0.0,
        ];
        buffer::write(buffer, offset, &m);
    }

    /// View matrix for a camera at `eye` looking at `center`.
    ///
    /// Identity when `eye` and `center` coincide within [`EPSILON`].
    pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
        let mut m = Mat4::ZERO;
        Mat4::look_at_into(m.as_mut_array(), 0, eye, center, up);
        m
    }

    pub fn look_at_into<E: Element>(
        buffer: &mut [E],
        offset: usize,
        eye: Vec3,
        center: Vec3,
        up: Vec3,
    ) {
        let d = eye - center;
        if d.x.abs() < EPSILON && d.y.abs() < EPSILON && d.z.abs() < EPSILON {
            log::trace!("look_at eye and center coincide at {}", eye);
            Mat4::IDENTITY.write_into(buffer, offset);
            return;
        }

        let z = (eye - center) / eye.dist(center);
        let x = unit_or_zero(up.cross(z));
        let y = unit_or_zero(z.cross(x));

        #[rustfmt::skip]
        let m = [
            x.x, y.x, z.x, 0.0,
            x.y, y.y, z.y, 0.0,
            x.z, y.z, z.z, 0.0,
            -x.dot(eye), -y.dot(eye), -z.dot(eye), 1.0,
        ];
        buffer::write(buffer, offset, &m);
    }

    /// Model matrix placing an object at `eye` and turning it to face away
    /// from `target`, the inverse of [`look_at`](Self::look_at).
    pub fn target_to(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let mut m = Mat4::ZERO;
        Mat4::target_to_into(m.as_mut_array(), 0, eye, target, up);
        m
    }

    pub fn target_to_into<E: Element>(
        buffer: &mut [E],
        offset: usize,
        eye: Vec3,
        target: Vec3,
        up: Vec3,
    ) {
        let z = (eye - target).normalized();
        let x = up.cross(z).normalized();
        let y = z.cross(x);
        #[rustfmt::skip]
        let m = [
            x.x, x.y, x.z, 0.0,
            y.x, y.y, y.z, 0.0,
            z.x, z.y, z.z, 0.0,
            eye.x, eye.y, eye.z, 1.0,
        ];
        buffer::write(buffer, offset, &m);
    }
}

fn unit_or_zero(v: Vec3) -> Vec3 {
    let len = scalar::fhypot(v.as_array());
    if len == 0.0 {
        Vec3::ZERO
    } else {
        v / len
    }
}
