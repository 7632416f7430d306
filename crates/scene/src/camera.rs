use core::f64::consts::PI;

use math::{scalar, Element, Mat4, Quat, Vec3, EPSILON};

/// Keeps the orbiting eye this far (in radians) from the poles.
const POLE_MARGIN: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Projection {
    /// `fov` is vertical, in radians. `far` may be infinite.
    Perspective {
        fov: f64,
        aspect: f64,
        near: f64,
        far: f64,
    },
    Orthographic {
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
    },
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        let mut m = Mat4::ZERO;
        self.write_into(m.as_mut_array(), 0);
        m
    }

    pub fn write_into<E: Element>(&self, buffer: &mut [E], offset: usize) {
        match *self {
            Projection::Perspective { fov, aspect, near, far } => {
                Mat4::perspective_into(buffer, offset, fov, aspect, near, far)
            }
            Projection::Orthographic { left, right, bottom, top, near, far } => {
                Mat4::orthographic_into(buffer, offset, left, right, bottom, top, near, far)
            }
        }
    }
}

/// Right-handed look-at camera.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Camera {
    pub eye: Vec3,
    pub center: Vec3,
    pub world_up: Vec3,
    pub projection: Projection,
}

impl Camera {
    pub fn new(eye: Vec3, center: Vec3, world_up: Vec3, projection: Projection) -> Camera {
        Camera {
            eye,
            center,
            world_up,
            projection,
        }
    }

    /// Perspective camera with `+Y` up.
    pub fn perspective(
        eye: Vec3,
        center: Vec3,
        fov: f64,
        aspect: f64,
        near: f64,
        far: f64,
    ) -> Camera {
        let projection = Projection::Perspective { fov, aspect, near, far };
        Camera::new(eye, center, Vec3::Y, projection)
    }

    /// Orthographic camera looking down `-Z` at a `width` by `height` area
    /// with the origin in the top-left corner, like pixel coordinates. The
    /// `z = 0` plane lands in the middle of the depth range.
    pub fn canvas(width: f64, height: f64) -> Camera {
        Camera::new(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::ZERO,
            Vec3::Y,
            Projection::Orthographic {
                left: 0.0,
                right: width,
                bottom: height,
                top: 0.0,
                near: 0.0,
                far: 2.0,
            },
        )
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        (self.center - self.eye).normalized()
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.world_up).normalized()
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at(self.eye, self.center, self.world_up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view()
    }

    /// Writes the view and projection matrices, 16 elements each, to the
    /// start of `view` and `projection`.
    pub fn write_uniforms<E: Element>(&self, view: &mut [E], projection: &mut [E]) {
        Mat4::look_at_into(view, 0, self.eye, self.center, self.world_up);
        self.projection.write_into(projection, 0);
    }

    /// Moves eye and center together by `dt * speed`.
    pub fn move_in_direction(&mut self, dir: Direction, dt: f64, speed: f64) {
        let delta = dt * speed;
        let offset = match dir {
            Direction::Right => self.right() * delta,
            Direction::Left => -self.right() * delta,
            Direction::Up => self.world_up * delta,
            Direction::Down => -self.world_up * delta,
            Direction::Forward => self.forward() * delta,
            Direction::Backward => -self.forward() * delta,
        };
        self.eye += offset;
        self.center += offset;
    }

    /// Swings the eye around `center`: `yaw` radians around `world_up`, then
    /// `pitch` radians upwards. The eye stops short of the poles.
    pub fn orbit(&mut self, yaw: f64, pitch: f64) {
        let up = self.world_up.normalized();
        let offset = self.eye - self.center;

        let polar = offset.angle(up);
        let target = scalar::clamp(polar - pitch, POLE_MARGIN, PI - POLE_MARGIN);

        let mut rotation = *Quat::identity().rotate(up, yaw);
        rotation.mult(*Quat::identity().rotate(self.pitch_axis(up), target - polar));
        self.eye = self.center + rotation * offset;
    }

    /// `right()`, or any unit axis orthogonal to `up` when the eye sits on
    /// the `up` axis and `right()` is degenerate.
    fn pitch_axis(&self, up: Vec3) -> Vec3 {
        let right = self.right();
        if right.len() >= EPSILON {
            return right;
        }
        let mut axis = Vec3::X.cross(up);
        if axis.len() < EPSILON {
            axis = Vec3::Y.cross(up);
        }
        axis.normalized()
    }

    /// Updates the aspect ratio after a resize. An orthographic projection
    /// keeps its height and horizontal center.
    pub fn set_aspect(&mut self, aspect: f64) {
        match &mut self.projection {
            Projection::Perspective { aspect: a, .. } => *a = aspect,
            Projection::Orthographic { left, right, bottom, top, .. } => {
                let half_width = (*top - *bottom).abs() * aspect * 0.5;
                let mid = (*left + *right) * 0.5;
                let sign = if *right >= *left { 1.0 } else { -1.0 };
                *left = mid - sign * half_width;
                *right = mid + sign * half_width;
            }
        }
        log::debug!("camera aspect set to {:.3}: {:?}", aspect, self.projection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use math::vec3;

    fn camera() -> Camera {
        Camera::perspective(vec3(0.0, 0.0, 5.0), Vec3::ZERO, PI / 3.0, 16.0 / 9.0, 0.1, 100.0)
    }

    #[test]
    fn basis_is_right_handed() {
        let c = camera();
        assert!(c.forward().approx_eq(&-Vec3::Z));
        assert!(c.right().approx_eq(&Vec3::X));
        assert!(c.up().approx_eq(&Vec3::Y));
    }

    #[test]
    fn moving_translates_eye_and_center() {
        let mut c = camera();
        c.move_in_direction(Direction::Forward, 0.5, 2.0);
        assert!(c.eye.approx_eq(&vec3(0.0, 0.0, 4.0)));
        assert!(c.center.approx_eq(&vec3(0.0, 0.0, -1.0)));

        c.move_in_direction(Direction::Left, 1.0, 3.0);
        c.move_in_direction(Direction::Up, 1.0, 1.0);
        assert!(c.eye.approx_eq(&vec3(-3.0, 1.0, 4.0)));
        assert!(c.forward().approx_eq(&-Vec3::Z));

        c.move_in_direction(Direction::Right, 1.0, 3.0);
        c.move_in_direction(Direction::Down, 1.0, 1.0);
        c.move_in_direction(Direction::Backward, 1.0, 1.0);
        assert!(c.eye.approx_eq(&vec3(0.0, 0.0, 5.0)));
    }

    #[test]
    fn orbit_keeps_distance() {
        let mut c = camera();
        c.orbit(PI / 2.0, 0.0);
        assert!(c.eye.approx_eq(&vec3(5.0, 0.0, 0.0)));

        c.orbit(0.0, PI / 4.0);
        assert_relative_eq!(c.eye.dist(c.center), 5.0, epsilon = 1e-9);
        assert!(c.eye.y > 0.0);
        assert_relative_eq!(c.eye.angle(Vec3::Y), PI / 4.0, epsilon = 1e-9);
    }

    #[test]
    fn orbit_stops_at_pole() {
        let mut c = camera();
        c.orbit(0.0, PI);
        let polar = (c.eye - c.center).angle(Vec3::Y);
        assert_relative_eq!(polar, POLE_MARGIN, epsilon = 1e-9);
        assert!(c.view().as_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn orbit_leaves_the_pole() {
        let mut c = Camera::perspective(vec3(0.0, 5.0, 0.0), Vec3::ZERO, PI / 3.0, 1.0, 0.1, 100.0);
        assert_eq!(c.right(), Vec3::ZERO);
        c.orbit(0.3, -0.5);
        let polar = (c.eye - c.center).angle(Vec3::Y);
        assert_relative_eq!(polar, 0.5, epsilon = 1e-9);
        assert_relative_eq!(c.eye.dist(c.center), 5.0, epsilon = 1e-9);
        assert_relative_eq!(c.right().len(), 1.0, epsilon = 1e-9);

        let mut below = Camera::perspective(vec3(0.0, -5.0, 0.0), Vec3::ZERO, 1.0, 1.0, 0.1, 100.0);
        below.orbit(0.0, 0.0);
        let polar = (below.eye - below.center).angle(Vec3::Y);
        assert_relative_eq!(polar, PI - POLE_MARGIN, epsilon = 1e-9);
    }

    #[test]
    fn view_projection_puts_center_mid_screen() {
        let c = camera();
        let mut p = c.center;
        p.transform_mat4(&c.view_projection());
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        assert!(p.z > -1.0 && p.z < 1.0);
    }

    #[test]
    fn write_uniforms_matches_matrices() {
        let c = camera();
        let mut view = [0.0f32; 16];
        let mut projection = [0.0f32; 16];
        c.write_uniforms(&mut view, &mut projection);
        assert!(Mat4::read_from(&view, 0).equals(&c.view(), 1e-6));
        assert!(Mat4::read_from(&projection, 0).equals(&c.projection_matrix(), 1e-6));
    }

    #[test]
    fn canvas_maps_pixels_to_clip_space() {
        let c = Camera::canvas(800.0, 600.0);
        let vp = c.view_projection();
        let mut top_left = vec3(0.0, 0.0, 0.0);
        top_left.transform_mat4(&vp);
        assert!(top_left.approx_eq(&vec3(-1.0, 1.0, 0.0)));
        let mut bottom_right = vec3(800.0, 600.0, 0.0);
        bottom_right.transform_mat4(&vp);
        assert!(bottom_right.approx_eq(&vec3(1.0, -1.0, 0.0)));
    }

    #[test]
    fn set_aspect() {
        let mut c = camera();
        c.set_aspect(2.0);
        assert!(matches!(c.projection, Projection::Perspective { aspect, .. } if aspect == 2.0));

        let mut o = Camera::canvas(800.0, 600.0);
        o.set_aspect(1.0);
        match o.projection {
            Projection::Orthographic { left, right, .. } => {
                assert_relative_eq!(left, 100.0);
                assert_relative_eq!(right, 700.0);
            }
            p => panic!("unexpected projection {:?}", p),
        }
    }
}
