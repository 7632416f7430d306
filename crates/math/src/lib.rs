//! Vectors, matrices and quaternions for feeding a graphics API.
//!
//! Every type is a small `Copy` value over `f64` components with a fixed
//! `#[repr(C)]` layout, so it can be viewed as a flat array and uploaded as-is.
//! Matrices are column-major and multiply column vectors from the left.
//!
//! Most methods mutate the receiver and hand back `&mut Self`, so calls chain:
//!
//! ```
//! use math::{vec3, Mat4};
//!
//! let mut m = Mat4::identity();
//! m.translate(vec3(1.0, 2.0, 3.0)).rotate_z(0.5).scale(vec3(2.0, 2.0, 2.0));
//! ```
//!
//! Factories that produce a full matrix or quaternion also come in a
//! `*_into(buffer, offset, ..)` form that writes the flat representation
//! straight into a caller-owned `f32` or `f64` slice.

pub mod buffer;
pub mod mat;
pub mod quat;
pub mod scalar;
pub mod vec;

pub use buffer::Element;
pub use mat::{Mat2, Mat3, Mat4};
pub use quat::{quat, Quat};
pub use scalar::{clamp, deg, fhypot, lerp, norm, rad, DEG, EPSILON, RAD};
pub use vec::{vec2, vec3, vec4, HexError, Vec2, Vec3, Vec4};
