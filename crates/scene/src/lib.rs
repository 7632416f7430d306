use bytemuck::cast_slice;

use math::{Mat2, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

pub mod camera;
pub mod instances;

pub use camera::*;
pub use instances::*;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("instance {index} out of range for buffer of {len} instances")]
    InstanceOutOfRange { index: usize, len: usize },
}

/// Flattens a value into the `f32` layout shaders expect.
pub trait Upload {
    fn upload(&self, out: &mut Vec<f32>);

    fn to_uniform_bytes(&self) -> Vec<u8> {
        let mut floats = Vec::new();
        self.upload(&mut floats);
        cast_slice(&floats).to_vec()
    }
}

macro_rules! upload_impl {
    ($($t: ident),*) => {
        $(
            impl Upload for $t {
                fn upload(&self, out: &mut Vec<f32>) {
                    out.extend(self.as_array().iter().map(|&v| v as f32));
                }
            }
        )*
    }
}

upload_impl!(Vec2, Vec3, Vec4, Mat2, Mat3, Mat4, Quat);

impl<T: Upload> Upload for [T] {
    fn upload(&self, out: &mut Vec<f32>) {
        for v in self.iter() {
            v.upload(out);
        }
    }
}

impl<T: Upload> Upload for Vec<T> {
    fn upload(&self, out: &mut Vec<f32>) {
        self.as_slice().upload(out);
    }
}

impl Upload for InstanceBuffer {
    fn upload(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(self.as_slice());
    }
}
