use bytemuck::cast_slice;

use math::{Mat4, Quat, Vec3};

use crate::SceneError;

pub const FLOATS_PER_INSTANCE: usize = 16;

/// Per-instance model matrices packed back to back, ready for a vertex
/// buffer with a `mat4` instance attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceBuffer {
    data: Vec<f32>,
}

impl InstanceBuffer {
    pub fn new() -> InstanceBuffer {
        InstanceBuffer { data: Vec::new() }
    }

    pub fn with_capacity(instances: usize) -> InstanceBuffer {
        log::debug!("allocating instance buffer for {} instances", instances);
        InstanceBuffer {
            data: Vec::with_capacity(instances * FLOATS_PER_INSTANCE),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / FLOATS_PER_INSTANCE
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Grows or shrinks to `instances`. New slots hold the identity.
    pub fn resize(&mut self, instances: usize) {
        let old = self.len();
        if instances > old {
            self.data.reserve((instances - old) * FLOATS_PER_INSTANCE);
            for _ in old..instances {
                self.data.extend(Mat4::IDENTITY.as_array().iter().map(|&v| v as f32));
            }
        } else {
            self.data.truncate(instances * FLOATS_PER_INSTANCE);
        }
        log::debug!("instance buffer resized from {} to {} instances", old, instances);
    }

    /// Appends an instance and returns its index.
    pub fn push(&mut self, pos: Vec3, scale: Vec3, rot: Quat) -> usize {
        let index = self.len();
        self.data.resize(self.data.len() + FLOATS_PER_INSTANCE, 0.0);
        let offset = index * FLOATS_PER_INSTANCE;
        Mat4::translated_scaled_rotated_into(&mut self.data, offset, pos, scale, rot);
        index
    }

    pub fn set(
        &mut self,
        index: usize,
        pos: Vec3,
        scale: Vec3,
        rot: Quat,
    ) -> Result<(), SceneError> {
        let offset = self.offset(index)?;
        Mat4::translated_scaled_rotated_into(&mut self.data, offset, pos, scale, rot);
        Ok(())
    }

    pub fn matrix(&self, index: usize) -> Result<Mat4, SceneError> {
        let offset = self.offset(index)?;
        Ok(Mat4::read_from(&self.data, offset))
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        cast_slice(&self.data)
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    fn offset(&self, index: usize) -> Result<usize, SceneError> {
        let len = self.len();
        if index < len {
            Ok(index * FLOATS_PER_INSTANCE)
        } else {
            Err(SceneError::InstanceOutOfRange { index, len })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math::vec3;

    #[test]
    fn resize_fills_identity() {
        let mut b = InstanceBuffer::with_capacity(4);
        assert!(b.is_empty());
        b.resize(3);
        assert_eq!(b.len(), 3);
        assert_eq!(b.as_slice().len(), 48);
        for i in 0..3 {
            assert_eq!(b.matrix(i), Ok(Mat4::IDENTITY));
        }
        b.resize(1);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn set_writes_only_its_slot() {
        let mut b = InstanceBuffer::new();
        b.resize(3);
        let rot = Quat::from_euler(0.0, 0.0, 90.0);
        b.set(1, vec3(1.0, 2.0, 3.0), vec3(2.0, 2.0, 2.0), rot).unwrap();

        assert_eq!(b.matrix(0), Ok(Mat4::IDENTITY));
        assert_eq!(b.matrix(2), Ok(Mat4::IDENTITY));
        let expected =
            Mat4::translated_scaled_rotated(vec3(1.0, 2.0, 3.0), vec3(2.0, 2.0, 2.0), rot);
        assert!(b.matrix(1).unwrap().equals(&expected, 1e-6));
    }

    #[test]
    fn push_appends() {
        let mut b = InstanceBuffer::new();
        assert_eq!(b.push(Vec3::ZERO, vec3(1.0, 1.0, 1.0), Quat::IDENTITY), 0);
        assert_eq!(b.push(vec3(5.0, 0.0, 0.0), vec3(1.0, 1.0, 1.0), Quat::IDENTITY), 1);
        assert_eq!(b.len(), 2);
        assert_eq!(&b.as_slice()[16..32][12..], &[5.0, 0.0, 0.0, 1.0]);
        b.clear();
        assert!(b.is_empty());
    }

    #[test]
    fn out_of_range() {
        let mut b = InstanceBuffer::new();
        b.resize(2);
        assert_eq!(
            b.set(2, Vec3::ZERO, Vec3::ZERO, Quat::IDENTITY),
            Err(SceneError::InstanceOutOfRange { index: 2, len: 2 })
        );
        assert!(b.matrix(7).is_err());
    }

    #[test]
    fn bytes_cover_every_float() {
        let mut b = InstanceBuffer::new();
        b.resize(2);
        assert_eq!(b.as_bytes().len(), 2 * FLOATS_PER_INSTANCE * 4);
    }
}
