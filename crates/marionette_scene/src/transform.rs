use glam::{Affine3A, Mat4, Quat, Vec3};
use marionette_animation::ChannelSample;

/// Transform component of a node.
///
/// The local matrix is authoritative: it is what propagation consumes and it
/// may carry data (shear, mirrored axes) that a TRS triple cannot express.
/// The translation / rotation / scale view is kept in sync with it so that an
/// animation channel can replace one component while the others keep their
/// current value.
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,

    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,
    pub(crate) world_inverse: Affine3A,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,
            world_inverse: Affine3A::IDENTITY,
        }
    }

    /// Creates a transform from an authored local matrix.
    #[must_use]
    pub fn from_local_matrix(mat: Affine3A) -> Self {
        let mut transform = Self::new();
        transform.apply_local_matrix(mat);
        transform
    }

    // ========================================================================
    // Local transform
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    #[inline]
    #[must_use]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Sets the local transform as `T * R * S`.
    pub fn set_trs(&mut self, position: Vec3, rotation: Quat, scale: Vec3) {
        self.position = position;
        self.rotation = rotation;
        self.scale = scale;
        self.local_matrix = Affine3A::from_scale_rotation_translation(scale, rotation, position);
    }

    /// Writes a sampled pose. Channels missing from the sample keep their
    /// current value.
    pub fn apply_sample(&mut self, sample: ChannelSample) {
        self.set_trs(
            sample.translation.unwrap_or(self.position),
            sample.rotation.unwrap_or(self.rotation),
            sample.scale.unwrap_or(self.scale),
        );
    }

    /// Sets the local matrix directly and refreshes the TRS view.
    ///
    /// The matrix is stored untouched; only the decomposed view loses shear.
    /// A matrix with a collapsed axis (zero scale) has no recoverable rotation;
    /// the view then holds the identity rotation.
    pub fn apply_local_matrix(&mut self, mat: Affine3A) {
        self.local_matrix = mat;

        let (scale, rotation, translation) = mat.to_scale_rotation_translation();
        self.scale = scale;
        self.rotation = if rotation.is_finite() {
            rotation
        } else {
            Quat::IDENTITY
        };
        self.position = translation;
    }

    /// Helper for authored data that arrives as a 4×4 matrix.
    pub fn apply_local_matrix_from_mat4(&mut self, mat: Mat4) {
        self.apply_local_matrix(Affine3A::from_mat4(mat));
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    // ========================================================================
    // Derived (world) transform
    // ========================================================================

    /// World matrix from the most recent propagation pass.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    /// Inverse of [`Transform::world_matrix`], refreshed with it.
    #[inline]
    #[must_use]
    pub fn world_inverse(&self) -> &Affine3A {
        &self.world_inverse
    }

    /// World matrix as `Mat4`, for renderers uploading to the GPU.
    #[inline]
    #[must_use]
    pub fn world_matrix_as_mat4(&self) -> Mat4 {
        Mat4::from(self.world_matrix)
    }

    /// Stores a freshly propagated world matrix together with its inverse.
    pub fn set_world_matrix(&mut self, mat: Affine3A) {
        self.world_matrix = mat;
        self.world_inverse = mat.inverse();
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_scale_matrix_keeps_finite_rotation() {
        let mut transform = Transform::from_local_matrix(Affine3A::from_scale(Vec3::ZERO));
        assert_eq!(transform.rotation(), Quat::IDENTITY);

        transform.apply_sample(ChannelSample {
            translation: Some(Vec3::new(1.0, 2.0, 3.0)),
            rotation: None,
            scale: None,
        });
        assert!(transform.local_matrix().is_finite());
        assert_eq!(transform.scale(), Vec3::ZERO);
        assert_eq!(
            transform.local_matrix().translation,
            glam::Vec3A::new(1.0, 2.0, 3.0)
        );
    }
}
