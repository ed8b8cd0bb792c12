//! Placement of a model in the world.

use cgmath::{One, Point3, SquareMatrix};

/// Position, rotation (as quaternion) and scale of one placed model.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

impl Instance {
    /// Identity placement: no move, rotation or scale.
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// A pure translation to `point`.
    pub fn at(point: Point3<f32>) -> Self {
        Self {
            position: cgmath::Vector3::new(point.x, point.y, point.z),
            ..Self::new()
        }
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Inverse-transpose of [`to_matrix`](Self::to_matrix), for transforming
    /// normals. Degenerate scales fall back to the identity.
    pub fn normal_matrix(&self) -> cgmath::Matrix4<f32> {
        use cgmath::Matrix;
        self.to_matrix()
            .invert()
            .unwrap_or_else(cgmath::Matrix4::identity)
            .transpose()
    }
}
