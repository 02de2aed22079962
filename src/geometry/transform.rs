use crate::foundation::core::{Affine3A, Quat, Vec3};

/// Rigid transform: an Euler rotation followed by a translation.
///
/// `rotation_deg` holds extrinsic XYZ angles in degrees: the point is rotated about the world X
/// axis first, then Y, then Z. The vertical axis is Z.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    /// Rotation about world X, Y, Z, in degrees, applied in that order.
    pub rotation_deg: Vec3,
    /// Translation applied after the rotation.
    #[serde(default)]
    pub translation: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No rotation, no translation.
    pub const IDENTITY: Self = Self {
        rotation_deg: Vec3::ZERO,
        translation: Vec3::ZERO,
    };

    /// Pure rotation.
    pub fn rotation(rotation_deg: Vec3) -> Self {
        Self {
            rotation_deg,
            translation: Vec3::ZERO,
        }
    }

    /// Pure translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            rotation_deg: Vec3::ZERO,
            translation,
        }
    }

    /// Rotation part as a quaternion (`Rz * Ry * Rx`).
    pub fn quat(&self) -> Quat {
        let r = self.rotation_deg;
        Quat::from_rotation_z(r.z.to_radians())
            * Quat::from_rotation_y(r.y.to_radians())
            * Quat::from_rotation_x(r.x.to_radians())
    }

    /// Matrix form.
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_rotation_translation(self.quat(), self.translation)
    }

    /// Transform a single point.
    pub fn apply(&self, p: Vec3) -> Vec3 {
        self.quat() * p + self.translation
    }

    /// This transform followed by a translation.
    pub fn then_translate(&self, offset: Vec3) -> Self {
        Self {
            rotation_deg: self.rotation_deg,
            translation: self.translation + offset,
        }
    }

    /// This transform followed by a rotation of `angle_deg` about the vertical axis through the
    /// world origin.
    ///
    /// With extrinsic XYZ angles a trailing Z rotation folds into the Z angle, so the result is
    /// still a plain Euler triple.
    pub fn then_spin_z(&self, angle_deg: f32) -> Self {
        let spin = Quat::from_rotation_z(angle_deg.to_radians());
        Self {
            rotation_deg: Vec3::new(
                self.rotation_deg.x,
                self.rotation_deg.y,
                self.rotation_deg.z + angle_deg,
            ),
            translation: spin * self.translation,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/transform.rs"]
mod tests;
