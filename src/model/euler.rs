use glam::{Mat4, Vec3, Vec4};

/// Yaw/pitch/roll in degrees: yaw about +Z, then pitch about +Y, then roll
/// about +X. The world basis is +X forward, +Y left, +Z up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerAngles {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl EulerAngles {
    pub const ZERO: Self = Self { yaw: 0.0, pitch: 0.0, roll: 0.0 };

    pub fn new(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Forward basis vector (+X at zero orientation).
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        Vec3::new(cy * cp, sy * cp, -sp)
    }

    /// Left basis vector (+Y at zero orientation).
    pub fn left(&self) -> Vec3 {
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        let (sr, cr) = self.roll.to_radians().sin_cos();
        Vec3::new(cy * sp * sr - sy * cr, sy * sp * sr + cy * cr, cp * sr)
    }

    /// Up basis vector (+Z at zero orientation).
    pub fn up(&self) -> Vec3 {
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        let (sr, cr) = self.roll.to_radians().sin_cos();
        Vec3::new(cy * sp * cr + sy * sr, sy * sp * cr - cy * sr, cp * cr)
    }

    /// Rotation matrix whose columns are the forward/left/up basis vectors.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols(
            self.forward().extend(0.0),
            self.left().extend(0.0),
            self.up().extend(0.0),
            Vec4::W,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec3_close(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).length() < 1e-5,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn zero_orientation_is_canonical_basis() {
        let e = EulerAngles::ZERO;
        assert_vec3_close(e.forward(), Vec3::X);
        assert_vec3_close(e.left(), Vec3::Y);
        assert_vec3_close(e.up(), Vec3::Z);
    }

    #[test]
    fn yaw_rotates_forward_toward_left() {
        let e = EulerAngles::new(90.0, 0.0, 0.0);
        assert_vec3_close(e.forward(), Vec3::Y);
        assert_vec3_close(e.left(), -Vec3::X);
    }

    #[test]
    fn pitch_tilts_forward_downward() {
        let e = EulerAngles::new(0.0, 90.0, 0.0);
        assert_vec3_close(e.forward(), -Vec3::Z);
        assert_vec3_close(e.up(), Vec3::X);
    }

    #[test]
    fn basis_stays_orthonormal() {
        let e = EulerAngles::new(33.0, -17.0, 9.0);
        let (i, j, k) = (e.forward(), e.left(), e.up());
        assert!((i.length() - 1.0).abs() < 1e-5);
        assert!(i.dot(j).abs() < 1e-5);
        assert!(j.dot(k).abs() < 1e-5);
        assert_vec3_close(i.cross(j), k);
    }
}
