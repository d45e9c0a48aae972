use glam::{Mat4, Vec3, Vec4};
use tracing::warn;

/// Maps the configured axis labels onto signed world basis vectors and builds
/// the change-of-basis matrix whose columns are those vectors. An unrecognized
/// label leaves its column at the zero vector (the resulting matrix is then
/// degenerate); a warning is logged so the bad metadata is visible.
pub fn orientation_matrix(x_label: &str, y_label: &str, z_label: &str) -> Mat4 {
    let x_axis = axis_for_label(x_label, "left", Vec3::Y, "right", -Vec3::Y);
    let y_axis = axis_for_label(y_label, "up", Vec3::Z, "down", -Vec3::Z);
    let z_axis = axis_for_label(z_label, "forward", Vec3::X, "backward", -Vec3::X);

    Mat4::from_cols(
        x_axis.extend(0.0),
        y_axis.extend(0.0),
        z_axis.extend(0.0),
        Vec4::W,
    )
}

fn axis_for_label(label: &str, pos_name: &str, pos_axis: Vec3, neg_name: &str, neg_axis: Vec3) -> Vec3 {
    if label == pos_name {
        pos_axis
    } else if label == neg_name {
        neg_axis
    } else {
        warn!("unrecognized orientation label \"{label}\", basis vector left at zero");
        Vec3::ZERO
    }
}

/// Model-to-world transform: uniform scale followed by the orientation
/// change of basis. Computed once at startup and immutable afterwards.
pub fn model_transform(units_per_meter: f32, x_label: &str, y_label: &str, z_label: &str) -> Mat4 {
    Mat4::from_scale(Vec3::splat(units_per_meter)) * orientation_matrix(x_label, y_label, z_label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(m: &Mat4, i: usize) -> Vec3 {
        m.col(i).truncate()
    }

    #[test]
    fn recognized_labels_map_to_signed_axes() {
        let m = orientation_matrix("left", "up", "forward");
        assert_eq!(column(&m, 0), Vec3::Y);
        assert_eq!(column(&m, 1), Vec3::Z);
        assert_eq!(column(&m, 2), Vec3::X);

        let m = orientation_matrix("right", "down", "backward");
        assert_eq!(column(&m, 0), -Vec3::Y);
        assert_eq!(column(&m, 1), -Vec3::Z);
        assert_eq!(column(&m, 2), -Vec3::X);
    }

    #[test]
    fn unrecognized_label_leaves_zero_vector() {
        let m = orientation_matrix("sideways", "up", "forward");
        assert_eq!(column(&m, 0), Vec3::ZERO);
        assert_eq!(column(&m, 1), Vec3::Z);
        assert_eq!(column(&m, 2), Vec3::X);
        // All three bad: fully degenerate matrix, determinant zero.
        let m = orientation_matrix("a", "b", "c");
        assert_eq!(m.determinant(), 0.0);
    }

    #[test]
    fn model_transform_scales_then_reorients() {
        let m = model_transform(2.0, "left", "up", "forward");
        // Model-space +X ends up along world +Y, scaled by units-per-meter.
        let p = m.transform_point3(Vec3::X);
        assert_eq!(p, Vec3::new(0.0, 2.0, 0.0));
        let p = m.transform_point3(Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(p, Vec3::new(6.0, 0.0, 0.0));
    }
}
