use glam::Vec3;

use crate::model::mesh::VertexPcu;

pub const GRID_DARK_GRAY: [f32; 4] = [0.33, 0.33, 0.33, 1.0];
pub const GRID_SEAWEED: [f32; 4] = [0.13, 0.45, 0.22, 1.0];
pub const GRID_GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
pub const GRID_DARK_RED: [f32; 4] = [0.55, 0.06, 0.06, 1.0];
pub const GRID_RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// Axis-aligned box given by two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb3 {
    pub fn new(min_x: f32, min_y: f32, min_z: f32, max_x: f32, max_y: f32, max_z: f32) -> Self {
        Self {
            min: Vec3::new(min_x, min_y, min_z),
            max: Vec3::new(max_x, max_y, max_z),
        }
    }
}

/// The reference grid as colored boxes: 100 horizontal and 100 vertical minor
/// lines across a 100x100 field, plus 21 thicker major lines per axis every
/// 5 units. The line through the origin is highlighted (green for the Y axis,
/// red for the X axis). Built once at startup, deterministic.
pub fn grid_boxes() -> Vec<(Aabb3, [f32; 4])> {
    let mut boxes = Vec::with_capacity(242);

    // Layout
    for grid_index in 0..100 {
        let offset = grid_index as f32;
        boxes.push((
            Aabb3::new(-50.0, -50.01 + offset, -0.005, 50.0, -49.99 + offset, 0.005),
            GRID_DARK_GRAY,
        ));
        boxes.push((
            Aabb3::new(-50.01 + offset, -50.0, -0.005, -49.99 + offset, 50.0, 0.005),
            GRID_DARK_GRAY,
        ));
    }

    // Y axis
    for x in (0..105).step_by(5) {
        let color = if x == 50 { GRID_GREEN } else { GRID_SEAWEED };
        let x = x as f32;
        boxes.push((
            Aabb3::new(-50.05 + x, -50.0, -0.05, -49.95 + x, 50.0, 0.05),
            color,
        ));
    }

    // X axis
    for y in (0..105).step_by(5) {
        let color = if y == 50 { GRID_RED } else { GRID_DARK_RED };
        let y = y as f32;
        boxes.push((
            Aabb3::new(-50.0, -50.05 + y, -0.05, 50.0, -49.95 + y, 0.05),
            color,
        ));
    }

    boxes
}

pub fn build_grid_vertices() -> Vec<VertexPcu> {
    let boxes = grid_boxes();
    let mut verts = Vec::with_capacity(boxes.len() * 36);
    for (bounds, color) in &boxes {
        add_verts_for_aabb3(&mut verts, bounds, *color);
    }
    verts
}

/// Appends 36 unindexed vertices (12 triangles, outward-facing CCW winding)
/// for the box.
pub fn add_verts_for_aabb3(verts: &mut Vec<VertexPcu>, bounds: &Aabb3, color: [f32; 4]) {
    let (min, max) = (bounds.min, bounds.max);
    let p000 = [min.x, min.y, min.z];
    let p100 = [max.x, min.y, min.z];
    let p110 = [max.x, max.y, min.z];
    let p010 = [min.x, max.y, min.z];
    let p001 = [min.x, min.y, max.z];
    let p101 = [max.x, min.y, max.z];
    let p111 = [max.x, max.y, max.z];
    let p011 = [min.x, max.y, max.z];

    let mut quad = |a: [f32; 3], b: [f32; 3], c: [f32; 3], d: [f32; 3]| {
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        for (pos, uv) in [(a, uvs[0]), (b, uvs[1]), (c, uvs[2]), (a, uvs[0]), (c, uvs[2]), (d, uvs[3])] {
            verts.push(VertexPcu { pos, color, uv });
        }
    };

    quad(p001, p101, p111, p011); // +Z
    quad(p000, p010, p110, p100); // -Z
    quad(p100, p110, p111, p101); // +X
    quad(p000, p001, p011, p010); // -X
    quad(p010, p011, p111, p110); // +Y
    quad(p000, p100, p101, p001); // -Y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_fixed_box_counts() {
        let boxes = grid_boxes();
        assert_eq!(boxes.len(), 242);

        let count = |color: [f32; 4]| boxes.iter().filter(|(_, c)| *c == color).count();
        assert_eq!(count(GRID_DARK_GRAY), 200);
        assert_eq!(count(GRID_GREEN), 1);
        assert_eq!(count(GRID_SEAWEED), 20);
        assert_eq!(count(GRID_RED), 1);
        assert_eq!(count(GRID_DARK_RED), 20);
    }

    #[test]
    fn origin_lines_sit_on_their_axes() {
        let boxes = grid_boxes();
        let (green, _) = boxes.iter().find(|(_, c)| *c == GRID_GREEN).unwrap().clone();
        // The Y-axis line straddles x = 0.
        assert!(green.min.x < 0.0 && green.max.x > 0.0);
        let (red, _) = boxes.iter().find(|(_, c)| *c == GRID_RED).unwrap().clone();
        assert!(red.min.y < 0.0 && red.max.y > 0.0);
    }

    #[test]
    fn grid_construction_is_deterministic() {
        assert_eq!(grid_boxes(), grid_boxes());
        let verts = build_grid_vertices();
        assert_eq!(verts.len(), 242 * 36);
        assert_eq!(verts, build_grid_vertices());
    }
}
