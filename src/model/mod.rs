// MODEL: Camera, orientation and mesh data
pub mod camera;
pub mod euler;
pub mod grid;
pub mod mesh;
pub mod orientation;

pub use camera::{Camera, ScreenCamera};
pub use euler::EulerAngles;
pub use grid::{build_grid_vertices, grid_boxes};
pub use mesh::{load_obj_mesh, upload_vertices, MeshBuffer, VertexPcu, VertexPcutbn};
pub use orientation::{model_transform, orientation_matrix};
