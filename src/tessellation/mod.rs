mod indexed_mesh;
mod mesh_warp;
mod triangle_list;
mod uniforms;

pub use indexed_mesh::{
    indices_len, positions_len, vertex_offset, write_grid_points, write_indices,
    write_rect_points,
};
pub use mesh_warp::{MeshMode, MeshWarp};
pub use triangle_list::{
    triangle_list_len, write_rect_triangle_list, write_triangle_list, TriangleListUpdater,
    FLOATS_PER_CELL, VERTICES_PER_CELL,
};
pub use uniforms::CurveUniforms;
