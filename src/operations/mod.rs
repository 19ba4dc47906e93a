mod canvas_warp;
mod clip_path;
mod frame;
mod patch;

pub use canvas_warp::CanvasWarp;
pub use clip_path::{detour, ClipMode, ClipPaths};
pub use frame::{compute_frame, CellPatch, RenderableGeometry, WarpParams};
pub use patch::CellTransforms;
