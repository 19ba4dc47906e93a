use bytemuck::{Pod, Zeroable};

use crate::geometry::CurveParams;

/// Uniform block for a vertex shader that bends the mesh itself.
///
/// The shader receives each vertex's `(col, row)` grid index as an attribute
/// and evaluates
///
/// ```text
/// r = top_radius - row * radius_delta
/// θ = from_angle + col * angle_step
/// position = (center.x + r sin θ, (center.y + r cos θ · curve_dir) · aspect_ratio)
/// ```
///
/// unless `use_position` is set, in which case it passes the flat position
/// through.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct CurveUniforms {
    pub center: [f32; 2],
    pub top_radius: f32,
    pub radius_delta: f32,
    pub from_angle: f32,
    pub angle_step: f32,
    pub curve_dir: f32,
    pub aspect_ratio: f32,
    pub use_position: u32,
    pub _pad: [u32; 3],
}

impl CurveUniforms {
    /// Uniforms that leave the mesh flat.
    #[must_use]
    pub fn flat() -> Self {
        Self {
            aspect_ratio: 1.0,
            use_position: 1,
            ..Self::default()
        }
    }

    /// The block as raw bytes, ready for upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[allow(clippy::cast_possible_truncation)]
impl From<&CurveParams> for CurveUniforms {
    fn from(params: &CurveParams) -> Self {
        Self {
            center: [params.center.x as f32, params.center.y as f32],
            top_radius: params.top_radius as f32,
            radius_delta: params.radius_delta as f32,
            from_angle: params.from_angle as f32,
            angle_step: params.angle_step as f32,
            curve_dir: params.curve_dir as f32,
            aspect_ratio: params.aspect_ratio as f32,
            use_position: 0,
            _pad: [0; 3],
        }
    }
}

impl From<Option<CurveParams>> for CurveUniforms {
    fn from(params: Option<CurveParams>) -> Self {
        params.as_ref().map_or_else(Self::flat, Self::from)
    }
}
