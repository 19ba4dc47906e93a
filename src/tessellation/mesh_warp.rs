use crate::error::{GeometryError, Result};
use crate::geometry::{BendCurve, Quad, SegmentCounts};
use crate::math::{CoordDirection, Point2};

use super::indexed_mesh::{indices_len, positions_len, write_indices, write_rect_points};
use super::triangle_list::{triangle_list_len, write_rect_triangle_list, TriangleListUpdater};
use super::uniforms::CurveUniforms;

/// Where the bend is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeshMode {
    /// The CPU writes bent positions into a non-indexed triangle list every
    /// frame.
    #[default]
    Vertices,
    /// Buffers stay static and indexed; the vertex shader bends the mesh from
    /// [`CurveUniforms`] and per-vertex grid indices.
    Uniforms,
}

/// Reusable GPU warp for one rectangle on a canvas.
///
/// Buffers are sized on construction and on [`resize`](Self::resize) and
/// rewritten in place by [`render`](Self::render). All geometry is in
/// normalized device coordinates.
#[derive(Debug, Clone)]
pub struct MeshWarp {
    quad: Quad,
    aspect_ratio: f64,
    mode: MeshMode,
    counts: SegmentCounts,
    flip_texture: bool,
    positions: Vec<f32>,
    tex_coords: Vec<f32>,
    grid_indices: Vec<f32>,
    indices: Vec<u32>,
    uniforms: CurveUniforms,
}

impl MeshWarp {
    /// Creates a warp for `rect`, given in canvas pixels, on a canvas of
    /// `width` by `height` pixels.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas size is not positive or the static
    /// buffers cannot be filled.
    pub fn new(
        rect: &Quad,
        width: f64,
        height: f64,
        counts: SegmentCounts,
        mode: MeshMode,
    ) -> Result<Self> {
        check_canvas_side("width", width)?;
        check_canvas_side("height", height)?;

        let mut warp = Self {
            quad: rect.to_ndc(width, height),
            aspect_ratio: width / height,
            mode,
            counts,
            flip_texture: false,
            positions: Vec::new(),
            tex_coords: Vec::new(),
            grid_indices: Vec::new(),
            indices: Vec::new(),
            uniforms: CurveUniforms::flat(),
        };
        warp.allocate()?;
        Ok(warp)
    }

    /// Flips texture coordinates vertically, for sources uploaded top row
    /// first such as rendered text bitmaps.
    ///
    /// # Errors
    ///
    /// Returns an error if the static buffers cannot be refilled.
    pub fn with_texture_flip(mut self, flip: bool) -> Result<Self> {
        if flip != self.flip_texture {
            self.flip_texture = flip;
            self.allocate()?;
        }
        Ok(self)
    }

    /// The current segment counts.
    #[must_use]
    pub fn counts(&self) -> SegmentCounts {
        self.counts
    }

    /// The evaluation mode.
    #[must_use]
    pub fn mode(&self) -> MeshMode {
        self.mode
    }

    /// Corners of the rectangle in NDC.
    #[must_use]
    pub fn quad(&self) -> &Quad {
        &self.quad
    }

    /// Changes the segment counts, reallocating every buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the static buffers cannot be filled.
    pub fn resize(&mut self, counts: SegmentCounts) -> Result<()> {
        if counts == self.counts {
            return Ok(());
        }
        self.counts = counts;
        self.allocate()
    }

    /// Updates the buffers or uniforms for `angle` degrees.
    ///
    /// Returns `false`, leaving everything untouched, if the angle is out of
    /// range.
    ///
    /// # Errors
    ///
    /// Returns an error if the position buffer does not match the counts.
    pub fn render(&mut self, angle: f64) -> Result<bool> {
        let bend = BendCurve::new(self.quad, angle, self.counts)
            .with_coord_dir(CoordDirection::Up)
            .with_aspect_ratio(self.aspect_ratio)?;
        if !bend.is_angle_valid() {
            tracing::debug!(angle, "bend angle out of range, keeping last frame");
            return Ok(false);
        }

        match self.mode {
            MeshMode::Vertices => {
                let updater = TriangleListUpdater::new(self.counts);
                let positions = &mut self.positions;
                let mut result = Ok(());
                bend.for_each_vertex(|v| {
                    if result.is_ok() {
                        result = updater.write(&mut positions[..], v.col, v.row, &v.position);
                    }
                });
                result?;
            }
            MeshMode::Uniforms => self.uniforms = CurveUniforms::from(bend.curve_params()),
        }
        Ok(true)
    }

    /// Vertex positions: a triangle list in [`MeshMode::Vertices`], the flat
    /// indexed grid in [`MeshMode::Uniforms`].
    #[must_use]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Texture coordinates, laid out like [`positions`](Self::positions).
    #[must_use]
    pub fn tex_coords(&self) -> &[f32] {
        &self.tex_coords
    }

    /// Per-vertex `(col, row)` grid indices; empty in [`MeshMode::Vertices`].
    #[must_use]
    pub fn grid_indices(&self) -> &[f32] {
        &self.grid_indices
    }

    /// Triangle indices; empty in [`MeshMode::Vertices`].
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// The uniform block for the last rendered angle.
    #[must_use]
    pub fn uniforms(&self) -> &CurveUniforms {
        &self.uniforms
    }

    /// Number of vertices to draw.
    #[must_use]
    pub fn draw_count(&self) -> usize {
        match self.mode {
            MeshMode::Vertices => self.positions.len() / 2,
            MeshMode::Uniforms => self.indices.len(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn allocate(&mut self) -> Result<()> {
        let counts = self.counts;
        tracing::trace!(
            x = counts.x(),
            y = counts.y(),
            mode = ?self.mode,
            "allocating mesh buffers"
        );

        let (tex_tl, tex_tr, tex_bl) = (
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 0.0),
        );
        let (tl, tr, bl) = (self.quad.pa(), self.quad.pb(), self.quad.pd());

        match self.mode {
            MeshMode::Vertices => {
                let len = triangle_list_len(counts);
                self.positions = vec![0.0; len];
                self.tex_coords = vec![0.0; len];
                self.grid_indices = Vec::new();
                self.indices = Vec::new();
                write_rect_triangle_list(&tl, &tr, &bl, counts, false, &mut self.positions)?;
                write_rect_triangle_list(
                    &tex_tl,
                    &tex_tr,
                    &tex_bl,
                    counts,
                    self.flip_texture,
                    &mut self.tex_coords,
                )?;
            }
            MeshMode::Uniforms => {
                let len = positions_len(counts);
                self.positions = vec![0.0; len];
                self.tex_coords = vec![0.0; len];
                self.grid_indices = vec![0.0; len];
                self.indices = vec![0; indices_len(counts)];
                write_rect_points(&tl, &tr, &bl, counts, false, &mut self.positions)?;
                write_rect_points(
                    &tex_tl,
                    &tex_tr,
                    &tex_bl,
                    counts,
                    self.flip_texture,
                    &mut self.tex_coords,
                )?;
                write_rect_points(
                    &Point2::origin(),
                    &Point2::new(counts.x() as f64, 0.0),
                    &Point2::new(0.0, counts.y() as f64),
                    counts,
                    false,
                    &mut self.grid_indices,
                )?;
                write_indices(counts, &mut self.indices)?;
            }
        }
        self.uniforms = CurveUniforms::flat();
        Ok(())
    }
}

fn check_canvas_side(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(GeometryError::ParameterOutOfRange {
        parameter,
        value,
        min: f64::MIN_POSITIVE,
        max: f64::MAX,
    }
    .into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CurveWarpError;
    use crate::tessellation::indexed_mesh::vertex_offset;
    use crate::tessellation::triangle_list::write_triangle_list;

    fn rect() -> Quad {
        Quad::from_rect(100.0, 50.0, 200.0, 100.0).unwrap()
    }

    fn counts(x: usize, y: usize) -> SegmentCounts {
        SegmentCounts::new(x, y).unwrap()
    }

    #[test]
    fn vertex_mode_matches_full_rewrite() {
        let c = counts(5, 3);
        let mut warp = MeshWarp::new(&rect(), 400.0, 200.0, c, MeshMode::Vertices).unwrap();
        assert_eq!(warp.draw_count(), 90);
        assert!(warp.render(70.0).unwrap());

        let grid = BendCurve::new(*warp.quad(), 70.0, c)
            .with_coord_dir(CoordDirection::Up)
            .with_aspect_ratio(2.0)
            .unwrap()
            .compute_vertices();
        let mut expected = vec![0.0_f32; triangle_list_len(c)];
        write_triangle_list(&grid, &mut expected).unwrap();
        assert_eq!(warp.positions(), expected.as_slice());
    }

    #[test]
    fn zero_angle_restores_flat_positions() {
        let c = counts(4, 4);
        let mut warp = MeshWarp::new(&rect(), 400.0, 200.0, c, MeshMode::Vertices).unwrap();
        let flat = warp.positions().to_vec();
        warp.render(-120.0).unwrap();
        assert_ne!(warp.positions(), flat.as_slice());
        warp.render(0.0).unwrap();
        for (a, b) in warp.positions().iter().zip(&flat) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn out_of_range_keeps_last_frame() {
        let mut warp =
            MeshWarp::new(&rect(), 400.0, 200.0, counts(3, 3), MeshMode::Vertices).unwrap();
        warp.render(45.0).unwrap();
        let before = warp.positions().to_vec();
        assert!(!warp.render(300.0).unwrap());
        assert_eq!(warp.positions(), before.as_slice());
    }

    #[test]
    fn uniform_mode_evaluates_in_shader() {
        let c = counts(6, 2);
        let mut warp = MeshWarp::new(&rect(), 400.0, 200.0, c, MeshMode::Uniforms).unwrap();
        assert_eq!(warp.draw_count(), 72);
        assert_eq!(warp.uniforms().use_position, 1);

        warp.render(60.0).unwrap();
        let u = *warp.uniforms();
        assert_eq!(u.use_position, 0);

        // Evaluating the block at a grid index reproduces the CPU vertex.
        let bend = BendCurve::new(*warp.quad(), 60.0, c)
            .with_coord_dir(CoordDirection::Up)
            .with_aspect_ratio(2.0)
            .unwrap();
        for v in bend.vertices() {
            let i = vertex_offset(c, v.col, v.row);
            let (col, row) = (warp.grid_indices()[i], warp.grid_indices()[i + 1]);
            let r = u.top_radius - row * u.radius_delta;
            let theta = u.from_angle + col * u.angle_step;
            let x = u.center[0] + r * theta.sin();
            let y = (u.center[1] + r * theta.cos() * u.curve_dir) * u.aspect_ratio;
            #[allow(clippy::cast_possible_truncation)]
            let (ex, ey) = (v.position.x as f32, v.position.y as f32);
            assert!((x - ex).abs() < 1e-4);
            assert!((y - ey).abs() < 1e-4);
        }

        warp.render(0.0).unwrap();
        assert_eq!(warp.uniforms().use_position, 1);
    }

    #[test]
    fn resize_reallocates() {
        let mut warp =
            MeshWarp::new(&rect(), 400.0, 200.0, counts(2, 2), MeshMode::Uniforms).unwrap();
        warp.resize(counts(8, 4)).unwrap();
        assert_eq!(warp.positions().len(), 90);
        assert_eq!(warp.grid_indices().len(), 90);
        assert_eq!(warp.indices().len(), 192);
        assert_eq!(warp.counts(), counts(8, 4));
    }

    #[test]
    fn texture_flip_reverses_rows() {
        let c = counts(2, 2);
        let plain = MeshWarp::new(&rect(), 400.0, 200.0, c, MeshMode::Uniforms).unwrap();
        let flipped = plain.clone().with_texture_flip(true).unwrap();
        assert_eq!(plain.tex_coords()[..2], [0.0, 1.0]);
        assert_eq!(flipped.tex_coords()[..2], [0.0, 0.0]);
        assert_eq!(plain.positions(), flipped.positions());
    }

    #[test]
    fn rejects_degenerate_canvas() {
        let c = counts(2, 2);
        for (width, height) in [
            (400.0, 0.0),
            (0.0, 200.0),
            (-400.0, -200.0),
            (-400.0, 200.0),
            (f64::NAN, 200.0),
            (400.0, f64::INFINITY),
        ] {
            let err = MeshWarp::new(&rect(), width, height, c, MeshMode::Vertices).unwrap_err();
            assert!(matches!(
                err,
                CurveWarpError::Geometry(GeometryError::ParameterOutOfRange { .. })
            ));
        }
    }
}
