use crate::error::Result;
use crate::geometry::{Grid, Quad, SegmentCounts};
use crate::math::CoordDirection;

use super::clip_path::ClipMode;
use super::frame::{compose_into, RenderableGeometry, WarpParams};

/// Reusable 2D canvas warp for one source rectangle.
///
/// The flat grid depends only on the quad and the segment counts, so it is
/// built once per [`resize`](Self::resize). The warped grid, the patches and
/// their clip polygons live in the handle and are overwritten by every
/// [`render`](Self::render).
#[derive(Debug, Clone)]
pub struct CanvasWarp {
    params: WarpParams,
    frame: RenderableGeometry,
}

impl CanvasWarp {
    /// Creates a warp of `quad` with the given segment counts.
    #[must_use]
    pub fn new(quad: Quad, counts: SegmentCounts) -> Self {
        Self {
            params: WarpParams::new(quad, counts, 0.0),
            frame: RenderableGeometry {
                original: Grid::subdivide(&quad, counts),
                warped: Grid::empty(counts),
                patches: Vec::with_capacity(counts.cell_count()),
            },
        }
    }

    /// Sets the clip polygon shape used for every cell.
    #[must_use]
    pub fn with_clip_mode(mut self, clip_mode: ClipMode) -> Self {
        self.params.clip_mode = clip_mode;
        self
    }

    /// Sets the direction of +y in the quad's space.
    #[must_use]
    pub fn with_coord_dir(mut self, coord_dir: CoordDirection) -> Self {
        self.params.coord_dir = coord_dir;
        self
    }

    /// The current segment counts.
    #[must_use]
    pub fn counts(&self) -> SegmentCounts {
        self.params.counts
    }

    /// The flat grid every frame is mapped from.
    #[must_use]
    pub fn original(&self) -> &Grid {
        &self.frame.original
    }

    /// The last rendered frame; empty before the first
    /// [`render`](Self::render) and after a [`resize`](Self::resize).
    #[must_use]
    pub fn frame(&self) -> &RenderableGeometry {
        &self.frame
    }

    /// Changes the segment counts, rebuilding the flat grid and dropping the
    /// last frame.
    pub fn resize(&mut self, counts: SegmentCounts) {
        if counts == self.params.counts {
            return;
        }
        tracing::trace!(x = counts.x(), y = counts.y(), "resizing canvas warp");
        self.params.counts = counts;
        self.frame.original = Grid::subdivide(&self.params.quad, counts);
        self.frame.warped.reset(counts);
        self.frame.patches.clear();
    }

    /// Computes the frame for `angle` degrees in place.
    ///
    /// # Errors
    ///
    /// Returns an error if a cell transform fails for a reason other than a
    /// singular system.
    pub fn render(&mut self, angle: f64) -> Result<&RenderableGeometry> {
        self.params.angle = angle;
        compose_into(&self.params, &mut self.frame)?;
        Ok(&self.frame)
    }
}
