use crate::error::Result;
use crate::geometry::{BendCurve, Grid, Quad, SegmentCounts};
use crate::math::CoordDirection;

use super::clip_path::{ClipMode, ClipPaths};
use super::patch::CellTransforms;

/// Everything that describes one warped frame.
///
/// The application owns one instance, changes fields as its inputs change,
/// and calls [`compute_frame`] again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpParams {
    pub quad: Quad,
    pub counts: SegmentCounts,
    /// Bend angle in degrees.
    pub angle: f64,
    pub coord_dir: CoordDirection,
    /// Surface `width / height`; only meaningful in stretched spaces.
    pub aspect_ratio: f64,
    pub clip_mode: ClipMode,
}

impl WarpParams {
    /// Creates parameters for bending `quad` by `angle` degrees.
    #[must_use]
    pub fn new(quad: Quad, counts: SegmentCounts, angle: f64) -> Self {
        Self {
            quad,
            counts,
            angle,
            ..Self::default()
        }
    }

    /// The bend described by these parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the aspect ratio is not positive and finite.
    pub fn bend(&self) -> Result<BendCurve> {
        BendCurve::new(self.quad, self.angle, self.counts)
            .with_coord_dir(self.coord_dir)
            .with_aspect_ratio(self.aspect_ratio)
    }
}

impl Default for WarpParams {
    fn default() -> Self {
        Self {
            quad: Quad::default(),
            counts: SegmentCounts::default(),
            angle: 0.0,
            coord_dir: CoordDirection::Down,
            aspect_ratio: 1.0,
            clip_mode: ClipMode::Seamed,
        }
    }
}

/// Drawing instructions for one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellPatch {
    pub col: usize,
    pub row: usize,
    pub transforms: CellTransforms,
    pub clip: ClipPaths,
}

/// Output of [`compute_frame`].
///
/// For an out-of-range angle `warped` is empty and there are no patches.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableGeometry {
    pub original: Grid,
    pub warped: Grid,
    pub patches: Vec<CellPatch>,
}

impl RenderableGeometry {
    /// Returns `true` if there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}

/// Computes everything a 2D renderer needs to draw one frame.
///
/// Cells whose source triangle is degenerate are skipped with a warning.
///
/// # Errors
///
/// Returns an error if the aspect ratio is invalid, or if a cell transform
/// fails for a reason other than a singular system.
pub fn compute_frame(params: &WarpParams) -> Result<RenderableGeometry> {
    let mut frame = RenderableGeometry {
        original: Grid::subdivide(&params.quad, params.counts),
        warped: Grid::empty(params.counts),
        patches: Vec::new(),
    };
    compose_into(params, &mut frame)?;
    Ok(frame)
}

/// Rebuilds `frame.warped` and `frame.patches` against the flat grid already
/// in `frame.original`, reusing their storage.
pub(crate) fn compose_into(params: &WarpParams, frame: &mut RenderableGeometry) -> Result<()> {
    let bend = params.bend()?;
    let RenderableGeometry {
        original,
        warped,
        patches,
    } = frame;
    bend.compute_vertices_into(warped);

    let mut used = 0;
    for (col, row) in warped.cells() {
        let transforms = match CellTransforms::compute(original, warped, col, row) {
            Ok(t) => t,
            Err(e) if e.is_singular() => {
                tracing::warn!(col, row, "degenerate cell, skipping");
                continue;
            }
            Err(e) => return Err(e),
        };
        if used == patches.len() {
            patches.push(CellPatch {
                col,
                row,
                transforms,
                clip: ClipPaths::default(),
            });
        }
        let patch = &mut patches[used];
        if !patch.clip.compute_into(warped, col, row, params.clip_mode) {
            continue;
        }
        patch.col = col;
        patch.row = row;
        patch.transforms = transforms;
        used += 1;
    }
    patches.truncate(used);

    tracing::debug!(angle = params.angle, cells = used, "computed frame");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn params(angle: f64) -> WarpParams {
        WarpParams::new(
            Quad::from_rect(0.0, 0.0, 100.0, 50.0).unwrap(),
            SegmentCounts::new(4, 2).unwrap(),
            angle,
        )
    }

    #[test]
    fn one_patch_per_cell() {
        let frame = compute_frame(&params(90.0)).unwrap();
        assert_eq!(frame.original.len(), 15);
        assert_eq!(frame.warped.len(), 15);
        assert_eq!(frame.patches.len(), 8);
        let order: Vec<_> = frame.patches.iter().map(|p| (p.col, p.row)).collect();
        assert_eq!(&order[..5], &[(0, 0), (1, 0), (2, 0), (3, 0), (0, 1)]);
    }

    #[test]
    fn patches_map_original_onto_warped() {
        let frame = compute_frame(&params(-135.0)).unwrap();
        for patch in &frame.patches {
            let [o1, ..] = frame.original.cell_corners(patch.col, patch.row).unwrap();
            let [p1, ..] = frame.warped.cell_corners(patch.col, patch.row).unwrap();
            let q = patch.transforms.upper.apply(&o1);
            assert_relative_eq!(q.x, p1.x, epsilon = 1e-9, max_relative = 1e-9);
            assert_relative_eq!(q.y, p1.y, epsilon = 1e-9, max_relative = 1e-9);
        }
    }

    #[test]
    fn out_of_range_angle_draws_nothing() {
        let frame = compute_frame(&params(200.0)).unwrap();
        assert!(frame.warped.is_empty());
        assert!(frame.is_empty());
        assert_eq!(frame.original.len(), 15);
    }

    #[test]
    fn plain_clip_mode_is_forwarded() {
        let mut p = params(30.0);
        p.clip_mode = ClipMode::Plain;
        let frame = compute_frame(&p).unwrap();
        assert!(frame.patches.iter().all(|c| c.clip.up.len() == 3));
    }

    #[test]
    fn invalid_aspect_ratio_is_an_error() {
        let mut p = params(30.0);
        p.aspect_ratio = 0.0;
        assert!(compute_frame(&p).is_err());
    }

    #[test]
    fn default_params_are_flat() {
        let frame = compute_frame(&WarpParams::default()).unwrap();
        assert_eq!(frame.patches.len(), 100);
        assert_eq!(frame.original, frame.warped);
    }
}
