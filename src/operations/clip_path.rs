use crate::geometry::Grid;
use crate::math::Point2;

/// How the clip polygons of a cell are shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipMode {
    /// Push each polygon one unit into its neighbours so anti-aliased edges
    /// of adjacent halves overlap and no hairline seams show.
    #[default]
    Seamed,
    /// Raw triangles; cheaper but leaves visible seams on most canvases.
    Plain,
}

/// Clip polygons for the two halves of one warped cell.
///
/// `up` covers the upper-left triangle (top-left, top-right, bottom-left) and
/// `down` the lower-right triangle (bottom-right, top-right, bottom-left),
/// matching [`CellTransforms`](super::CellTransforms).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClipPaths {
    pub up: Vec<Point2>,
    pub down: Vec<Point2>,
}

impl ClipPaths {
    /// Builds the clip polygons for cell `(col, row)` of the warped grid.
    ///
    /// In [`ClipMode::Seamed`] the lower half always extends one unit across
    /// the diagonal toward the top-left corner. The upper half extends one
    /// unit into the cells above and to the left when they exist: through the
    /// diagonal neighbour when both do, along the shared edge when only one
    /// does, not at all for the top-left cell.
    ///
    /// Returns `None` if the cell does not exist.
    #[must_use]
    pub fn compute(warped: &Grid, col: usize, row: usize, mode: ClipMode) -> Option<Self> {
        let mut paths = Self::default();
        paths.compute_into(warped, col, row, mode).then_some(paths)
    }

    /// Same as [`compute`](Self::compute), but overwrites `self` so the
    /// polygon buffers are reused from frame to frame.
    ///
    /// Returns `false`, leaving both paths empty, if the cell does not exist.
    pub fn compute_into(
        &mut self,
        warped: &Grid,
        col: usize,
        row: usize,
        mode: ClipMode,
    ) -> bool {
        self.up.clear();
        self.down.clear();
        let Some([pa, pb, pc, pd]) = warped.cell_corners(col, row) else {
            return false;
        };

        if mode == ClipMode::Plain {
            self.up.extend_from_slice(&[pa, pb, pd]);
            self.down.extend_from_slice(&[pc, pb, pd]);
            return true;
        }

        self.down.extend_from_slice(&[pc, pb, detour(&pb, &pa), detour(&pd, &pa), pd]);

        // The cell exists, so every neighbour looked up below is in the grid.
        let at = |c: usize, r: usize| warped.point(c, r).copied().unwrap_or_else(Point2::origin);
        match (row > 0, col > 0) {
            (true, true) => self.up.extend_from_slice(&[
                detour(&pd, &at(col - 1, row + 1)),
                detour(&pa, &at(col - 1, row - 1)),
                detour(&pb, &at(col + 1, row - 1)),
                pb,
                pd,
            ]),
            (true, false) => self.up.extend_from_slice(&[
                detour(&pa, &at(col, row - 1)),
                detour(&pb, &at(col + 1, row - 1)),
                pb,
                pd,
            ]),
            (false, true) => self.up.extend_from_slice(&[
                detour(&pd, &at(col - 1, row + 1)),
                detour(&pa, &at(col - 1, row)),
                pb,
                pd,
            ]),
            (false, false) => self.up.extend_from_slice(&[pa, pb, pd]),
        }
        true
    }
}

/// Moves exactly one unit from `from` toward `to`.
///
/// Returns `from` unchanged when the points coincide.
#[must_use]
pub fn detour(from: &Point2, to: &Point2) -> Point2 {
    let d = to - from;
    let len = d.norm();
    if len == 0.0 || !len.is_finite() {
        return *from;
    }
    from + d / len
}
