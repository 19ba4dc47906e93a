use crate::error::{Result, TessellationError};
use crate::geometry::{Grid, SegmentCounts};
use crate::math::Point2;

/// Vertices emitted per cell.
pub const VERTICES_PER_CELL: usize = 6;

/// Floats emitted per cell.
pub const FLOATS_PER_CELL: usize = 2 * VERTICES_PER_CELL;

/// Number of floats needed for a triangle list of `counts`.
///
/// Every cell becomes two triangles, six vertices of two floats each, in the
/// order `[tl, tr, bl, tr, bl, br]`. Cells are stored row-major, so cell
/// `(col, row)` starts at float `12 * (row * x + col)`.
#[must_use]
pub fn triangle_list_len(counts: SegmentCounts) -> usize {
    counts.cell_count() * FLOATS_PER_CELL
}

/// Writes the triangle list of a grid into `out`.
///
/// # Errors
///
/// Returns [`TessellationError::EmptyGrid`] for an empty grid and
/// [`TessellationError::BufferTooSmall`] if `out` is shorter than
/// [`triangle_list_len`].
pub fn write_triangle_list(grid: &Grid, out: &mut [f32]) -> Result<()> {
    if grid.is_empty() {
        return Err(TessellationError::EmptyGrid.into());
    }
    let counts = grid.counts();
    check_len(triangle_list_len(counts), out.len())?;

    for ((col, row), chunk) in grid.cells().zip(out.chunks_exact_mut(FLOATS_PER_CELL)) {
        if let Some([tl, tr, br, bl]) = grid.cell_corners(col, row) {
            write_cell(chunk, &tl, &tr, &bl, &br);
        }
    }
    Ok(())
}

/// Writes the triangle list of the axis-aligned rectangle spanned by `tl`,
/// `tr` and `bl`.
///
/// With `flip` the rows are taken bottom-up, which turns image-space texture
/// coordinates into GL texture space.
///
/// # Errors
///
/// Returns [`TessellationError::BufferTooSmall`] if `out` is shorter than
/// [`triangle_list_len`].
pub fn write_rect_triangle_list(
    tl: &Point2,
    tr: &Point2,
    bl: &Point2,
    counts: SegmentCounts,
    flip: bool,
    out: &mut [f32],
) -> Result<()> {
    check_len(triangle_list_len(counts), out.len())?;

    let lattice = RectLattice::new(tl, tr, bl, counts, flip);
    let cells = (0..counts.y()).flat_map(|row| (0..counts.x()).map(move |col| (col, row)));
    for ((col, row), chunk) in cells.zip(out.chunks_exact_mut(FLOATS_PER_CELL)) {
        write_cell(
            chunk,
            &lattice.point(col, row),
            &lattice.point(col + 1, row),
            &lattice.point(col, row + 1),
            &lattice.point(col + 1, row + 1),
        );
    }
    Ok(())
}

/// Writes single grid vertices into every triangle-list slot they occupy.
///
/// Used to update a triangle list in place while vertices are generated,
/// without building an intermediate [`Grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleListUpdater {
    counts: SegmentCounts,
}

impl TriangleListUpdater {
    /// Creates an updater for buffers laid out for `counts`.
    #[must_use]
    pub fn new(counts: SegmentCounts) -> Self {
        Self { counts }
    }

    /// Float offsets of every copy of vertex `(col, row)`.
    ///
    /// A corner vertex belongs to one or two triangles of a single cell, an
    /// edge vertex to two cells and an interior vertex to four, which gives
    /// one to six slots.
    pub fn slots(&self, col: usize, row: usize) -> impl Iterator<Item = usize> {
        let (x, y) = (self.counts.x(), self.counts.y());
        let cell = move |c: usize, r: usize| FLOATS_PER_CELL * (r * x + c);

        let valid = col <= x && row <= y;
        let here = (valid && col < x && row < y).then(|| cell(col, row));
        let left = (valid && col > 0 && row < y).then(|| cell(col - 1, row));
        let above = (valid && col < x && row > 0).then(|| cell(col, row - 1));
        let diagonal = (valid && col > 0 && row > 0).then(|| cell(col - 1, row - 1));

        let here = here.into_iter();
        let left = left.into_iter().flat_map(|c| [c + 2, c + 6]);
        let above = above.into_iter().flat_map(|c| [c + 4, c + 8]);
        let diagonal = diagonal.into_iter().map(|c| c + 10);
        here.chain(left).chain(above).chain(diagonal)
    }

    /// Writes `point` into every slot of vertex `(col, row)`.
    ///
    /// # Errors
    ///
    /// Returns [`TessellationError::BufferTooSmall`] if `out` is shorter than
    /// [`triangle_list_len`].
    #[allow(clippy::cast_possible_truncation)]
    pub fn write(&self, out: &mut [f32], col: usize, row: usize, point: &Point2) -> Result<()> {
        check_len(triangle_list_len(self.counts), out.len())?;
        for slot in self.slots(col, row) {
            out[slot] = point.x as f32;
            out[slot + 1] = point.y as f32;
        }
        Ok(())
    }
}

/// Evenly spaced lattice over an axis-aligned rectangle.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RectLattice {
    origin: Point2,
    x_step: f64,
    y_step: f64,
    rows: usize,
    flip: bool,
}

impl RectLattice {
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn new(
        tl: &Point2,
        tr: &Point2,
        bl: &Point2,
        counts: SegmentCounts,
        flip: bool,
    ) -> Self {
        Self {
            origin: *tl,
            x_step: (tr.x - tl.x) / counts.x() as f64,
            y_step: (bl.y - tl.y) / counts.y() as f64,
            rows: counts.y(),
            flip,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn point(&self, col: usize, row: usize) -> Point2 {
        let row = if self.flip { self.rows - row } else { row };
        Point2::new(
            self.origin.x + col as f64 * self.x_step,
            self.origin.y + row as f64 * self.y_step,
        )
    }
}

#[allow(clippy::cast_possible_truncation)]
fn write_cell(chunk: &mut [f32], tl: &Point2, tr: &Point2, bl: &Point2, br: &Point2) {
    for (slot, p) in chunk.chunks_exact_mut(2).zip([tl, tr, bl, tr, bl, br]) {
        slot[0] = p.x as f32;
        slot[1] = p.y as f32;
    }
}

pub(crate) fn check_len(required: usize, actual: usize) -> Result<()> {
    if actual < required {
        return Err(TessellationError::BufferTooSmall { required, actual }.into());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{BendCurve, Quad};

    fn counts(x: usize, y: usize) -> SegmentCounts {
        SegmentCounts::new(x, y).unwrap()
    }

    fn grid(angle: f64, c: SegmentCounts) -> Grid {
        let quad = Quad::from_rect(0.0, 0.0, 40.0, 20.0).unwrap();
        BendCurve::new(quad, angle, c).compute_vertices()
    }

    #[test]
    fn cell_layout() {
        let g = grid(0.0, counts(2, 1));
        let mut out = vec![0.0_f32; triangle_list_len(g.counts())];
        write_triangle_list(&g, &mut out).unwrap();
        assert_eq!(out.len(), 24);
        assert_eq!(
            out[..12],
            [0.0, 0.0, 20.0, 0.0, 0.0, 20.0, 20.0, 0.0, 0.0, 20.0, 20.0, 20.0]
        );
        assert_eq!(out[12..14], [20.0, 0.0]);
        assert_eq!(out[22..], [40.0, 20.0]);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let g = grid(30.0, counts(3, 3));
        let mut out = vec![0.0_f32; 10];
        assert!(write_triangle_list(&g, &mut out).is_err());
        assert!(TriangleListUpdater::new(g.counts())
            .write(&mut out, 0, 0, &Point2::origin())
            .is_err());
    }

    #[test]
    fn empty_grid_is_rejected() {
        let g = grid(270.0, counts(2, 2));
        let mut out = vec![0.0_f32; 48];
        assert!(write_triangle_list(&g, &mut out).is_err());
    }

    #[test]
    fn slot_counts_by_position() {
        let updater = TriangleListUpdater::new(counts(3, 2));
        assert_eq!(updater.slots(0, 0).count(), 1);
        assert_eq!(updater.slots(3, 2).count(), 1);
        assert_eq!(updater.slots(3, 0).count(), 2);
        assert_eq!(updater.slots(0, 2).count(), 2);
        assert_eq!(updater.slots(1, 0).count(), 3);
        assert_eq!(updater.slots(0, 1).count(), 3);
        assert_eq!(updater.slots(3, 1).count(), 3);
        assert_eq!(updater.slots(2, 2).count(), 3);
        assert_eq!(updater.slots(1, 1).count(), 6);
        assert_eq!(updater.slots(4, 0).count(), 0);
    }

    #[test]
    fn updater_reproduces_full_write() {
        let c = counts(4, 3);
        for angle in [0.0, 75.0, -160.0] {
            let g = grid(angle, c);
            let mut expected = vec![0.0_f32; triangle_list_len(c)];
            write_triangle_list(&g, &mut expected).unwrap();

            let mut updated = vec![f32::NAN; triangle_list_len(c)];
            let updater = TriangleListUpdater::new(c);
            BendCurve::new(Quad::from_rect(0.0, 0.0, 40.0, 20.0).unwrap(), angle, c)
                .for_each_vertex(|v| {
                    updater.write(&mut updated, v.col, v.row, &v.position).unwrap();
                });
            assert_eq!(updated, expected);
        }
    }

    #[test]
    fn rect_list_matches_flat_grid() {
        let c = counts(3, 2);
        let g = grid(0.0, c);
        let mut from_grid = vec![0.0_f32; triangle_list_len(c)];
        write_triangle_list(&g, &mut from_grid).unwrap();

        let mut from_rect = vec![0.0_f32; triangle_list_len(c)];
        write_rect_triangle_list(
            &Point2::new(0.0, 0.0),
            &Point2::new(40.0, 0.0),
            &Point2::new(0.0, 20.0),
            c,
            false,
            &mut from_rect,
        )
        .unwrap();
        for (a, b) in from_grid.iter().zip(&from_rect) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn flipped_rect_list_runs_bottom_up() {
        let mut out = vec![0.0_f32; 12];
        write_rect_triangle_list(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
            counts(1, 1),
            true,
            &mut out,
        )
        .unwrap();
        assert_eq!(
            out,
            [0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0]
        );
    }
}
