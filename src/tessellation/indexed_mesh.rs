use crate::error::{Result, TessellationError};
use crate::geometry::{Grid, SegmentCounts};
use crate::math::Point2;

use super::triangle_list::{check_len, RectLattice, VERTICES_PER_CELL};

/// Number of floats needed for the positions of `counts`, one point per grid
/// vertex.
#[must_use]
pub fn positions_len(counts: SegmentCounts) -> usize {
    counts.vertex_count() * 2
}

/// Number of indices needed for `counts`.
///
/// Each cell's two triangles are listed in the same `[tl, tr, bl, tr, bl, br]`
/// order as the triangle-list layout.
#[must_use]
pub fn indices_len(counts: SegmentCounts) -> usize {
    counts.cell_count() * VERTICES_PER_CELL
}

/// Float offset of vertex `(col, row)` in a row-major position buffer,
/// `2 * (row * (x + 1) + col)`.
#[must_use]
pub fn vertex_offset(counts: SegmentCounts, col: usize, row: usize) -> usize {
    2 * (row * counts.row_len() + col)
}

/// Writes the grid positions into `out`.
///
/// # Errors
///
/// Returns [`TessellationError::EmptyGrid`] for an empty grid and
/// [`TessellationError::BufferTooSmall`] if `out` is shorter than
/// [`positions_len`].
#[allow(clippy::cast_possible_truncation)]
pub fn write_grid_points(grid: &Grid, out: &mut [f32]) -> Result<()> {
    if grid.is_empty() {
        return Err(TessellationError::EmptyGrid.into());
    }
    check_len(positions_len(grid.counts()), out.len())?;
    for (slot, p) in out.chunks_exact_mut(2).zip(grid.points()) {
        slot[0] = p.x as f32;
        slot[1] = p.y as f32;
    }
    Ok(())
}

/// Writes the lattice of the rectangle spanned by `tl`, `tr` and `bl` into
/// `out`, one point per grid vertex.
///
/// With `tl = (0, 1)`, `tr = (1, 1)`, `bl = (0, 0)` this gives texture
/// coordinates; with `tl = (0, 0)`, `tr = (x, 0)`, `bl = (0, y)` it gives the
/// per-vertex grid indices a shader feeds into the closed-form bend. `flip`
/// reverses the row order.
///
/// # Errors
///
/// Returns [`TessellationError::BufferTooSmall`] if `out` is shorter than
/// [`positions_len`].
#[allow(clippy::cast_possible_truncation)]
pub fn write_rect_points(
    tl: &Point2,
    tr: &Point2,
    bl: &Point2,
    counts: SegmentCounts,
    flip: bool,
    out: &mut [f32],
) -> Result<()> {
    check_len(positions_len(counts), out.len())?;
    let lattice = RectLattice::new(tl, tr, bl, counts, flip);
    for row in 0..=counts.y() {
        for col in 0..=counts.x() {
            let p = lattice.point(col, row);
            let i = vertex_offset(counts, col, row);
            out[i] = p.x as f32;
            out[i + 1] = p.y as f32;
        }
    }
    Ok(())
}

/// Writes the triangle indices for `counts` into `out`.
///
/// # Errors
///
/// Returns [`TessellationError::BufferTooSmall`] if `out` is shorter than
/// [`indices_len`], or [`TessellationError::IndexOverflow`] if the vertex
/// count does not fit in `u32`.
#[allow(clippy::cast_possible_truncation)]
pub fn write_indices(counts: SegmentCounts, out: &mut [u32]) -> Result<()> {
    check_len(indices_len(counts), out.len())?;
    if u32::try_from(counts.vertex_count()).is_err() {
        return Err(TessellationError::IndexOverflow {
            vertices: counts.vertex_count(),
        }
        .into());
    }

    let stride = counts.row_len() as u32;
    let cells = (0..counts.y()).flat_map(|row| (0..counts.x()).map(move |col| (col, row)));
    for ((col, row), chunk) in cells.zip(out.chunks_exact_mut(VERTICES_PER_CELL)) {
        let tl = (row * counts.row_len() + col) as u32;
        let (tr, bl) = (tl + 1, tl + stride);
        chunk.copy_from_slice(&[tl, tr, bl, tr, bl, bl + 1]);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{BendCurve, Quad};
    use crate::tessellation::triangle_list::{triangle_list_len, write_triangle_list};

    fn counts(x: usize, y: usize) -> SegmentCounts {
        SegmentCounts::new(x, y).unwrap()
    }

    #[test]
    fn indices_for_two_by_one() {
        let c = counts(2, 1);
        let mut out = vec![0_u32; indices_len(c)];
        write_indices(c, &mut out).unwrap();
        assert_eq!(out, [0, 1, 3, 1, 3, 4, 1, 2, 4, 2, 4, 5]);
    }

    #[test]
    fn vertex_offsets_are_row_major() {
        let c = counts(3, 2);
        assert_eq!(vertex_offset(c, 0, 0), 0);
        assert_eq!(vertex_offset(c, 3, 0), 6);
        assert_eq!(vertex_offset(c, 0, 1), 8);
        assert_eq!(vertex_offset(c, 3, 2), positions_len(c) - 2);
    }

    #[test]
    fn indexed_mesh_expands_to_triangle_list() {
        let c = counts(4, 3);
        let quad = Quad::from_rect(-1.0, -1.0, 2.0, 1.5).unwrap();
        let grid = BendCurve::new(quad, -110.0, c).compute_vertices();

        let mut positions = vec![0.0_f32; positions_len(c)];
        let mut indices = vec![0_u32; indices_len(c)];
        write_grid_points(&grid, &mut positions).unwrap();
        write_indices(c, &mut indices).unwrap();

        let mut list = vec![0.0_f32; triangle_list_len(c)];
        write_triangle_list(&grid, &mut list).unwrap();

        let expanded: Vec<f32> = indices
            .iter()
            .flat_map(|&i| {
                let i = i as usize * 2;
                [positions[i], positions[i + 1]]
            })
            .collect();
        assert_eq!(expanded, list);
    }

    #[test]
    fn texture_coordinates() {
        let c = counts(2, 1);
        let mut out = vec![0.0_f32; positions_len(c)];
        write_rect_points(
            &Point2::new(0.0, 1.0),
            &Point2::new(1.0, 1.0),
            &Point2::new(0.0, 0.0),
            c,
            false,
            &mut out,
        )
        .unwrap();
        assert_eq!(out, [0.0, 1.0, 0.5, 1.0, 1.0, 1.0, 0.0, 0.0, 0.5, 0.0, 1.0, 0.0]);

        write_rect_points(
            &Point2::new(0.0, 1.0),
            &Point2::new(1.0, 1.0),
            &Point2::new(0.0, 0.0),
            c,
            true,
            &mut out,
        )
        .unwrap();
        assert_eq!(out, [0.0, 0.0, 0.5, 0.0, 1.0, 0.0, 0.0, 1.0, 0.5, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn grid_position_indices() {
        let c = counts(3, 2);
        let mut out = vec![0.0_f32; positions_len(c)];
        write_rect_points(
            &Point2::new(0.0, 0.0),
            &Point2::new(3.0, 0.0),
            &Point2::new(0.0, 2.0),
            c,
            false,
            &mut out,
        )
        .unwrap();
        let i = vertex_offset(c, 2, 1);
        assert_eq!(out[i..i + 2], [2.0, 1.0]);
    }

    #[test]
    fn buffers_must_be_large_enough() {
        let c = counts(2, 2);
        assert!(write_indices(c, &mut [0; 5]).is_err());
        let mut short = [0.0_f32; 17];
        assert!(write_rect_points(
            &Point2::origin(),
            &Point2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
            c,
            false,
            &mut short
        )
        .is_err());
        let empty = Grid::empty(c);
        assert!(write_grid_points(&empty, &mut [0.0; 18]).is_err());
    }
}
