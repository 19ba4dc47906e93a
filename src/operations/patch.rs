use crate::error::{GeometryError, Result};
use crate::geometry::Grid;
use crate::math::AffineMatrix2D;

/// The two affine transforms that draw one mesh cell.
///
/// A cell is split along its top-right/bottom-left diagonal. `upper` maps the
/// original upper-left triangle (top-left, top-right, bottom-left) onto its
/// warped position; `lower` does the same for the lower-right triangle
/// (bottom-right, top-right, bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellTransforms {
    pub upper: AffineMatrix2D,
    pub lower: AffineMatrix2D,
}

impl CellTransforms {
    /// Computes the transforms for cell `(col, row)`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::CellOutOfRange`] if either grid lacks the
    /// cell, or [`SolverError::SingularSystem`](crate::error::SolverError)
    /// if a source triangle is degenerate.
    pub fn compute(original: &Grid, warped: &Grid, col: usize, row: usize) -> Result<Self> {
        let out_of_range = || GeometryError::CellOutOfRange { col, row };
        let [op1, op2, op3, op4] = original.cell_corners(col, row).ok_or_else(out_of_range)?;
        let [p1, p2, p3, p4] = warped.cell_corners(col, row).ok_or_else(out_of_range)?;

        Ok(Self {
            upper: AffineMatrix2D::from_correspondences(&op1, &p1, &op2, &p2, &op4, &p4)?,
            lower: AffineMatrix2D::from_correspondences(&op3, &p3, &op2, &p2, &op4, &p4)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::{CurveWarpError, SolverError};
    use crate::geometry::{BendCurve, Quad, SegmentCounts};
    use crate::math::Point2;

    fn grids(angle: f64) -> (Grid, Grid) {
        let quad = Quad::from_rect(20.0, 10.0, 200.0, 80.0).unwrap();
        let counts = SegmentCounts::new(4, 3).unwrap();
        (
            Grid::subdivide(&quad, counts),
            BendCurve::new(quad, angle, counts).compute_vertices(),
        )
    }

    fn assert_maps(m: &AffineMatrix2D, from: &Point2, to: &Point2) {
        let p = m.apply(from);
        assert_relative_eq!(p.x, to.x, epsilon = 1e-9, max_relative = 1e-9);
        assert_relative_eq!(p.y, to.y, epsilon = 1e-9, max_relative = 1e-9);
    }

    #[test]
    fn every_cell_round_trips_its_corners() {
        for angle in [-180.0, -60.0, 45.0, 170.0] {
            let (original, warped) = grids(angle);
            for (col, row) in warped.cells() {
                let t = CellTransforms::compute(&original, &warped, col, row).unwrap();
                let [o1, o2, o3, o4] = original.cell_corners(col, row).unwrap();
                let [p1, p2, p3, p4] = warped.cell_corners(col, row).unwrap();
                assert_maps(&t.upper, &o1, &p1);
                assert_maps(&t.upper, &o2, &p2);
                assert_maps(&t.upper, &o4, &p4);
                assert_maps(&t.lower, &o3, &p3);
                assert_maps(&t.lower, &o2, &p2);
                assert_maps(&t.lower, &o4, &p4);
            }
        }
    }

    #[test]
    fn flat_mesh_gives_identity() {
        let (original, warped) = grids(0.0);
        let t = CellTransforms::compute(&original, &warped, 2, 1).unwrap();
        for (x, y) in t.upper.to_array().iter().zip(AffineMatrix2D::IDENTITY.to_array()) {
            assert_relative_eq!(*x, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn missing_cell_is_reported() {
        let (original, warped) = grids(30.0);
        let err = CellTransforms::compute(&original, &warped, 4, 0).unwrap_err();
        assert!(matches!(
            err,
            CurveWarpError::Geometry(GeometryError::CellOutOfRange { col: 4, row: 0 })
        ));

        let empty = Grid::empty(warped.counts());
        assert!(CellTransforms::compute(&original, &empty, 0, 0).is_err());
    }

    #[test]
    fn collapsed_source_cell_is_singular() {
        let counts = SegmentCounts::new(1, 1).unwrap();
        let p = Point2::new(5.0, 5.0);
        let collapsed = Grid::from_points(vec![p; 4], counts).unwrap();
        let (_, warped) = grids(30.0);
        let warped = Grid::from_points(warped.points()[..4].to_vec(), counts).unwrap();
        let err = CellTransforms::compute(&collapsed, &warped, 0, 0).unwrap_err();
        assert!(matches!(
            err,
            CurveWarpError::Solver(SolverError::SingularSystem)
        ));
    }
}
