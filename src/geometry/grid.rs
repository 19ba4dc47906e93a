use crate::error::{GeometryError, Result};
use crate::math::Point2;

use super::{Quad, SegmentCounts};

/// Row-major vertex grid of a (possibly warped) mesh.
///
/// Vertex `(col, row)` lives at `row * (x + 1) + col`. Both the flat
/// subdivision and the bent mesh use this layout, so the same index refers to
/// the same logical vertex before and after warping.
///
/// A grid may be empty: that is what an out-of-range bend angle produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    points: Vec<Point2>,
    counts: SegmentCounts,
}

impl Grid {
    /// Subdivides a quad into an evenly spaced vertex grid.
    ///
    /// The left (`pa → pd`) and right (`pb → pc`) edges are split into
    /// `y + 1` row anchors, then each row is split into `x + 1` points.
    #[must_use]
    pub fn subdivide(quad: &Quad, counts: SegmentCounts) -> Self {
        let mut points = Vec::with_capacity(counts.vertex_count());
        for row in 0..=counts.y() {
            for col in 0..=counts.x() {
                points.push(subdivision_point(quad, counts, col, row));
            }
        }
        Self { points, counts }
    }

    /// Creates a grid from row-major points.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::PointCount`] unless `points` holds exactly
    /// `(x + 1) * (y + 1)` vertices or none.
    pub fn from_points(points: Vec<Point2>, counts: SegmentCounts) -> Result<Self> {
        if !points.is_empty() && points.len() != counts.vertex_count() {
            return Err(GeometryError::PointCount {
                required: counts.vertex_count(),
                actual: points.len(),
            }
            .into());
        }
        Ok(Self { points, counts })
    }

    /// An empty grid for the given counts.
    #[must_use]
    pub fn empty(counts: SegmentCounts) -> Self {
        Self {
            points: Vec::new(),
            counts,
        }
    }

    /// The segment counts the grid was built for.
    #[must_use]
    pub fn counts(&self) -> SegmentCounts {
        self.counts
    }

    /// All vertices in row-major order.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Empties the grid for `counts` while keeping its allocation, and hands
    /// out the point buffer to be refilled in row-major order.
    pub(crate) fn reset(&mut self, counts: SegmentCounts) -> &mut Vec<Point2> {
        self.counts = counts;
        self.points.clear();
        self.points.reserve(counts.vertex_count());
        &mut self.points
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the grid holds no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Row-major index of vertex `(col, row)`.
    #[must_use]
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.counts.row_len() + col
    }

    /// Vertex `(col, row)`, if present.
    #[must_use]
    pub fn point(&self, col: usize, row: usize) -> Option<&Point2> {
        if col > self.counts.x() || row > self.counts.y() {
            return None;
        }
        self.points.get(self.index(col, row))
    }

    /// Returns `true` if cell `(col, row)` exists, i.e. the vertex at
    /// `(col, row)` has a right and a lower neighbour.
    #[must_use]
    pub fn has_cell(&self, col: usize, row: usize) -> bool {
        !self.is_empty() && col < self.counts.x() && row < self.counts.y()
    }

    /// Corners of cell `(col, row)`: top-left, top-right, bottom-right,
    /// bottom-left.
    #[must_use]
    pub fn cell_corners(&self, col: usize, row: usize) -> Option<[Point2; 4]> {
        if !self.has_cell(col, row) {
            return None;
        }
        let tl = self.index(col, row);
        let bl = tl + self.counts.row_len();
        Some([
            self.points[tl],
            self.points[tl + 1],
            self.points[bl + 1],
            self.points[bl],
        ])
    }

    /// Iterates cell coordinates `(col, row)` in row-major order.
    ///
    /// Yields nothing for an empty grid.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (x, y) = (self.counts.x(), self.counts.y());
        let rows = if self.is_empty() { 0 } else { y };
        (0..rows).flat_map(move |row| (0..x).map(move |col| (col, row)))
    }
}

/// Vertex `(col, row)` of the flat subdivision of `quad`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn subdivision_point(
    quad: &Quad,
    counts: SegmentCounts,
    col: usize,
    row: usize,
) -> Point2 {
    let (nx, ny) = (counts.x() as f64, counts.y() as f64);
    let (i, j) = (row as f64, col as f64);
    let [pa, pb, pc, pd] = quad.corners();

    let ad_x = (pd.x - pa.x) / ny;
    let ad_y = (pd.y - pa.y) / ny;
    let bc_x = (pc.x - pb.x) / ny;
    let bc_y = (pc.y - pb.y) / ny;

    let x1 = pa.x + ad_x * i;
    let y1 = pa.y + ad_y * i;
    let x2 = pb.x + bc_x * i;
    let y2 = pb.y + bc_y * i;

    let ab_x = (x2 - x1) / nx;
    let ab_y = (y2 - y1) / nx;
    Point2::new(x1 + ab_x * j, y1 + ab_y * j)
}
