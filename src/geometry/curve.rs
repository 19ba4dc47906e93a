use std::iter::FusedIterator;

use crate::error::{GeometryError, Result};
use crate::math::{sign, CoordDirection, Point2};

use super::arc::{rotated_side, AngleParams, ArcParams, SideBoundary};
use super::grid::subdivision_point;
use super::{Grid, Quad, SegmentCounts};

/// Largest bend magnitude in degrees; the mesh becomes a half annulus.
pub const MAX_BEND_DEGREES: f64 = 180.0;

/// Bends below this many radians are drawn flat.
///
/// Roughly `sqrt(f64::EPSILON)`: the arc center of a bend by `θ` lies about
/// `size / θ` away, so rounding there costs `size · ε / θ` while the bend
/// itself moves points by only `size · θ`.
pub const MIN_BEND_RADIANS: f64 = 1.5e-8;

/// One warped vertex together with its grid position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveVertex {
    pub position: Point2,
    pub col: usize,
    pub row: usize,
}

/// Bends a quad into a circular sector.
///
/// `angle` is in degrees within `[-180, 180]`. Positive angles keep the
/// bottom edge's length and open the fan upward; negative angles keep the top
/// edge and open it downward. An angle of zero, or one too small to bend the
/// mesh measurably (see [`MIN_BEND_RADIANS`]), reproduces [`Grid::subdivide`]
/// exactly. Out-of-range angles produce nothing.
///
/// Every output vertex is row-major and index-compatible with the flat
/// subdivision of the same quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BendCurve {
    quad: Quad,
    angle: f64,
    counts: SegmentCounts,
    coord_dir: CoordDirection,
    aspect_ratio: f64,
}

impl BendCurve {
    /// Creates a bend of `quad` by `angle` degrees.
    #[must_use]
    pub fn new(quad: Quad, angle: f64, counts: SegmentCounts) -> Self {
        Self {
            quad,
            angle,
            counts,
            coord_dir: CoordDirection::Down,
            aspect_ratio: 1.0,
        }
    }

    /// Sets the direction of +y in the quad's coordinate space.
    #[must_use]
    pub fn with_coord_dir(mut self, coord_dir: CoordDirection) -> Self {
        self.coord_dir = coord_dir;
        self
    }

    /// Sets the `width / height` ratio of the target surface.
    ///
    /// Needed when the quad is in a space that is stretched relative to
    /// pixels (NDC on a non-square canvas) so the arcs stay circular on
    /// screen.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ParameterOutOfRange`] if the ratio is not a
    /// positive finite number.
    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Result<Self> {
        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "aspect_ratio",
                value: aspect_ratio,
                min: f64::MIN_POSITIVE,
                max: f64::MAX,
            }
            .into());
        }
        self.aspect_ratio = aspect_ratio;
        Ok(self)
    }

    /// The bend angle in degrees.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// The segment counts.
    #[must_use]
    pub fn counts(&self) -> SegmentCounts {
        self.counts
    }

    /// Returns `true` if the angle lies within `[-180, 180]`.
    #[must_use]
    pub fn is_angle_valid(&self) -> bool {
        self.angle.abs() <= MAX_BEND_DEGREES
    }

    /// Computes all warped vertices.
    ///
    /// Returns an empty grid if the angle is out of range.
    #[must_use]
    pub fn compute_vertices(&self) -> Grid {
        let mut grid = Grid::empty(self.counts);
        self.compute_vertices_into(&mut grid);
        grid
    }

    /// Computes all warped vertices into `grid`, reusing its storage.
    ///
    /// `grid` takes this bend's counts and is left empty if the angle is out
    /// of range.
    pub fn compute_vertices_into(&self, grid: &mut Grid) {
        let points = grid.reset(self.counts);
        self.for_each_vertex(|v| points.push(v.position));
    }

    /// Calls `visit` for every warped vertex in row-major order without
    /// allocating.
    ///
    /// Nothing is visited if the angle is out of range.
    pub fn for_each_vertex<F: FnMut(CurveVertex)>(&self, mut visit: F) {
        match self.plan() {
            Plan::Skip => {}
            Plan::Flat => {
                for row in 0..=self.counts.y() {
                    for col in 0..=self.counts.x() {
                        visit(CurveVertex {
                            position: subdivision_point(&self.quad, self.counts, col, row),
                            col,
                            row,
                        });
                    }
                }
            }
            Plan::Bent(bent) => bent.visit(visit),
        }
    }

    /// Returns a lazy iterator over the warped vertices.
    ///
    /// The iterator is finite and `Clone`; cloning it (or calling this again)
    /// restarts the sequence.
    #[must_use]
    pub fn vertices(&self) -> CurveVertices {
        CurveVertices {
            quad: self.quad,
            counts: self.counts,
            plan: self.plan(),
            col: 0,
            row: 0,
            row_arc: None,
        }
    }

    /// The two curved sides of the sector, top to bottom.
    ///
    /// Returns `None` unless the angle is in range and bends the mesh.
    #[must_use]
    pub fn side_boundaries(&self) -> Option<SideBoundaries> {
        let Plan::Bent(bent) = self.plan() else {
            return None;
        };
        let unscale = |points: Vec<Point2>| {
            points
                .into_iter()
                .map(|p| Point2::new(p.x, p.y * bent.aspect_ratio))
                .collect()
        };
        Some(SideBoundaries {
            left: unscale(bent.left.points()),
            right: unscale(bent.right.points()),
        })
    }

    /// The arc of mesh row `row`.
    ///
    /// Coordinates are in aspect-corrected space (y divided by the aspect
    /// ratio). Returns `None` unless the angle is in range and bends the mesh
    /// and `row` exists.
    #[must_use]
    pub fn row_arc(&self, row: usize) -> Option<ArcParams> {
        match self.plan() {
            Plan::Bent(bent) if row <= self.counts.y() => Some(bent.arc(row)),
            _ => None,
        }
    }

    /// Computes the closed-form parameters evaluating any vertex from its
    /// grid position alone.
    ///
    /// Returns `None` for a flat angle (use the flat positions) and for
    /// out-of-range angles.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn curve_params(&self) -> Option<CurveParams> {
        let Plan::Bent(bent) = self.plan() else {
            return None;
        };
        let quad = self.quad.scale_y(1.0 / self.aspect_ratio);
        let angle = bent.angle;
        let dir = bent.dir;

        let [pa, pb, pc, pd] = quad.corners();
        let vector_ad = rotated_side(&pa, &pd, angle, -dir);
        let vector_bc = rotated_side(&pb, &pc, angle, dir);
        let (left, right) = if angle < 0.0 {
            (pa, pb)
        } else {
            (pd + vector_ad, pc + vector_bc)
        };

        let angles = AngleParams::new(&left, &right, angle, self.counts.x(), dir);
        let top = ArcParams::through(&left, &right, angle, dir, angles.offset_rad);
        Some(CurveParams {
            top_radius: top.radius,
            radius_delta: sign(angle) * vector_ad.norm() / self.counts.y() as f64,
            center: top.center,
            from_angle: angles.from,
            angle_step: angles.step,
            curve_dir: angles.curve_dir,
            aspect_ratio: self.aspect_ratio,
        })
    }

    fn plan(&self) -> Plan {
        if !self.is_angle_valid() {
            tracing::debug!(angle = self.angle, "bend angle out of range, skipping");
            return Plan::Skip;
        }
        let radians = self.angle.to_radians();
        if radians.abs() < MIN_BEND_RADIANS {
            return Plan::Flat;
        }
        Plan::Bent(BentPlan::new(
            &self.quad,
            radians,
            self.counts,
            self.coord_dir.sign(),
            self.aspect_ratio,
        ))
    }
}

/// Left and right curved sides of a bent quad.
#[derive(Debug, Clone, PartialEq)]
pub struct SideBoundaries {
    pub left: Vec<Point2>,
    pub right: Vec<Point2>,
}

/// Closed-form description of a bent mesh.
///
/// Vertex `(col, row)` sits at angle `from_angle + col * angle_step` on the
/// circle of radius `top_radius - row * radius_delta` around `center`. The
/// fields map one-to-one onto vertex-shader uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveParams {
    pub top_radius: f64,
    pub radius_delta: f64,
    pub center: Point2,
    pub from_angle: f64,
    pub angle_step: f64,
    pub curve_dir: f64,
    pub aspect_ratio: f64,
}

impl CurveParams {
    /// Position of the vertex at grid coordinates `(col, row)`.
    ///
    /// Coordinates are floats, matching how a shader receives them.
    #[must_use]
    pub fn evaluate(&self, col: f64, row: f64) -> Point2 {
        let radius = self.top_radius - row * self.radius_delta;
        let angle = self.from_angle + col * self.angle_step;
        Point2::new(
            self.center.x + radius * angle.sin(),
            (self.center.y + radius * angle.cos() * self.curve_dir) * self.aspect_ratio,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Plan {
    Skip,
    Flat,
    Bent(BentPlan),
}

/// Precomputed state for an in-range bend that is not flat.
///
/// All coordinates are in aspect-corrected space: y is divided by the aspect
/// ratio on the way in and multiplied back on the way out.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BentPlan {
    left: SideBoundary,
    right: SideBoundary,
    angles: AngleParams,
    angle: f64,
    dir: f64,
    aspect_ratio: f64,
    counts: SegmentCounts,
}

impl BentPlan {
    fn new(quad: &Quad, angle: f64, counts: SegmentCounts, dir: f64, aspect_ratio: f64) -> Self {
        let [pa, pb, pc, pd] = quad.scale_y(1.0 / aspect_ratio).corners();
        Self {
            left: SideBoundary::new(&pa, &pd, angle, counts.y(), -dir),
            right: SideBoundary::new(&pb, &pc, angle, counts.y(), dir),
            angles: AngleParams::new(&pa, &pb, angle, counts.x(), dir),
            angle,
            dir,
            aspect_ratio,
            counts,
        }
    }

    fn arc(&self, row: usize) -> ArcParams {
        ArcParams::through(
            &self.left.point(row),
            &self.right.point(row),
            self.angle,
            self.dir,
            self.angles.offset_rad,
        )
    }

    fn point(&self, arc: &ArcParams, col: usize) -> Point2 {
        let p = arc.point_at(self.angles.angle_at(col), self.angles.curve_dir);
        Point2::new(p.x, p.y * self.aspect_ratio)
    }

    fn visit<F: FnMut(CurveVertex)>(&self, mut visit: F) {
        for row in 0..=self.counts.y() {
            let arc = self.arc(row);
            for col in 0..=self.counts.x() {
                visit(CurveVertex {
                    position: self.point(&arc, col),
                    col,
                    row,
                });
            }
        }
    }
}

/// Lazy row-major sequence of warped vertices, see [`BendCurve::vertices`].
#[derive(Debug, Clone)]
pub struct CurveVertices {
    quad: Quad,
    counts: SegmentCounts,
    plan: Plan,
    col: usize,
    row: usize,
    row_arc: Option<ArcParams>,
}

impl CurveVertices {
    fn remaining(&self) -> usize {
        if matches!(self.plan, Plan::Skip) || self.row > self.counts.y() {
            return 0;
        }
        self.counts.vertex_count() - self.counts.row_len() * self.row - self.col
    }
}

impl Iterator for CurveVertices {
    type Item = CurveVertex;

    fn next(&mut self) -> Option<CurveVertex> {
        if self.remaining() == 0 {
            return None;
        }
        let (col, row) = (self.col, self.row);
        let position = match &self.plan {
            Plan::Skip => return None,
            Plan::Flat => subdivision_point(&self.quad, self.counts, col, row),
            Plan::Bent(bent) => {
                let arc = *self.row_arc.get_or_insert_with(|| bent.arc(row));
                bent.point(&arc, col)
            }
        };

        if col == self.counts.x() {
            self.col = 0;
            self.row += 1;
            self.row_arc = None;
        } else {
            self.col += 1;
        }
        Some(CurveVertex { position, col, row })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for CurveVertices {}

impl FusedIterator for CurveVertices {}
