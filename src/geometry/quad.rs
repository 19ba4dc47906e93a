use crate::error::{GeometryError, Result};
use crate::math::{to_ndc, Point2, TOLERANCE};

/// Axis-aligned source rectangle given by its four corners.
///
/// Corners run clockwise on screen: `pa` top-left, `pb` top-right,
/// `pc` bottom-right, `pd` bottom-left. "Top" is the edge the bend keeps on
/// the outside of the arc for positive angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pa: Point2,
    pb: Point2,
    pc: Point2,
    pd: Point2,
}

impl Quad {
    /// Creates a quad from its corners.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidQuad`] if the corners do not form an
    /// axis-aligned rectangle with non-zero width and height, or any
    /// coordinate is not finite.
    pub fn new(pa: Point2, pb: Point2, pc: Point2, pd: Point2) -> Result<Self> {
        let quad = Self { pa, pb, pc, pd };
        quad.validate()?;
        Ok(quad)
    }

    /// Creates a quad from a top-left origin and a size in canvas space.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidQuad`] if the size is zero or not finite.
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        Self::new(
            Point2::new(x, y),
            Point2::new(x + width, y),
            Point2::new(x + width, y + height),
            Point2::new(x, y + height),
        )
    }

    /// Top-left corner.
    #[must_use]
    pub fn pa(&self) -> Point2 {
        self.pa
    }

    /// Top-right corner.
    #[must_use]
    pub fn pb(&self) -> Point2 {
        self.pb
    }

    /// Bottom-right corner.
    #[must_use]
    pub fn pc(&self) -> Point2 {
        self.pc
    }

    /// Bottom-left corner.
    #[must_use]
    pub fn pd(&self) -> Point2 {
        self.pd
    }

    /// Returns the corners as `[pa, pb, pc, pd]`.
    #[must_use]
    pub fn corners(&self) -> [Point2; 4] {
        [self.pa, self.pb, self.pc, self.pd]
    }

    /// Signed extent along x (`pb.x - pa.x`).
    #[must_use]
    pub fn width(&self) -> f64 {
        self.pb.x - self.pa.x
    }

    /// Signed extent along y (`pd.y - pa.y`); negative in y-up spaces.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.pd.y - self.pa.y
    }

    /// Maps all corners from canvas pixels to normalized device coordinates.
    #[must_use]
    pub fn to_ndc(&self, canvas_width: f64, canvas_height: f64) -> Self {
        let [pa, pb, pc, pd] = self.corners().map(|p| to_ndc(&p, canvas_width, canvas_height));
        Self { pa, pb, pc, pd }
    }

    /// Returns the quad with every y coordinate multiplied by `factor`.
    #[must_use]
    pub fn scale_y(&self, factor: f64) -> Self {
        let [pa, pb, pc, pd] = self.corners().map(|p| Point2::new(p.x, p.y * factor));
        Self { pa, pb, pc, pd }
    }

    fn validate(&self) -> Result<()> {
        let corners = self.corners();
        if corners.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(GeometryError::InvalidQuad("corner is not finite".into()).into());
        }

        let scale = corners
            .iter()
            .fold(1.0_f64, |m, p| m.max(p.x.abs()).max(p.y.abs()));
        let tol = TOLERANCE * scale;
        let aligned = (self.pa.y - self.pb.y).abs() <= tol
            && (self.pd.y - self.pc.y).abs() <= tol
            && (self.pa.x - self.pd.x).abs() <= tol
            && (self.pb.x - self.pc.x).abs() <= tol;
        if !aligned {
            return Err(
                GeometryError::InvalidQuad("corners are not an axis-aligned rectangle".into())
                    .into(),
            );
        }
        if self.width().abs() <= tol || self.height().abs() <= tol {
            return Err(GeometryError::InvalidQuad(format!(
                "zero-area rectangle ({} x {})",
                self.width(),
                self.height()
            ))
            .into());
        }
        Ok(())
    }
}

/// The unit square at the origin.
impl Default for Quad {
    fn default() -> Self {
        Self {
            pa: Point2::new(0.0, 0.0),
            pb: Point2::new(1.0, 0.0),
            pc: Point2::new(1.0, 1.0),
            pd: Point2::new(0.0, 1.0),
        }
    }
}

/// Number of segments along each axis of the warped mesh.
///
/// A `x` by `y` mesh has `(x + 1) * (y + 1)` vertices and `x * y` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentCounts {
    x: usize,
    y: usize,
}

impl SegmentCounts {
    /// Creates segment counts.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidSegmentCount`] if either count is zero.
    pub fn new(x: usize, y: usize) -> Result<Self> {
        if x == 0 || y == 0 {
            return Err(GeometryError::InvalidSegmentCount { x, y }.into());
        }
        Ok(Self { x, y })
    }

    /// Creates equal counts along both axes.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidSegmentCount`] if `n` is zero.
    pub fn uniform(n: usize) -> Result<Self> {
        Self::new(n, n)
    }

    /// Segments along x.
    #[must_use]
    pub fn x(&self) -> usize {
        self.x
    }

    /// Segments along y.
    #[must_use]
    pub fn y(&self) -> usize {
        self.y
    }

    /// Vertices per row (`x + 1`).
    #[must_use]
    pub fn row_len(&self) -> usize {
        self.x + 1
    }

    /// Total vertex count, `(x + 1) * (y + 1)`.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        (self.x + 1) * (self.y + 1)
    }

    /// Total cell count, `x * y`.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.x * self.y
    }
}

impl Default for SegmentCounts {
    fn default() -> Self {
        Self { x: 10, y: 10 }
    }
}
