use crate::error::{Result, SolverError};

use super::linear_system::solve_3;
use super::{Matrix3, Point2, TOLERANCE};

/// A 2D affine transform in canvas `transform(a, b, c, d, e, f)` order.
///
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
///
/// i.e. `X = a·x + c·y + e` and `Y = b·x + d·y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMatrix2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineMatrix2D {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Derives the transform mapping three source points onto three targets.
    ///
    /// `p*` are points in the original space and `cp*` their images in the
    /// warped space. The `X` and `Y` rows are solved independently as 3x3
    /// systems over `(x, y, 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::SingularSystem`] if the source points are
    /// collinear or coincident.
    #[allow(clippy::many_single_char_names)]
    pub fn from_correspondences(
        p1: &Point2,
        cp1: &Point2,
        p2: &Point2,
        cp2: &Point2,
        p3: &Point2,
        cp3: &Point2,
    ) -> Result<Self> {
        if is_degenerate_triangle(p1, p2, p3) {
            return Err(SolverError::SingularSystem.into());
        }

        let [a, c, e] = solve_3(
            [p1.x, p1.y, 1.0, cp1.x],
            [p2.x, p2.y, 1.0, cp2.x],
            [p3.x, p3.y, 1.0, cp3.x],
        )?;
        let [b, d, f] = solve_3(
            [p1.x, p1.y, 1.0, cp1.y],
            [p2.x, p2.y, 1.0, cp2.y],
            [p3.x, p3.y, 1.0, cp3.y],
        )?;

        Ok(Self { a, b, c, d, e, f })
    }

    /// Applies the transform to a point.
    #[must_use]
    pub fn apply(&self, p: &Point2) -> Point2 {
        Point2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Returns the coefficients as `[a, b, c, d, e, f]`.
    #[must_use]
    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Returns the homogeneous 3x3 matrix.
    #[must_use]
    #[rustfmt::skip]
    pub fn to_matrix3(&self) -> Matrix3 {
        Matrix3::new(
            self.a, self.c, self.e,
            self.b, self.d, self.f,
            0.0,    0.0,    1.0,
        )
    }
}

impl Default for AffineMatrix2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<AffineMatrix2D> for [f64; 6] {
    fn from(m: AffineMatrix2D) -> Self {
        m.to_array()
    }
}

/// Twice the triangle area compared against the squared extent, so the test
/// does not depend on the canvas scale. Coincident points have zero extent
/// and count as degenerate.
fn is_degenerate_triangle(p1: &Point2, p2: &Point2, p3: &Point2) -> bool {
    let u = p2 - p1;
    let v = p3 - p1;
    let cross = u.x * v.y - u.y * v.x;
    let extent = u.norm_squared().max(v.norm_squared());
    cross.abs() <= TOLERANCE * extent
}
