pub mod affine_2d;
pub mod linear_system;

pub use affine_2d::AffineMatrix2D;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3x3 homogeneous matrix for 2D affine transforms.
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Direction in which +y grows on the target surface.
///
/// Canvas pixel space grows downward, normalized device coordinates grow
/// upward. Every trig formula in the arc core takes the sign into account so
/// a single formula set serves both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordDirection {
    /// +y points down (2D canvas).
    #[default]
    Down,
    /// +y points up (NDC / GL).
    Up,
}

impl CoordDirection {
    /// Returns the direction as `+1.0` (down) or `-1.0` (up).
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Down => 1.0,
            Self::Up => -1.0,
        }
    }
}

/// Maps a canvas pixel position to normalized device coordinates.
///
/// The canvas center becomes the origin, the left/right edges map to `-1`/`1`
/// and the top/bottom edges to `1`/`-1`.
#[must_use]
pub fn to_ndc(point: &Point2, width: f64, height: f64) -> Point2 {
    let cx = width / 2.0;
    let cy = height / 2.0;
    Point2::new((point.x - cx) / cx, (cy - point.y) / cy)
}

/// Returns the sign of `value` as `-1.0`, `0.0` or `1.0`.
///
/// Unlike [`f64::signum`], zero maps to zero.
#[must_use]
pub(crate) fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn ndc_maps_corners_and_center() {
        let center = to_ndc(&Point2::new(200.0, 100.0), 400.0, 200.0);
        assert_abs_diff_eq!(center.x, 0.0);
        assert_abs_diff_eq!(center.y, 0.0);

        let top_left = to_ndc(&Point2::new(0.0, 0.0), 400.0, 200.0);
        assert_abs_diff_eq!(top_left.x, -1.0);
        assert_abs_diff_eq!(top_left.y, 1.0);

        let bottom_right = to_ndc(&Point2::new(400.0, 200.0), 400.0, 200.0);
        assert_abs_diff_eq!(bottom_right.x, 1.0);
        assert_abs_diff_eq!(bottom_right.y, -1.0);
    }

    #[test]
    fn coord_direction_sign() {
        assert_abs_diff_eq!(CoordDirection::Down.sign(), 1.0);
        assert_abs_diff_eq!(CoordDirection::Up.sign(), -1.0);
    }

    #[test]
    fn sign_of_zero_is_zero() {
        assert_abs_diff_eq!(sign(0.0), 0.0);
        assert_abs_diff_eq!(sign(-3.0), -1.0);
        assert_abs_diff_eq!(sign(0.5), 1.0);
    }
}
