use std::f64::consts::PI;

use crate::math::{sign, Point2, Vector2};

/// Center and radius of one row's arc.
///
/// Bending a rectangle by `θ` turns it into a circular sector: the side edges
/// rotate by `θ/2` in opposite directions and become radii, and every row of
/// the mesh becomes a concentric arc spanning `θ`. Angles in this module are
/// radians and `dir` is the [`CoordDirection`](crate::math::CoordDirection)
/// sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    pub center: Point2,
    pub radius: f64,
}

impl ArcParams {
    /// Finds the arc spanning `angle` whose chord runs from `p1` to `p2`.
    ///
    /// The center sits on the chord's perpendicular bisector at
    /// `half_chord / tan(angle / 2)` from the midpoint; `offset_rad` is the
    /// chord's tilt from [`AngleParams`]. At `|angle| = π` the distance is
    /// effectively zero and the center is the chord midpoint.
    #[must_use]
    pub fn through(p1: &Point2, p2: &Point2, angle: f64, dir: f64, offset_rad: f64) -> Self {
        let half_chord = (p2 - p1).norm() / 2.0;
        let center_dist = half_chord / (angle / 2.0).tan();
        let radius = half_chord.hypot(center_dist);
        let mid = Point2::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);
        Self {
            center: Point2::new(
                mid.x + center_dist * offset_rad.sin(),
                mid.y + center_dist * offset_rad.cos() * dir,
            ),
            radius,
        }
    }

    /// Point at `theta` on the arc, measured from the arc's axis.
    ///
    /// `curve_dir` flips the axis for arcs bulging the other way.
    #[must_use]
    pub fn point_at(&self, theta: f64, curve_dir: f64) -> Point2 {
        Point2::new(
            self.center.x + self.radius * theta.sin(),
            self.center.y + self.radius * theta.cos() * curve_dir,
        )
    }
}

/// Angular sampling parameters shared by every row's arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleParams {
    /// `+1` when the arc's axis points along +y, `-1` otherwise.
    pub curve_dir: f64,
    /// Negated tilt of the chord `p1 → p2`, folded into `(-π, π)`.
    pub offset_rad: f64,
    /// Angle between neighbouring samples.
    pub step: f64,
    /// Angle of the first (leftmost) sample.
    pub from: f64,
}

impl AngleParams {
    /// Computes sampling parameters for `steps` segments along the chord
    /// `p1 → p2` bent by `angle`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(p1: &Point2, p2: &Point2, angle: f64, steps: usize, dir: f64) -> Self {
        let curve_dir = -sign(angle) * dir;
        let offset_rad = ((p1.y - p2.y) * dir).atan2(p2.x - p1.x) % PI;
        let angle = angle * dir;
        let step = -curve_dir * angle / steps as f64;
        let from = (angle / 2.0 + offset_rad) * curve_dir;
        Self {
            curve_dir,
            offset_rad,
            step,
            from,
        }
    }

    /// Angle of sample `index`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn angle_at(&self, index: usize) -> f64 {
        self.from + index as f64 * self.step
    }
}

/// Rotates the edge `p1 → p2` by half the bend angle.
///
/// For a positive bend the vector runs from the lower corner up (`p1 - p2`),
/// since the lower corner stays fixed; for a negative bend it runs down from
/// the fixed upper corner.
#[must_use]
pub fn rotated_side(p1: &Point2, p2: &Point2, angle: f64, dir: f64) -> Vector2 {
    let v = if angle < 0.0 { p2 - p1 } else { p1 - p2 };
    let (s, c) = (angle / 2.0 * dir).sin_cos();
    Vector2::new(c * v.x - s * v.y, s * v.x + c * v.y)
}

/// One curved side of the sector: the rotated edge split into even steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideBoundary {
    start: Point2,
    step: Vector2,
    segments: usize,
    from_top: bool,
}

impl SideBoundary {
    /// Builds the side running from `top` to `bottom` after bending.
    ///
    /// A negative bend pivots about `top`, a positive one about `bottom`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(top: &Point2, bottom: &Point2, angle: f64, segments: usize, dir: f64) -> Self {
        let from_top = angle < 0.0;
        let v = rotated_side(top, bottom, angle, dir);
        let n = segments as f64;
        Self {
            start: if from_top { *top } else { *bottom },
            step: Vector2::new(v.x / n, v.y / n),
            segments,
            from_top,
        }
    }

    /// Point on the side for mesh row `row` (0 = top).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn point(&self, row: usize) -> Point2 {
        let k = if self.from_top {
            row
        } else {
            self.segments - row
        };
        let k = k as f64;
        Point2::new(self.start.x + k * self.step.x, self.start.y + k * self.step.y)
    }

    /// All `segments + 1` points from top to bottom.
    #[must_use]
    pub fn points(&self) -> Vec<Point2> {
        (0..=self.segments).map(|row| self.point(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2};

    use approx::assert_abs_diff_eq;

    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn quarter_turn_sides_spread_from_bottom() {
        let (pa, pd) = (Point2::new(0.0, 0.0), Point2::new(0.0, 50.0));
        let (pb, pc) = (Point2::new(100.0, 0.0), Point2::new(100.0, 50.0));
        let left = SideBoundary::new(&pa, &pd, FRAC_PI_2, 2, -1.0);
        let right = SideBoundary::new(&pb, &pc, FRAC_PI_2, 2, 1.0);

        let half = 50.0 * FRAC_1_SQRT_2;
        assert_abs_diff_eq!(left.point(2).x, 0.0, epsilon = TOL);
        assert_abs_diff_eq!(left.point(2).y, 50.0, epsilon = TOL);
        assert_abs_diff_eq!(left.point(0).x, -half, epsilon = TOL);
        assert_abs_diff_eq!(left.point(0).y, 50.0 - half, epsilon = TOL);
        assert_abs_diff_eq!(right.point(0).x, 100.0 + half, epsilon = TOL);
        assert_abs_diff_eq!(right.point(0).y, 50.0 - half, epsilon = TOL);
    }

    #[test]
    fn negative_turn_keeps_top_fixed() {
        let (pa, pd) = (Point2::new(0.0, 0.0), Point2::new(0.0, 50.0));
        let left = SideBoundary::new(&pa, &pd, -FRAC_PI_2, 4, -1.0);
        assert_eq!(left.point(0), pa);
        assert_eq!(left.points().len(), 5);
        assert!(left.point(4).x < 0.0);
    }

    #[test]
    fn arc_through_chord() {
        let p1 = Point2::new(0.0, 50.0);
        let p2 = Point2::new(100.0, 50.0);
        let arc = ArcParams::through(&p1, &p2, FRAC_PI_2, 1.0, 0.0);
        assert_abs_diff_eq!(arc.center.x, 50.0, epsilon = TOL);
        assert_abs_diff_eq!(arc.center.y, 100.0, epsilon = TOL);
        assert_abs_diff_eq!(arc.radius, 50.0 * 2.0_f64.sqrt(), epsilon = TOL);
    }

    #[test]
    fn half_turn_center_is_chord_midpoint() {
        let p1 = Point2::new(0.0, 0.0);
        let p2 = Point2::new(10.0, 0.0);
        let arc = ArcParams::through(&p1, &p2, PI, 1.0, 0.0);
        assert!(arc.center.x.is_finite() && arc.center.y.is_finite());
        assert_abs_diff_eq!(arc.center.x, 5.0, epsilon = TOL);
        assert_abs_diff_eq!(arc.center.y, 0.0, epsilon = TOL);
        assert_abs_diff_eq!(arc.radius, 5.0, epsilon = TOL);
    }

    #[test]
    fn angle_params_for_level_chord() {
        let p1 = Point2::new(0.0, 0.0);
        let p2 = Point2::new(100.0, 0.0);
        let params = AngleParams::new(&p1, &p2, FRAC_PI_2, 4, 1.0);
        assert_abs_diff_eq!(params.curve_dir, -1.0);
        assert_abs_diff_eq!(params.offset_rad, 0.0);
        assert_abs_diff_eq!(params.from, -FRAC_PI_2 / 2.0, epsilon = TOL);
        assert_abs_diff_eq!(params.step, FRAC_PI_2 / 4.0, epsilon = TOL);
        assert_abs_diff_eq!(params.angle_at(4), FRAC_PI_2 / 2.0, epsilon = TOL);
    }
}
