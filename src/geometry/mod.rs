pub mod arc;
pub mod curve;
pub mod grid;
pub mod quad;

pub use arc::{AngleParams, ArcParams, SideBoundary};
pub use curve::{BendCurve, CurveParams, CurveVertex, CurveVertices, SideBoundaries};
pub use grid::Grid;
pub use quad::{Quad, SegmentCounts};
