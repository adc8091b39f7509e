use glam::DVec2;

/// The float type used in the algorithm's computations
pub type Float = f64;
/// The vertex type used in the algorithm's computations
pub type Vertex = DVec2;

/// Default distance under which two points are considered coincident, and a point is considered on an edge
pub const DEFAULT_EPSILON: Float = 1e-9;
