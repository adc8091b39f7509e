use glam::Vec2;

/// The float type used in the algorithm's computations
pub type Float = f32;
/// The vertex type used in the algorithm's computations
pub type Vertex = Vec2;

/// Default distance under which two points are considered coincident, and a point is considered on an edge
pub const DEFAULT_EPSILON: Float = 1e-4;
