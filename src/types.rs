#[cfg(not(feature = "f32"))]
pub mod f64;
#[cfg(not(feature = "f32"))]
pub use f64::*;

#[cfg(feature = "f32")]
pub mod f32;
#[cfg(feature = "f32")]
pub use f32::*;

#[cfg(not(feature = "u64_indexes"))]
pub mod u32;
#[cfg(not(feature = "u64_indexes"))]
pub use u32::IndexType;

#[cfg(feature = "u64_indexes")]
pub mod u64;
#[cfg(feature = "u64_indexes")]
pub use u64::IndexType;

pub mod vertex;
pub use vertex::Vertex2d;

pub type VertexId = IndexType;
/// Id of a directed edge: `quad_edge_id * 4 + rotation`
pub type EdgeId = IndexType;
/// Id of a quad-edge record, grouping the 4 rotations of an edge
pub type QuadEdgeId = IndexType;

pub type EdgeRotation = IndexType;
/// Primal edge, from its origin to its destination
pub const ROT_0: EdgeRotation = 0;
/// Dual edge, from the right face to the left face of the primal edge
pub const ROT_1: EdgeRotation = 1;
/// Symmetric primal edge, from the destination to the origin
pub const ROT_2: EdgeRotation = 2;
/// Dual edge, from the left face to the right face of the primal edge
pub const ROT_3: EdgeRotation = 3;

pub const INVALID_VERTEX_ID: VertexId = VertexId::MAX;

/// Synthetic vertices: the corners of the bounding rectangle, in a counter-clockwise order.
///
/// ```text
/// 4 ----------- 3
/// |             |
/// |             |
/// 1 ----------- 2
/// ```
pub const CORNER_1: VertexId = 0;
pub const CORNER_2: VertexId = 1;
pub const CORNER_3: VertexId = 2;
pub const CORNER_4: VertexId = 3;
pub const CORNERS_COUNT: usize = 4;

pub type EdgeVertices = (Vertex, Vertex);
pub type TriangleVertices = [Vertex; 3];

/// Opaque handle to a vertex of a subdivision.
///
/// Vertex handles stay valid for the whole lifetime of the subdivision that created them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexHandle(pub(crate) VertexId);
impl VertexHandle {
    #[inline]
    pub fn id(self) -> VertexId {
        self.0
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Opaque handle to a directed edge of a subdivision.
///
/// Edge handles are snapshots: they are only meaningful until the next insertion.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeHandle(pub(crate) EdgeId);
impl EdgeHandle {
    #[inline]
    pub fn id(self) -> EdgeId {
        self.0
    }
}

/// Axis-aligned rectangle covered by a subdivision
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingRect {
    pub x: Float,
    pub y: Float,
    pub width: Float,
    pub height: Float,
}
impl BoundingRect {
    #[inline]
    pub fn new(x: Float, y: Float, width: Float, height: Float) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn min(&self) -> Vertex {
        Vertex::new(self.x, self.y)
    }
    #[inline]
    pub fn max(&self) -> Vertex {
        Vertex::new(self.x + self.width, self.y + self.height)
    }

    /// Corners in a counter-clockwise order, starting from the min corner
    #[inline]
    pub fn corners(&self) -> [Vertex; CORNERS_COUNT] {
        let (min, max) = (self.min(), self.max());
        [
            min,
            Vertex::new(max.x, min.y),
            max,
            Vertex::new(min.x, max.y),
        ]
    }

    /// Width and height must be strictly positive and all values finite
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.
            && self.height > 0.
    }

    /// Returns `true` if `p` is inside the rectangle or less than `epsilon` away from it
    #[inline]
    pub fn contains(&self, p: Vertex, epsilon: Float) -> bool {
        let (min, max) = (self.min(), self.max());
        p.x >= min.x - epsilon
            && p.x <= max.x + epsilon
            && p.y >= min.y - epsilon
            && p.y <= max.y + epsilon
    }

    /// Returns `true` if `p` is inside the rectangle and more than `epsilon` away from its sides
    #[inline]
    pub fn strictly_contains(&self, p: Vertex, epsilon: Float) -> bool {
        let (min, max) = (self.min(), self.max());
        p.x > min.x + epsilon
            && p.x < max.x - epsilon
            && p.y > min.y + epsilon
            && p.y < max.y - epsilon
    }
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////
