pub mod subdivision;
pub mod triangulation;
pub mod types;
pub mod utils;
pub mod voronoi;

#[cfg(feature = "debug_context")]
pub mod debug;

pub use glam;
pub use hashbrown;

pub use subdivision::EdgeNeighbor;
pub use triangulation::{
    DelaunayTriangulation, LocationKind, PointLocation, SubdivisionConfiguration,
    SubdivisionError, Triangle,
};
pub use types::{BoundingRect, EdgeHandle, Vertex2d, VertexHandle};
pub use voronoi::VoronoiFacet;

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////
