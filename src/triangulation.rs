use thiserror::Error;

use crate::subdivision::{sym_edge, EdgeNeighbor, Subdivision};
use crate::types::{
    BoundingRect, EdgeHandle, EdgeId, EdgeVertices, Float, TriangleVertices, Vertex, Vertex2d,
    VertexHandle, VertexId, CORNERS_COUNT, CORNER_1, CORNER_2, CORNER_3, CORNER_4,
    DEFAULT_EPSILON,
};
use crate::utils::{
    centroid, circumcenter, edge_side_value, exact_orientation, is_vertex_in_triangle_circumcircle,
    point_edge_orientation, Orientation,
};

#[cfg(feature = "progress_log")]
use tracing::{debug, warn};

#[cfg(feature = "debug_context")]
use crate::debug::{DebugConfiguration, DebugContext, Phase};

#[cfg(feature = "profile_traces")]
use tracing::{span, Level};

/// Under this vertex count, the Voronoi facets are always computed sequentially
pub const DEFAULT_PARALLEL_VORONOI_VERTEX_COUNT_THRESHOLD: usize = 10_000;
pub const DEFAULT_PARALLEL_VORONOI_MIN_BATCH_LEN: usize = 500;

#[derive(Clone, Debug)]
pub struct SubdivisionConfiguration {
    /// Points closer than `epsilon` are merged, and a point closer than `epsilon` to an edge is considered on it.
    pub epsilon: Float,
    /// Clips the Voronoi facets against the bounding rectangle of the subdivision
    pub clip_voronoi_facets: bool,
    /// Only used with the `parallel_voronoi` feature
    pub parallel_voronoi_vertex_count_threshold: usize,
    pub parallel_voronoi_min_batch_len: usize,
    #[cfg(feature = "debug_context")]
    pub debug_config: DebugConfiguration,
}
impl Default for SubdivisionConfiguration {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            clip_voronoi_facets: true,
            parallel_voronoi_vertex_count_threshold:
                DEFAULT_PARALLEL_VORONOI_VERTEX_COUNT_THRESHOLD,
            parallel_voronoi_min_batch_len: DEFAULT_PARALLEL_VORONOI_MIN_BATCH_LEN,
            #[cfg(feature = "debug_context")]
            debug_config: DebugConfiguration::default(),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SubdivisionError {
    #[error("Invalid bounds (x: {x}, y: {y}, width: {width}, height: {height}), width and height must be strictly positive and finite")]
    InvalidBounds {
        x: Float,
        y: Float,
        width: Float,
        height: Float,
    },
    #[error("Point ({x}, {y}) is out of the subdivision bounds")]
    OutOfBounds { x: Float, y: Float },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LocationKind {
    /// Strictly inside the left face of the located edge
    Inside,
    /// On the located edge
    OnEdge,
    /// On the origin of the located edge
    OnVertex(VertexHandle),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PointLocation {
    /// Its left face is the triangle containing the point
    pub edge: EdgeHandle,
    pub kind: LocationKind,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum VertexPlacement {
    InsideTriangle(EdgeId),
    OnEdge(EdgeId),
    OnVertex(EdgeId),
}
impl VertexPlacement {
    fn edge(self) -> EdgeId {
        match self {
            VertexPlacement::InsideTriangle(edge)
            | VertexPlacement::OnEdge(edge)
            | VertexPlacement::OnVertex(edge) => edge,
        }
    }
}

/// A triangle of the subdivision. Vertices are in a counter-clockwise order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle {
    /// Edge from the first to the second vertex, the triangle is its left face
    pub edge: EdgeHandle,
    pub vertices: [VertexHandle; 3],
    pub points: TriangleVertices,
}
impl Triangle {
    #[inline]
    pub fn centroid(&self) -> Vertex {
        centroid(&self.points)
    }

    /// [None] for a flat triangle
    #[inline]
    pub fn circumcenter(&self) -> Option<Vertex> {
        circumcenter(&self.points)
    }
}

/// An undirected edge of the subdivision
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Edge {
    pub edge: EdgeHandle,
    pub vertices: [VertexHandle; 2],
    pub points: EdgeVertices,
}

/// Incremental Delaunay triangulation of the points inserted in a rectangle.
///
/// ```text
/// 4 ----------- 3
/// |          /  |
/// |       /     |
/// |    /        |
/// | /           |
/// 1 ----------- 2
/// ```
///
/// The 4 corners of the rectangle are synthetic vertices, present from the construction, so that any point of the
/// rectangle is always covered by a triangle.
#[derive(Debug, Clone)]
pub struct DelaunayTriangulation {
    pub(crate) bounds: BoundingRect,
    pub(crate) config: SubdivisionConfiguration,
    pub(crate) subdivision: Subdivision,
    /// Start of the point location walks. Its left face is always a triangle.
    last_edge: EdgeId,
    /// Buffer re-used by each legalization
    edges_to_check: Vec<EdgeId>,

    #[cfg(feature = "debug_context")]
    pub debug_context: DebugContext,
}

impl DelaunayTriangulation {
    pub fn new(bounds: BoundingRect) -> Result<Self, SubdivisionError> {
        Self::with_configuration(bounds, SubdivisionConfiguration::default())
    }

    pub fn with_configuration(
        bounds: BoundingRect,
        config: SubdivisionConfiguration,
    ) -> Result<Self, SubdivisionError> {
        #[cfg(feature = "profile_traces")]
        let _span = span!(Level::TRACE, "with_configuration").entered();

        if !bounds.is_valid() {
            return Err(SubdivisionError::InvalidBounds {
                x: bounds.x,
                y: bounds.y,
                width: bounds.width,
                height: bounds.height,
            });
        }

        let mut subdivision = Subdivision::with_capacity(CORNERS_COUNT);
        for corner in bounds.corners() {
            subdivision.push_vertex(corner, true);
        }

        let e12 = subdivision.make_edge();
        subdivision.set_edge_points(e12, CORNER_1, CORNER_2);
        let e23 = subdivision.make_edge();
        subdivision.set_edge_points(e23, CORNER_2, CORNER_3);
        subdivision.splice(sym_edge(e12), e23);
        let e34 = subdivision.make_edge();
        subdivision.set_edge_points(e34, CORNER_3, CORNER_4);
        subdivision.splice(sym_edge(e23), e34);
        let _e41 = subdivision.connect(e34, e12);
        // From corner 3 to corner 1, the lower right triangle is on its left
        let diagonal = subdivision.connect(e23, e12);

        #[cfg(feature = "debug_context")]
        let mut debug_context = DebugContext::new(config.debug_config.clone());
        #[cfg(feature = "debug_context")]
        debug_context.push_snapshot(
            Phase::Initialization,
            Triangles::new(&subdivision),
            &[e12, e23, e34, _e41, diagonal],
        );

        Ok(Self {
            bounds,
            config,
            subdivision,
            last_edge: diagonal,
            edges_to_check: Vec::new(),
            #[cfg(feature = "debug_context")]
            debug_context,
        })
    }

    #[inline]
    pub fn bounds(&self) -> BoundingRect {
        self.bounds
    }

    #[inline]
    pub fn configuration(&self) -> &SubdivisionConfiguration {
        &self.config
    }

    /// Count of vertices, including the 4 synthetic corners
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.subdivision.vertices().len()
    }

    /// Count of inserted vertices
    #[inline]
    pub fn real_vertex_count(&self) -> usize {
        self.vertex_count() - CORNERS_COUNT
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.subdivision.edge_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles().count()
    }

    /// Panics if `vertex` does not belong to this subdivision
    #[inline]
    pub fn vertex(&self, vertex: VertexHandle) -> Vertex {
        self.subdivision.position(vertex.0)
    }

    #[inline]
    pub fn is_synthetic(&self, vertex: VertexHandle) -> bool {
        self.subdivision.vertex(vertex.0).synthetic
    }

    /// Iterates over all the vertices, synthetic corners first
    pub fn vertices(&self) -> impl Iterator<Item = (VertexHandle, Vertex)> + '_ {
        self.subdivision
            .vertices()
            .iter()
            .enumerate()
            .map(|(id, data)| (VertexHandle(id as VertexId), data.position))
    }

    #[inline]
    pub fn triangles(&self) -> Triangles<'_> {
        Triangles::new(&self.subdivision)
    }

    #[inline]
    pub fn edges(&self) -> Edges<'_> {
        Edges::new(&self.subdivision)
    }

    #[inline]
    pub fn edge_origin(&self, edge: EdgeHandle) -> VertexHandle {
        VertexHandle(self.subdivision.edge_org(edge.0))
    }

    #[inline]
    pub fn edge_destination(&self, edge: EdgeHandle) -> VertexHandle {
        VertexHandle(self.subdivision.edge_dst(edge.0))
    }

    #[inline]
    pub fn edge_points(&self, edge: EdgeHandle) -> EdgeVertices {
        self.edge_vertices(edge.0)
    }

    #[inline]
    pub fn next_edge(&self, edge: EdgeHandle, neighbor: EdgeNeighbor) -> EdgeHandle {
        EdgeHandle(self.subdivision.neighbor(edge.0, neighbor))
    }

    /// Same edge, opposite direction
    #[inline]
    pub fn sym(&self, edge: EdgeHandle) -> EdgeHandle {
        EdgeHandle(sym_edge(edge.0))
    }

    /// Triangle on the left of `edge`, [None] if `edge` is a side of the bounding rectangle oriented clockwise
    pub fn left_triangle(&self, edge: EdgeHandle) -> Option<Triangle> {
        if !self.subdivision.is_left_face_triangle(edge.0) {
            return None;
        }
        Some(self.triangle_from_edge(edge.0))
    }

    /// Finds where `point` is in the subdivision.
    ///
    /// Returns [SubdivisionError::OutOfBounds] if `point` is outside the bounding rectangle (further than epsilon).
    pub fn locate<T: Vertex2d>(&self, point: T) -> Result<PointLocation, SubdivisionError> {
        #[cfg(feature = "profile_traces")]
        let _span = span!(Level::TRACE, "locate").entered();

        let point = point.to_vertex();
        self.check_in_bounds(point)?;

        Ok(match self.find_vertex_placement(point) {
            VertexPlacement::InsideTriangle(edge) => PointLocation {
                edge: EdgeHandle(edge),
                kind: LocationKind::Inside,
            },
            VertexPlacement::OnEdge(edge) => PointLocation {
                edge: EdgeHandle(edge),
                kind: LocationKind::OnEdge,
            },
            VertexPlacement::OnVertex(edge) => PointLocation {
                edge: EdgeHandle(edge),
                kind: LocationKind::OnVertex(VertexHandle(self.subdivision.edge_org(edge))),
            },
        })
    }

    /// Inserts `point` and restores the Delaunay property.
    ///
    /// - If `point` is closer than epsilon to an existing vertex, returns this vertex and leaves the subdivision untouched.
    /// - Otherwise `point` must be inside the bounding rectangle and further than epsilon from its sides, else
    /// [SubdivisionError::OutOfBounds] is returned and the subdivision is left untouched.
    pub fn insert<T: Vertex2d>(&mut self, point: T) -> Result<VertexHandle, SubdivisionError> {
        #[cfg(feature = "profile_traces")]
        let _span = span!(Level::TRACE, "insert").entered();

        let point = point.to_vertex();
        self.check_in_bounds(point)?;

        let placement = self.find_vertex_placement(point);
        if let VertexPlacement::OnVertex(edge) = placement {
            let vertex = self.subdivision.edge_org(edge);
            #[cfg(feature = "progress_log")]
            debug!("Point {:?} merged with existing vertex {}", point, vertex);
            return Ok(VertexHandle(vertex));
        }
        if !self.bounds.strictly_contains(point, self.config.epsilon) {
            return Err(out_of_bounds(point));
        }

        #[cfg(feature = "debug_context")]
        self.debug_context.advance_step();

        let vertex_id = self.subdivision.push_vertex(point, false);
        let mut edges_to_check = std::mem::take(&mut self.edges_to_check);
        if let VertexPlacement::OnEdge(edge) = placement {
            self.split_quad_in_four_at_vertex(edge, vertex_id, &mut edges_to_check);
        } else {
            self.split_triangle_in_three_at_vertex(placement.edge(), vertex_id, &mut edges_to_check);
        }
        let _flip_count = self.restore_delaunay_triangulation(vertex_id, &mut edges_to_check);
        self.edges_to_check = edges_to_check;

        self.last_edge = self.subdivision.vertex(vertex_id).first_edge;
        if !self.subdivision.is_left_face_triangle(self.last_edge) {
            self.last_edge = sym_edge(self.last_edge);
        }

        #[cfg(feature = "progress_log")]
        debug!(
            "Inserted vertex {} at {:?} ({:?}), {} edge flips",
            vertex_id, point, placement, _flip_count
        );
        #[cfg(feature = "debug_context")]
        self.debug_context.push_snapshot(
            Phase::InsertionDone(vertex_id),
            Triangles::new(&self.subdivision),
            &[],
        );

        Ok(VertexHandle(vertex_id))
    }

    /// Inserts all the `points` in order, stops at the first error
    pub fn insert_all<T: Vertex2d>(
        &mut self,
        points: impl IntoIterator<Item = T>,
    ) -> Result<Vec<VertexHandle>, SubdivisionError> {
        #[cfg(feature = "profile_traces")]
        let _span = span!(Level::TRACE, "insert_all").entered();

        let points = points.into_iter();
        let mut vertices = Vec::with_capacity(points.size_hint().0);
        for point in points {
            vertices.push(self.insert(point)?);
        }
        Ok(vertices)
    }

    /// Returns the vertex nearest to `point`, synthetic corners included
    pub fn nearest_vertex<T: Vertex2d>(&self, point: T) -> Result<VertexHandle, SubdivisionError> {
        #[cfg(feature = "profile_traces")]
        let _span = span!(Level::TRACE, "nearest_vertex").entered();

        let point = point.to_vertex();
        self.check_in_bounds(point)?;

        let edge = self.find_enclosing_triangle(point);
        let (nearest, _) = self.walk_to_nearest_vertex(self.subdivision.edge_org(edge), point);
        Ok(VertexHandle(nearest))
    }

    /// Checks the local Delaunay condition on every edge that is not a side of the bounding rectangle
    pub fn is_delaunay(&self) -> bool {
        #[cfg(feature = "profile_traces")]
        let _span = span!(Level::TRACE, "is_delaunay").entered();

        let subdivision = &self.subdivision;
        (0..subdivision.edge_ids_end()).step_by(4).all(|edge| {
            if !subdivision.is_live_edge(edge) || self.is_hull_edge(edge) {
                return true;
            }
            let (org, dst) = self.edge_vertices(edge);
            let left_apex = subdivision.edge_dst(subdivision.lnext(edge));
            let right_apex = subdivision.edge_dst(subdivision.lnext(sym_edge(edge)));
            !is_vertex_in_triangle_circumcircle(
                &[org, dst, subdivision.position(left_apex)],
                subdivision.position(right_apex),
            )
        })
    }

    #[inline]
    pub(crate) fn edge_vertices(&self, edge: EdgeId) -> EdgeVertices {
        (
            self.subdivision.position(self.subdivision.edge_org(edge)),
            self.subdivision.position(self.subdivision.edge_dst(edge)),
        )
    }

    fn triangle_from_edge(&self, edge: EdgeId) -> Triangle {
        triangle_from_edge(&self.subdivision, edge)
    }

    /// One of the 4 sides of the bounding rectangle
    fn is_hull_edge(&self, edge: EdgeId) -> bool {
        let org = self.subdivision.edge_org(edge) as usize;
        let dst = self.subdivision.edge_dst(edge) as usize;
        org < CORNERS_COUNT
            && dst < CORNERS_COUNT
            && ((org + 1) % CORNERS_COUNT == dst || (dst + 1) % CORNERS_COUNT == org)
    }

    fn check_in_bounds(&self, point: Vertex) -> Result<(), SubdivisionError> {
        if self.bounds.contains(point, self.config.epsilon) {
            Ok(())
        } else {
            Err(out_of_bounds(point))
        }
    }

    /// `point` must be in the bounding rectangle
    pub(crate) fn find_vertex_placement(&self, point: Vertex) -> VertexPlacement {
        let edge = self.find_enclosing_triangle(point);
        self.vertex_placement_in_triangle(edge, point)
    }

    /// Returns an edge whose left face contains `point`, boundary included
    fn find_enclosing_triangle(&self, point: Vertex) -> EdgeId {
        match self.walk_to_enclosing_triangle(point) {
            Some(edge) => edge,
            None => {
                #[cfg(feature = "progress_log")]
                warn!(
                    "Walk towards point {:?} did not converge, falling back to a linear search",
                    point
                );
                self.search_enclosing_triangle(point)
            }
        }
    }

    /// Greedy walk on the Delaunay graph from `start`: a vertex with no nearer neighbor is the nearest vertex.
    ///
    /// Returns the nearest vertex and its squared distance to `point`.
    fn walk_to_nearest_vertex(&self, start: VertexId, point: Vertex) -> (VertexId, Float) {
        let mut nearest = start;
        let mut nearest_distance = self.subdivision.position(nearest).distance_squared(point);
        loop {
            let mut improved = None;
            for edge in self.subdivision.edges_around(nearest) {
                let candidate = self.subdivision.edge_dst(edge);
                let distance = self.subdivision.position(candidate).distance_squared(point);
                if distance < nearest_distance {
                    nearest_distance = distance;
                    improved = Some(candidate);
                }
            }
            match improved {
                Some(vertex) => nearest = vertex,
                None => return (nearest, nearest_distance),
            }
        }
    }

    /// Walks from triangle to triangle towards `point`, crossing the first edge that has `point` strictly on its right.
    ///
    /// Returns an edge whose left face contains `point` (boundary included), or [None] if the walk did not converge.
    fn walk_to_enclosing_triangle(&self, point: Vertex) -> Option<EdgeId> {
        #[cfg(feature = "profile_traces")]
        let _span = span!(Level::TRACE, "walk_to_enclosing_triangle").entered();

        let mut edge = self.last_edge;
        // Never visits more triangles than there are edges
        for _ in 0..self.subdivision.edge_ids_end() {
            let e1 = self.subdivision.lnext(edge);
            let e2 = self.subdivision.lnext(e1);

            let crossed = [edge, e1, e2].into_iter().find(|&e| {
                exact_orientation(self.edge_vertices(e), point) == Orientation::Clockwise
            });
            match crossed {
                None => return Some(edge),
                Some(crossed) => {
                    let next = sym_edge(crossed);
                    if !self.subdivision.is_left_face_triangle(next) {
                        // Out of the rectangle
                        return None;
                    }
                    edge = next;
                }
            }
        }
        None
    }

    /// Returns an edge of the triangle that contains `point`, or of the one that best contains it when `point` is
    /// slightly out of the rectangle
    fn search_enclosing_triangle(&self, point: Vertex) -> EdgeId {
        #[cfg(feature = "profile_traces")]
        let _span = span!(Level::TRACE, "search_enclosing_triangle").entered();

        let mut best = (Float::MAX, self.last_edge);
        for triangle in self.triangles() {
            let edge = triangle.edge.0;
            let e1 = self.subdivision.lnext(edge);
            let e2 = self.subdivision.lnext(e1);
            if [edge, e1, e2].into_iter().all(|e| {
                exact_orientation(self.edge_vertices(e), point) != Orientation::Clockwise
            }) {
                return edge;
            }
            // Largest distance of `point` on the right of an edge, negative when the point is inside
            let violation = [edge, e1, e2]
                .into_iter()
                .map(|e| {
                    let (from, to) = self.edge_vertices(e);
                    -edge_side_value((from, to), point) / from.distance(to)
                })
                .fold(Float::MIN, Float::max);
            if violation < best.0 {
                best = (violation, edge);
            }
        }
        best.1
    }

    /// `point` must be in the left face of `edge`, which must be a triangle.
    ///
    /// Epsilon only merges `point` with a vertex or an edge. An [VertexPlacement::InsideTriangle] placement has
    /// `point` strictly inside the triangle.
    fn vertex_placement_in_triangle(&self, edge: EdgeId, point: Vertex) -> VertexPlacement {
        let e1 = self.subdivision.lnext(edge);
        let e2 = self.subdivision.lnext(e1);
        let edges = [edge, e1, e2];

        // The nearest vertex is not always a vertex of the enclosing triangle
        let epsilon = self.config.epsilon;
        let (nearest, distance_squared) =
            self.walk_to_nearest_vertex(self.subdivision.edge_org(edge), point);
        if distance_squared <= epsilon * epsilon {
            return VertexPlacement::OnVertex(self.edge_from_vertex(nearest, edges));
        }

        for e in edges {
            let (from, to) = self.edge_vertices(e);
            if exact_orientation((from, to), point) == Orientation::Colinear
                && projects_on_segment((from, to), point)
            {
                return VertexPlacement::OnEdge(e);
            }
        }
        for e in edges {
            let (from, to) = self.edge_vertices(e);
            if point_edge_orientation((from, to), point, epsilon) == Orientation::Colinear
                && projects_on_segment((from, to), point)
                && (self.is_hull_edge(e) || self.splits_quad_in_ccw_triangles(e, point))
            {
                return VertexPlacement::OnEdge(e);
            }
        }
        VertexPlacement::InsideTriangle(edge)
    }

    /// An edge having `vertex` as its origin, from `triangle_edges` when possible, with a triangle as its left face
    /// when possible
    fn edge_from_vertex(&self, vertex: VertexId, triangle_edges: [EdgeId; 3]) -> EdgeId {
        triangle_edges
            .into_iter()
            .find(|&e| self.subdivision.edge_org(e) == vertex)
            .or_else(|| {
                self.subdivision
                    .edges_around(vertex)
                    .find(|&e| self.subdivision.is_left_face_triangle(e))
            })
            .unwrap_or(self.subdivision.vertex(vertex).first_edge)
    }

    /// Checks that the 4 triangles made by splitting the quadrilateral around `edge` at `point` are all exactly
    /// counter-clockwise. `edge` must not be a side of the bounding rectangle.
    fn splits_quad_in_ccw_triangles(&self, edge: EdgeId, point: Vertex) -> bool {
        let (org, dst) = self.edge_vertices(edge);
        let left_apex = self
            .subdivision
            .position(self.subdivision.edge_dst(self.subdivision.lnext(edge)));
        let right_apex = self
            .subdivision
            .position(self.subdivision.edge_dst(self.subdivision.lnext(sym_edge(edge))));
        [(org, right_apex), (right_apex, dst), (dst, left_apex), (left_apex, org)]
            .into_iter()
            .all(|side| exact_orientation(side, point) == Orientation::CounterClockwise)
    }

    /// Connects `vertex_id` to the 3 vertices of the left face of `edge`
    ///
    /// ```text
    ///          v3                    v3
    ///        /    \                / | \
    ///      /        \            /   |   \
    ///    /     x      \   =>   /    x     \
    ///  /                \    /   /     \    \
    /// v1 ----edge------ v2  v1 ----------- v2
    /// ```
    fn split_triangle_in_three_at_vertex(
        &mut self,
        edge: EdgeId,
        vertex_id: VertexId,
        edges_to_check: &mut Vec<EdgeId>,
    ) {
        #[cfg(feature = "profile_traces")]
        let _span = span!(Level::TRACE, "split_triangle_in_three_at_vertex").entered();

        let e1 = self.subdivision.lnext(edge);
        let e2 = self.subdivision.lnext(e1);
        edges_to_check.extend([edge, e1, e2]);

        self.connect_vertex_to_face(edge, vertex_id);

        #[cfg(feature = "debug_context")]
        self.debug_context.push_snapshot(
            Phase::SplitTriangle(vertex_id),
            Triangles::new(&self.subdivision),
            &[edge, e1, e2],
        );
    }

    /// Removes `edge` and connects `vertex_id` to the 4 vertices of the quadrilateral formed by its two adjacent triangles
    ///
    /// ```text
    ///          q3                      q3
    ///        /    \                  / | \
    ///      /        \              /   |   \
    ///    q1 -edge-x-> q2   =>    q1 -- x -- q2
    ///      \        /              \   |   /
    ///        \    /                  \ | /
    ///          q4                      q4
    /// ```
    fn split_quad_in_four_at_vertex(
        &mut self,
        edge: EdgeId,
        vertex_id: VertexId,
        edges_to_check: &mut Vec<EdgeId>,
    ) {
        #[cfg(feature = "profile_traces")]
        let _span = span!(Level::TRACE, "split_quad_in_four_at_vertex").entered();

        let l1 = self.subdivision.lnext(edge);
        let l2 = self.subdivision.lnext(l1);
        let r1 = self.subdivision.lnext(sym_edge(edge));
        let r2 = self.subdivision.lnext(r1);
        edges_to_check.extend([l1, l2, r1, r2]);

        self.subdivision.delete_edge(edge);
        // r1, r2, l1 and l2 now bound the same face
        self.connect_vertex_to_face(r1, vertex_id);

        #[cfg(feature = "debug_context")]
        self.debug_context.push_snapshot(
            Phase::SplitEdge(vertex_id),
            Triangles::new(&self.subdivision),
            &[l1, l2, r1, r2],
        );
    }

    /// Connects `vertex_id` to every vertex of the left face of `face_edge`. The vertex must be inside the face.
    fn connect_vertex_to_face(&mut self, face_edge: EdgeId, vertex_id: VertexId) {
        let first_vertex = self.subdivision.edge_org(face_edge);
        let mut base = self.subdivision.make_edge();
        self.subdivision
            .set_edge_points(base, first_vertex, vertex_id);
        self.subdivision.splice(base, face_edge);

        let mut edge = face_edge;
        loop {
            base = self.subdivision.connect(edge, sym_edge(base));
            edge = self.subdivision.oprev(base);
            if self.subdivision.edge_dst(edge) == first_vertex {
                break;
            }
        }
    }

    /// Flips the edges of `edges_to_check` (and the ones they uncover) until the Delaunay property is restored.
    ///
    /// Each edge in `edges_to_check` must have the vertex `vertex_id` as the apex of its left triangle.
    ///
    /// Returns the count of flips.
    fn restore_delaunay_triangulation(
        &mut self,
        vertex_id: VertexId,
        edges_to_check: &mut Vec<EdgeId>,
    ) -> usize {
        #[cfg(feature = "profile_traces")]
        let _span = span!(Level::TRACE, "restore_delaunay_triangulation").entered();

        let vertex = self.subdivision.position(vertex_id);
        let mut flip_count = 0;
        while let Some(edge) = edges_to_check.pop() {
            if self.is_hull_edge(edge) {
                continue;
            }

            // x
            // | \
            // |   \
            // |     \
            // a -edge-> b
            //  \       /
            //   e1   e2
            //     \ /
            //      q
            let e1 = self.subdivision.lnext(sym_edge(edge));
            let e2 = self.subdivision.lnext(e1);
            let (a, b) = self.edge_vertices(edge);
            let opposite = self.subdivision.position(self.subdivision.edge_dst(e1));

            if is_vertex_in_triangle_circumcircle(&[a, b, vertex], opposite) {
                // `edge` becomes q -> x
                self.subdivision.flip(edge);
                flip_count += 1;
                edges_to_check.push(e1);
                edges_to_check.push(e2);

                #[cfg(feature = "debug_context")]
                self.debug_context.push_snapshot(
                    Phase::FlipEdge,
                    Triangles::new(&self.subdivision),
                    &[edge, e1, e2],
                );
            }
        }
        flip_count
    }
}

/// The orthogonal projection of `point` on the line supporting `e` is on the segment `e`
fn projects_on_segment(e: EdgeVertices, point: Vertex) -> bool {
    let (from, to) = e;
    let along = (point - from).dot(to - from) / from.distance_squared(to);
    (0. ..=1.).contains(&along)
}

fn out_of_bounds(point: Vertex) -> SubdivisionError {
    SubdivisionError::OutOfBounds {
        x: point.x,
        y: point.y,
    }
}

/// `edge` left face must be a triangle
fn triangle_from_edge(subdivision: &Subdivision, edge: EdgeId) -> Triangle {
    let e1 = subdivision.lnext(edge);
    let e2 = subdivision.lnext(e1);
    let vertices = [
        subdivision.edge_org(edge),
        subdivision.edge_org(e1),
        subdivision.edge_org(e2),
    ];
    Triangle {
        edge: EdgeHandle(edge),
        vertices: vertices.map(VertexHandle),
        points: vertices.map(|v| subdivision.position(v)),
    }
}

/// Lazy iterator over the triangles of a subdivision, yielding each triangle once.
#[derive(Clone)]
pub struct Triangles<'a> {
    subdivision: &'a Subdivision,
    next_edge: EdgeId,
    real_vertices_only: bool,
}
impl<'a> Triangles<'a> {
    pub(crate) fn new(subdivision: &'a Subdivision) -> Self {
        Self {
            subdivision,
            next_edge: 0,
            real_vertices_only: false,
        }
    }

    /// Skips the triangles having a synthetic corner as one of their vertices
    pub fn real_vertices_only(mut self) -> Self {
        self.real_vertices_only = true;
        self
    }
}
impl<'a> Iterator for Triangles<'a> {
    type Item = Triangle;

    fn next(&mut self) -> Option<Self::Item> {
        let subdivision = self.subdivision;
        while self.next_edge < subdivision.edge_ids_end() {
            let edge = self.next_edge;
            // Primal edges and their symmetric only
            self.next_edge += 2;

            if !subdivision.is_live_edge(edge) || !subdivision.is_left_face_triangle(edge) {
                continue;
            }
            let e1 = subdivision.lnext(edge);
            let e2 = subdivision.lnext(e1);
            // A triangle is yielded from its smallest edge
            if e1 < edge || e2 < edge {
                continue;
            }
            if self.real_vertices_only
                && [edge, e1, e2]
                    .into_iter()
                    .any(|e| subdivision.vertex(subdivision.edge_org(e)).synthetic)
            {
                continue;
            }
            return Some(triangle_from_edge(subdivision, edge));
        }
        None
    }
}

/// Lazy iterator over the undirected edges of a subdivision
#[derive(Clone)]
pub struct Edges<'a> {
    subdivision: &'a Subdivision,
    next_edge: EdgeId,
    real_vertices_only: bool,
}
impl<'a> Edges<'a> {
    fn new(subdivision: &'a Subdivision) -> Self {
        Self {
            subdivision,
            next_edge: 0,
            real_vertices_only: false,
        }
    }

    /// Skips the edges having a synthetic corner as one of their vertices
    pub fn real_vertices_only(mut self) -> Self {
        self.real_vertices_only = true;
        self
    }
}
impl<'a> Iterator for Edges<'a> {
    type Item = Edge;

    fn next(&mut self) -> Option<Self::Item> {
        let subdivision = self.subdivision;
        while self.next_edge < subdivision.edge_ids_end() {
            let edge = self.next_edge;
            self.next_edge += 4;

            if !subdivision.is_live_edge(edge) {
                continue;
            }
            let (org, dst) = (subdivision.edge_org(edge), subdivision.edge_dst(edge));
            if self.real_vertices_only
                && (subdivision.vertex(org).synthetic || subdivision.vertex(dst).synthetic)
            {
                continue;
            }
            return Some(Edge {
                edge: EdgeHandle(edge),
                vertices: [VertexHandle(org), VertexHandle(dst)],
                points: (subdivision.position(org), subdivision.position(dst)),
            });
        }
        None
    }
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////
