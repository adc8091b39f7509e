//! Quad-edge representation of a planar subdivision.
//!
//! Edges are stored in an arena of [QuadEdge] records. A record groups the 4 rotations of an undirected edge:
//! the primal edge, its symmetric, and the two dual edges linking the faces on each side. A directed edge is
//! identified by an [EdgeId] equal to `quad_edge_id * 4 + rotation`, and all the topological links between
//! edges are stored as ids.
//!
//! See: L. Guibas and J. Stolfi,
//! Primitives for the manipulation of general subdivisions and the computation of Voronoi diagrams.
//! ACM Transactions on Graphics 4(2), 74-123 (1985)

use crate::types::{
    EdgeId, EdgeRotation, QuadEdgeId, Vertex, VertexId, INVALID_VERTEX_ID, ROT_0, ROT_1, ROT_3,
};

#[cfg(feature = "more_profile_traces")]
use tracing::{span, Level};

#[inline(always)]
pub fn quad_edge_id(edge: EdgeId) -> QuadEdgeId {
    edge >> 2
}

#[inline(always)]
pub fn edge_rotation(edge: EdgeId) -> EdgeRotation {
    edge & 3
}

/// Rotates `edge` by `rotation` quarter turns counter-clockwise
#[inline(always)]
pub fn rotate_edge(edge: EdgeId, rotation: EdgeRotation) -> EdgeId {
    (edge & !3) + ((edge + rotation) & 3)
}

/// Same edge, opposite direction
#[inline(always)]
pub fn sym_edge(edge: EdgeId) -> EdgeId {
    edge ^ 2
}

/// Returns `true` for the edges linking two vertices (as opposed to the dual edges linking two faces)
#[inline(always)]
pub fn is_primal_edge(edge: EdgeId) -> bool {
    edge & 1 == 0
}

/// Neighbors of a directed edge in a quad-edge structure
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EdgeNeighbor {
    /// Next edge counter-clockwise around the origin (Onext)
    NextAroundOrigin,
    /// Next edge counter-clockwise around the destination (Dnext)
    NextAroundDestination,
    /// Next edge clockwise around the origin (Oprev)
    PrevAroundOrigin,
    /// Next edge clockwise around the destination (Dprev)
    PrevAroundDestination,
    /// Next edge counter-clockwise around the left face (Lnext)
    NextAroundLeft,
    /// Next edge counter-clockwise around the right face (Rnext)
    NextAroundRight,
    /// Next edge clockwise around the left face (Lprev)
    PrevAroundLeft,
    /// Next edge clockwise around the right face (Rprev)
    PrevAroundRight,
}

/// Record grouping the 4 rotations of an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadEdge {
    /// Onext link of each rotation
    pub next: [EdgeId; 4],
    /// Origin of the primal edge (rotation 0) and of its symmetric (rotation 2)
    pub verts: [VertexId; 2],
}
impl QuadEdge {
    fn isolated(first_edge: EdgeId) -> Self {
        Self {
            next: [first_edge, first_edge + 3, first_edge + 2, first_edge + 1],
            verts: [INVALID_VERTEX_ID, INVALID_VERTEX_ID],
        }
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.verts[0] == INVALID_VERTEX_ID
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexData {
    pub position: Vertex,
    /// One of the edges having this vertex as its origin
    pub first_edge: EdgeId,
    /// `true` for the corners of the bounding rectangle
    pub synthetic: bool,
}

/// Arena of vertices and quad-edges.
///
/// This layer only knows about topology: it never evaluates a geometric predicate.
#[derive(Debug, Clone, Default)]
pub struct Subdivision {
    pub(crate) vertices: Vec<VertexData>,
    pub(crate) quad_edges: Vec<QuadEdge>,
    free_quad_edges: Vec<QuadEdgeId>,
}

impl Subdivision {
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            // For a triangulation, E = 3V - 3 - B
            quad_edges: Vec::with_capacity(3 * vertices),
            free_quad_edges: Vec::new(),
        }
    }

    #[inline]
    pub fn vertices(&self) -> &Vec<VertexData> {
        &self.vertices
    }
    #[inline]
    pub fn quad_edges(&self) -> &Vec<QuadEdge> {
        &self.quad_edges
    }

    #[inline]
    pub fn vertex(&self, id: VertexId) -> &VertexData {
        &self.vertices[id as usize]
    }
    #[inline]
    pub fn position(&self, id: VertexId) -> Vertex {
        self.vertices[id as usize].position
    }

    /// Upper bound (exclusive) of the edge ids, including freed ones
    #[inline]
    pub fn edge_ids_end(&self) -> EdgeId {
        (self.quad_edges.len() * 4) as EdgeId
    }

    #[inline]
    pub fn is_live_edge(&self, edge: EdgeId) -> bool {
        (quad_edge_id(edge) as usize) < self.quad_edges.len()
            && !self.quad_edges[quad_edge_id(edge) as usize].is_free()
    }

    /// Count of undirected edges currently in the subdivision
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.quad_edges.len() - self.free_quad_edges.len()
    }

    pub fn push_vertex(&mut self, position: Vertex, synthetic: bool) -> VertexId {
        let id = self.vertices.len() as VertexId;
        self.vertices.push(VertexData {
            position,
            first_edge: 0,
            synthetic,
        });
        id
    }

    /// Origin of a primal edge
    #[inline(always)]
    pub fn edge_org(&self, edge: EdgeId) -> VertexId {
        debug_assert!(is_primal_edge(edge));
        self.quad_edges[quad_edge_id(edge) as usize].verts[(edge_rotation(edge) >> 1) as usize]
    }

    /// Destination of a primal edge
    #[inline(always)]
    pub fn edge_dst(&self, edge: EdgeId) -> VertexId {
        self.edge_org(sym_edge(edge))
    }

    #[inline(always)]
    pub fn onext(&self, edge: EdgeId) -> EdgeId {
        self.quad_edges[quad_edge_id(edge) as usize].next[edge_rotation(edge) as usize]
    }

    #[inline(always)]
    fn onext_mut(&mut self, edge: EdgeId) -> &mut EdgeId {
        &mut self.quad_edges[quad_edge_id(edge) as usize].next[edge_rotation(edge) as usize]
    }

    #[inline(always)]
    pub fn oprev(&self, edge: EdgeId) -> EdgeId {
        rotate_edge(self.onext(rotate_edge(edge, ROT_1)), ROT_1)
    }

    #[inline(always)]
    pub fn lnext(&self, edge: EdgeId) -> EdgeId {
        rotate_edge(self.onext(rotate_edge(edge, ROT_3)), ROT_1)
    }

    #[inline]
    pub fn neighbor(&self, edge: EdgeId, neighbor: EdgeNeighbor) -> EdgeId {
        match neighbor {
            EdgeNeighbor::NextAroundOrigin => self.onext(edge),
            EdgeNeighbor::NextAroundDestination => sym_edge(self.onext(sym_edge(edge))),
            EdgeNeighbor::PrevAroundOrigin => self.oprev(edge),
            EdgeNeighbor::PrevAroundDestination => {
                rotate_edge(self.onext(rotate_edge(edge, ROT_3)), ROT_3)
            }
            EdgeNeighbor::NextAroundLeft => self.lnext(edge),
            EdgeNeighbor::NextAroundRight => {
                rotate_edge(self.onext(rotate_edge(edge, ROT_1)), ROT_3)
            }
            EdgeNeighbor::PrevAroundLeft => sym_edge(self.onext(edge)),
            EdgeNeighbor::PrevAroundRight => self.onext(sym_edge(edge)),
        }
    }

    /// Returns `true` if the left face of `edge` is a triangle
    #[inline]
    pub fn is_left_face_triangle(&self, edge: EdgeId) -> bool {
        let e1 = self.lnext(edge);
        let e2 = self.lnext(e1);
        e1 != edge && e2 != edge && self.lnext(e2) == edge
    }

    /// Creates an isolated edge, re-using a freed record if any
    pub fn make_edge(&mut self) -> EdgeId {
        match self.free_quad_edges.pop() {
            Some(quad_edge) => {
                let edge = quad_edge << 2;
                self.quad_edges[quad_edge as usize] = QuadEdge::isolated(edge);
                edge
            }
            None => {
                let edge = (self.quad_edges.len() << 2) as EdgeId;
                self.quad_edges.push(QuadEdge::isolated(edge));
                edge
            }
        }
    }

    pub fn set_edge_points(&mut self, edge: EdgeId, org: VertexId, dst: VertexId) {
        let quad_edge = &mut self.quad_edges[quad_edge_id(edge) as usize];
        if edge_rotation(edge) == ROT_0 {
            quad_edge.verts = [org, dst];
        } else {
            quad_edge.verts = [dst, org];
        }
        self.vertices[org as usize].first_edge = edge;
        self.vertices[dst as usize].first_edge = sym_edge(edge);
    }

    /// Exchanges the origin rings of `edge_a` and `edge_b`, and the left face rings of their duals.
    ///
    /// Joins two rings if they are distinct, splits a ring in two otherwise.
    pub fn splice(&mut self, edge_a: EdgeId, edge_b: EdgeId) {
        #[cfg(feature = "more_profile_traces")]
        let _span = span!(Level::TRACE, "splice").entered();

        let a_next = self.onext(edge_a);
        let b_next = self.onext(edge_b);
        let a_rot = rotate_edge(a_next, ROT_1);
        let b_rot = rotate_edge(b_next, ROT_1);
        let a_rot_next = self.onext(a_rot);
        let b_rot_next = self.onext(b_rot);

        *self.onext_mut(edge_a) = b_next;
        *self.onext_mut(edge_b) = a_next;
        *self.onext_mut(a_rot) = b_rot_next;
        *self.onext_mut(b_rot) = a_rot_next;
    }

    /// Adds a new edge from the destination of `edge_a` to the origin of `edge_b`, so that
    /// `edge_a`, the new edge and `edge_b` share the same left face.
    pub fn connect(&mut self, edge_a: EdgeId, edge_b: EdgeId) -> EdgeId {
        let edge = self.make_edge();
        let a_lnext = self.lnext(edge_a);
        self.splice(edge, a_lnext);
        self.splice(sym_edge(edge), edge_b);
        self.set_edge_points(edge, self.edge_dst(edge_a), self.edge_org(edge_b));
        edge
    }

    /// Rotates `edge` counter-clockwise inside the quadrilateral formed by its two adjacent triangles.
    ///
    /// ```text
    ///           q3                        q3
    ///         /    \                    / | \
    ///       /        \                /   |   \
    ///     q1 -edge--> q2     =>     q1    |    q2
    ///       \        /                \   |   /
    ///         \    /                    \ v /
    ///           q4                        q4
    /// ```
    ///
    /// `edge` becomes the edge from q4 to q3 (from the right apex to the left apex).
    pub fn flip(&mut self, edge: EdgeId) {
        #[cfg(feature = "more_profile_traces")]
        let _span = span!(Level::TRACE, "flip").entered();

        let sym = sym_edge(edge);
        let a = self.oprev(edge);
        let b = self.oprev(sym);

        // The edge origins will change, the vertices should not reference it anymore
        let (org, sym_org) = (self.edge_org(edge), self.edge_org(sym));
        self.vertices[org as usize].first_edge = a;
        self.vertices[sym_org as usize].first_edge = b;

        self.splice(edge, a);
        self.splice(sym, b);
        let (a_dst, b_dst) = (self.edge_dst(a), self.edge_dst(b));
        self.set_edge_points(edge, a_dst, b_dst);
        let a_lnext = self.lnext(a);
        self.splice(edge, a_lnext);
        let b_lnext = self.lnext(b);
        self.splice(sym, b_lnext);
    }

    /// Disconnects `edge` from the subdivision and frees its record.
    ///
    /// Both endpoints **MUST** have other incident edges.
    pub fn delete_edge(&mut self, edge: EdgeId) {
        let sym = sym_edge(edge);
        let a = self.oprev(edge);
        let b = self.oprev(sym);
        debug_assert!(a != edge && b != sym);

        let (org, sym_org) = (self.edge_org(edge), self.edge_org(sym));
        self.vertices[org as usize].first_edge = a;
        self.vertices[sym_org as usize].first_edge = b;

        self.splice(edge, a);
        self.splice(sym, b);

        let quad_edge = quad_edge_id(edge);
        self.quad_edges[quad_edge as usize] = QuadEdge::isolated(quad_edge << 2);
        self.free_quad_edges.push(quad_edge);
    }

    /// Iterates over the edges having `vertex` as their origin, counter-clockwise
    pub fn edges_around(&self, vertex: VertexId) -> EdgesAround<'_> {
        let first = self.vertices[vertex as usize].first_edge;
        EdgesAround {
            subdivision: self,
            first,
            next: Some(first),
        }
    }
}

/// Iterator over the edges having the same origin, counter-clockwise
pub struct EdgesAround<'a> {
    subdivision: &'a Subdivision,
    first: EdgeId,
    next: Option<EdgeId>,
}
impl<'a> Iterator for EdgesAround<'a> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        let edge = self.next?;
        let onext = self.subdivision.onext(edge);
        self.next = if onext == self.first {
            None
        } else {
            Some(onext)
        };
        Some(edge)
    }
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////
