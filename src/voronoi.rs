use hashbrown::HashMap;

use crate::{
    subdivision::Subdivision,
    triangulation::DelaunayTriangulation,
    types::{BoundingRect, EdgeVertices, Float, Vertex, VertexHandle, VertexId, CORNERS_COUNT},
    utils::{centroid, circumcenter, edge_side_value},
};

#[cfg(feature = "parallel_voronoi")]
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

#[cfg(feature = "progress_log")]
use tracing::info;

#[cfg(feature = "profile_traces")]
use tracing::{span, Level};

/// Region of the plane closer to a vertex than to any other vertex of the subdivision
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiFacet {
    pub vertex: VertexHandle,
    /// Position of `vertex`
    pub center: Vertex,
    /// Convex polygon, in a counter-clockwise order
    pub polygon: Vec<Vertex>,
}
impl VoronoiFacet {
    /// Returns `true` if `point` is inside the facet or less than `epsilon` away from its boundary
    pub fn contains(&self, point: Vertex, epsilon: Float) -> bool {
        let count = self.polygon.len();
        (0..count).all(|i| {
            let edge = (self.polygon[i], self.polygon[(i + 1) % count]);
            edge_side_value(edge, point) >= -epsilon * edge.0.distance(edge.1)
        })
    }
}

impl DelaunayTriangulation {
    /// Facets of all the inserted vertices. Synthetic corners have no facet.
    pub fn voronoi_facets(&self) -> HashMap<VertexHandle, VoronoiFacet> {
        #[cfg(feature = "profile_traces")]
        let _span = span!(Level::TRACE, "voronoi_facets").entered();

        let vertex_ids = CORNERS_COUNT..self.vertex_count();

        #[cfg(feature = "parallel_voronoi")]
        let facets: HashMap<VertexHandle, VoronoiFacet> = if self.real_vertex_count()
            >= self.config.parallel_voronoi_vertex_count_threshold
        {
            let facets: Vec<VoronoiFacet> = vertex_ids
                .into_par_iter()
                .with_min_len(self.config.parallel_voronoi_min_batch_len)
                .map(|index| self.build_facet(index as VertexId))
                .collect();
            facets
                .into_iter()
                .map(|facet| (facet.vertex, facet))
                .collect()
        } else {
            vertex_ids
                .map(|index| self.build_facet(index as VertexId))
                .map(|facet| (facet.vertex, facet))
                .collect()
        };

        #[cfg(not(feature = "parallel_voronoi"))]
        let facets: HashMap<VertexHandle, VoronoiFacet> = vertex_ids
            .map(|index| self.build_facet(index as VertexId))
            .map(|facet| (facet.vertex, facet))
            .collect();

        #[cfg(feature = "progress_log")]
        info!("Extracted {} Voronoi facets", facets.len());

        facets
    }

    /// [None] for a synthetic corner or an unknown vertex
    pub fn voronoi_facet(&self, vertex: VertexHandle) -> Option<VoronoiFacet> {
        if vertex.index() >= self.vertex_count() || self.is_synthetic(vertex) {
            return None;
        }
        Some(self.build_facet(vertex.0))
    }

    /// Facets of `vertices`, in the same order. Synthetic corners and unknown vertices are skipped.
    pub fn voronoi_facets_for(&self, vertices: &[VertexHandle]) -> Vec<VoronoiFacet> {
        #[cfg(feature = "profile_traces")]
        let _span = span!(Level::TRACE, "voronoi_facets_for").entered();

        vertices
            .iter()
            .filter_map(|vertex| self.voronoi_facet(*vertex))
            .collect()
    }

    fn build_facet(&self, vertex_id: VertexId) -> VoronoiFacet {
        let polygon = facet_polygon(&self.subdivision, vertex_id);
        VoronoiFacet {
            vertex: VertexHandle(vertex_id),
            center: self.subdivision.position(vertex_id),
            polygon: if self.config.clip_voronoi_facets {
                clip_polygon_by_rect(polygon, &self.bounds)
            } else {
                polygon
            },
        }
    }
}

/// Circumcenters of the triangles around `vertex_id`, counter-clockwise.
///
/// `vertex_id` must not be on the outer face.
fn facet_polygon(subdivision: &Subdivision, vertex_id: VertexId) -> Vec<Vertex> {
    let center = subdivision.position(vertex_id);
    subdivision
        .edges_around(vertex_id)
        .map(|edge| {
            let next = subdivision.lnext(edge);
            let triangle = [
                center,
                subdivision.position(subdivision.edge_dst(edge)),
                subdivision.position(subdivision.edge_dst(next)),
            ];
            circumcenter(&triangle).unwrap_or_else(|| centroid(&triangle))
        })
        .collect()
}

/// Sutherland-Hodgman clipping of `polygon` by the sides of `rect`
pub(crate) fn clip_polygon_by_rect(polygon: Vec<Vertex>, rect: &BoundingRect) -> Vec<Vertex> {
    let corners = rect.corners();
    let mut output = polygon;
    for i in 0..CORNERS_COUNT {
        if output.is_empty() {
            break;
        }
        let side = (corners[i], corners[(i + 1) % CORNERS_COUNT]);

        let input = output;
        output = Vec::with_capacity(input.len() + 1);
        for (j, &current) in input.iter().enumerate() {
            let next = input[(j + 1) % input.len()];
            let current_inside = edge_side_value(side, current) >= 0.;
            let next_inside = edge_side_value(side, next) >= 0.;

            if current_inside {
                output.push(current);
            }
            if current_inside != next_inside {
                output.push(intersection_with_side((current, next), side));
            }
        }
    }
    output
}

/// Intersection of the segment `segment` with the line supporting `side`. The segment must cross it.
fn intersection_with_side(segment: EdgeVertices, side: EdgeVertices) -> Vertex {
    let d_current = edge_side_value(side, segment.0);
    let d_next = edge_side_value(side, segment.1);
    let t = d_current / (d_current - d_next);
    segment.0 + (segment.1 - segment.0) * t
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use crate::{
        triangulation::{DelaunayTriangulation, SubdivisionConfiguration},
        types::{BoundingRect, Float, Vertex, VertexHandle, DEFAULT_EPSILON},
        voronoi::clip_polygon_by_rect,
    };

    /// Rounding tolerance on coordinates up to a few hundreds
    const TOLERANCE: Float = 1e3 * DEFAULT_EPSILON;

    fn three_sites() -> (DelaunayTriangulation, Vec<VertexHandle>) {
        let mut triangulation = DelaunayTriangulation::new(BoundingRect::new(0., 0., 600., 600.))
            .expect("Bounds are valid");
        let vertices = triangulation
            .insert_all([
                Vertex::new(100., 100.),
                Vertex::new(500., 100.),
                Vertex::new(300., 500.),
            ])
            .expect("Points are in bounds");
        (triangulation, vertices)
    }

    fn polygon_area(polygon: &[Vertex]) -> Float {
        let count = polygon.len();
        (0..count)
            .map(|i| polygon[i].perp_dot(polygon[(i + 1) % count]))
            .sum::<Float>()
            / 2.
    }

    #[test]
    fn clip_polygon_inside_rect() {
        let polygon = vec![
            Vertex::new(1., 1.),
            Vertex::new(2., 1.),
            Vertex::new(2., 2.),
        ];
        let clipped = clip_polygon_by_rect(polygon.clone(), &BoundingRect::new(0., 0., 10., 10.));
        assert_eq!(polygon, clipped);
    }

    #[test]
    fn clip_polygon_crossing_rect() {
        let polygon = vec![
            Vertex::new(-5., -5.),
            Vertex::new(5., -5.),
            Vertex::new(5., 5.),
            Vertex::new(-5., 5.),
        ];
        let clipped = clip_polygon_by_rect(polygon, &BoundingRect::new(0., 0., 10., 10.));

        assert_eq!(4, clipped.len());
        assert!((polygon_area(&clipped) - 25.).abs() < 1e-6);
        for p in clipped {
            assert!(p.x >= -1e-9 && p.y >= -1e-9 && p.x <= 5. + 1e-9 && p.y <= 5. + 1e-9);
        }
    }

    #[test]
    fn clip_polygon_outside_rect() {
        let polygon = vec![
            Vertex::new(20., 20.),
            Vertex::new(30., 20.),
            Vertex::new(30., 30.),
        ];
        let clipped = clip_polygon_by_rect(polygon, &BoundingRect::new(0., 0., 10., 10.));
        assert!(clipped.is_empty());
    }

    #[test]
    fn facets_of_three_sites() {
        let (triangulation, vertices) = three_sites();

        let facets = triangulation.voronoi_facets();
        assert_eq!(3, facets.len());

        let bounds = triangulation.bounds();
        for vertex in &vertices {
            let facet = &facets[vertex];
            assert_eq!(*vertex, facet.vertex);
            assert_eq!(triangulation.vertex(*vertex), facet.center);
            assert!(facet.polygon.len() >= 3);
            assert!(polygon_area(&facet.polygon) > 0.);
            assert!(facet.contains(facet.center, 1e-9));
            for p in &facet.polygon {
                assert!(bounds.contains(*p, TOLERANCE));
            }
            for other in vertices.iter().filter(|other| *other != vertex) {
                assert!(!facet.contains(triangulation.vertex(*other), 1e-9));
            }
        }

        // The circumcenter of the inner triangle is shared by the 3 facets
        let shared = Vertex::new(300., 250.);
        for vertex in &vertices {
            assert!(facets[vertex]
                .polygon
                .iter()
                .any(|p| p.distance(shared) < TOLERANCE));
        }
    }

    #[test]
    fn facet_points_are_nearest_to_their_center() {
        let (triangulation, _vertices) = three_sites();

        for facet in triangulation.voronoi_facets().values() {
            for p in &facet.polygon {
                let own_distance = p.distance(facet.center);
                for (_, other) in triangulation.vertices() {
                    assert!(own_distance <= p.distance(other) + TOLERANCE);
                }
            }
        }
    }

    #[test]
    fn no_facet_for_corners() {
        let (triangulation, vertices) = three_sites();

        assert_eq!(None, triangulation.voronoi_facet(VertexHandle(0)));
        assert_eq!(None, triangulation.voronoi_facet(VertexHandle(42)));
        let facets = triangulation.voronoi_facets_for(&[
            vertices[2],
            VertexHandle(3),
            vertices[0],
        ]);
        assert_eq!(2, facets.len());
        assert_eq!(vertices[2], facets[0].vertex);
        assert_eq!(vertices[0], facets[1].vertex);
    }

    #[test]
    fn unclipped_facets() {
        let mut triangulation = DelaunayTriangulation::with_configuration(
            BoundingRect::new(0., 0., 600., 600.),
            SubdivisionConfiguration {
                clip_voronoi_facets: false,
                ..Default::default()
            },
        )
        .expect("Bounds are valid");
        // Close to a corner, some of its triangles have their circumcenter out of the rectangle
        let vertex = triangulation
            .insert(Vertex::new(20., 590.))
            .expect("Point is in bounds");

        let facet = triangulation
            .voronoi_facet(vertex)
            .expect("Vertex is not synthetic");
        let bounds = triangulation.bounds();
        assert!(facet.polygon.iter().any(|p| !bounds.contains(*p, 0.)));
        assert!(facet.contains(facet.center, 1e-9));
    }
}
