use ghx_incremental_delaunay::{
    types::{Float, Vertex, DEFAULT_EPSILON},
    utils::{exact_orientation, Orientation},
    BoundingRect, DelaunayTriangulation, LocationKind, SubdivisionError,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const SEED: u64 = 0x5eed_de1a_0a11;
/// Rounding tolerance on coordinates up to a few hundreds
const TOLERANCE: Float = 1e3 * DEFAULT_EPSILON;

fn random_points(count: usize, seed: u64) -> Vec<Vertex> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| Vertex::new(rng.gen_range(5.0..595.0), rng.gen_range(5.0..595.0)))
        .collect()
}

fn square() -> DelaunayTriangulation {
    DelaunayTriangulation::new(BoundingRect::new(0., 0., 600., 600.)).expect("Bounds are valid")
}

fn assert_triangles_are_delaunay(triangulation: &DelaunayTriangulation) {
    for triangle in triangulation.triangles() {
        let Some(center) = triangle.circumcenter() else {
            panic!("Flat triangle {:?}", triangle);
        };
        let radius = center.distance(triangle.points[0]);
        for (vertex, position) in triangulation.vertices() {
            if triangle.vertices.contains(&vertex) {
                continue;
            }
            assert!(
                center.distance(position) >= radius * (1. - 1e-6),
                "Vertex {:?} is in the circumcircle of {:?}",
                vertex,
                triangle
            );
        }
    }
}

fn assert_triangles_are_ccw(triangulation: &DelaunayTriangulation) {
    for triangle in triangulation.triangles() {
        let [a, b, c] = triangle.points;
        assert_eq!(
            Orientation::CounterClockwise,
            exact_orientation((a, b), c),
            "Triangle {:?} is flat or clockwise",
            triangle
        );
    }
}

#[test]
fn delaunay_and_euler_after_each_insertion() {
    let mut triangulation = square();

    for point in random_points(100, SEED) {
        triangulation.insert(point).expect("Point is in bounds");

        let vertex_count = triangulation.vertex_count();
        assert_eq!(2 * vertex_count - 2 - 4, triangulation.triangle_count());
        assert_eq!(3 * vertex_count - 3 - 4, triangulation.edge_count());
        assert_triangles_are_delaunay(&triangulation);
    }
    assert!(triangulation.is_delaunay());
}

#[test]
fn idempotent_insertion() {
    let mut triangulation = square();
    let points = random_points(50, SEED + 1);
    let vertices = triangulation
        .insert_all(points.iter().copied())
        .expect("Points are in bounds");
    let triangle_count = triangulation.triangle_count();

    for (point, vertex) in points.iter().zip(&vertices) {
        assert_eq!(Ok(*vertex), triangulation.insert(*point));
        assert_eq!(*point, triangulation.vertex(*vertex));
    }
    assert_eq!(triangle_count, triangulation.triangle_count());
    assert_eq!(4 + 50, triangulation.vertex_count());
}

#[test]
fn locate_triangle_centroids() {
    let mut triangulation = square();
    triangulation
        .insert_all(random_points(200, SEED + 2))
        .expect("Points are in bounds");

    for triangle in triangulation.triangles() {
        let location = triangulation
            .locate(triangle.centroid())
            .expect("Centroid is in bounds");
        assert_eq!(LocationKind::Inside, location.kind);

        let located = triangulation
            .left_triangle(location.edge)
            .expect("Located edge has a triangle on its left");
        let mut expected = triangle.vertices;
        let mut found = located.vertices;
        expected.sort();
        found.sort();
        assert_eq!(expected, found);
    }
}

#[test]
fn locate_existing_vertices() {
    let mut triangulation = square();
    let vertices = triangulation
        .insert_all(random_points(100, SEED + 3))
        .expect("Points are in bounds");

    for vertex in vertices {
        let location = triangulation
            .locate(triangulation.vertex(vertex))
            .expect("Vertex is in bounds");
        assert_eq!(LocationKind::OnVertex(vertex), location.kind);
        assert_eq!(vertex, triangulation.edge_origin(location.edge));
    }
}

#[test]
fn nearest_vertex_matches_brute_force() {
    let mut triangulation = square();
    triangulation
        .insert_all(random_points(150, SEED + 4))
        .expect("Points are in bounds");

    for query in random_points(100, SEED + 5) {
        let nearest = triangulation
            .nearest_vertex(query)
            .expect("Query is in bounds");
        let brute_force = triangulation
            .vertices()
            .map(|(_, position)| position.distance(query))
            .fold(Float::MAX, Float::min);
        assert!((triangulation.vertex(nearest).distance(query) - brute_force).abs() < 1e-9);
    }
}

#[test]
fn voronoi_duality() {
    let mut triangulation = square();
    let vertices = triangulation
        .insert_all(random_points(80, SEED + 6))
        .expect("Points are in bounds");
    let facets = triangulation.voronoi_facets();
    assert_eq!(vertices.len(), facets.len());

    let bounds = triangulation.bounds();
    for vertex in &vertices {
        let facet = &facets[vertex];
        assert!(facet.contains(facet.center, 1e-9));
        for other in vertices.iter().filter(|other| *other != vertex) {
            let position = triangulation.vertex(*other);
            assert!(!facet.contains(position, 0.));
        }
        for p in &facet.polygon {
            assert!(bounds.contains(*p, TOLERANCE));
            let own_distance = p.distance(facet.center);
            for (_, other) in triangulation.vertices() {
                assert!(own_distance <= p.distance(other) + TOLERANCE);
            }
        }
    }

    // Facets of inserted vertices tile the rectangle, minus the regions of the corners
    let area: Float = facets
        .values()
        .map(|facet| {
            let count = facet.polygon.len();
            (0..count)
                .map(|i| facet.polygon[i].perp_dot(facet.polygon[(i + 1) % count]))
                .sum::<Float>()
                / 2.
        })
        .sum();
    assert!(area > 0. && area < 600. * 600.);
}

#[test]
fn on_edge_insertion_splits_two_triangles() {
    let mut triangulation = square();
    triangulation
        .insert_all(random_points(30, SEED + 7))
        .expect("Points are in bounds");

    let edge = triangulation
        .edges()
        .real_vertices_only()
        .next()
        .expect("Real edges exist");
    let middle = (edge.points.0 + edge.points.1) / 2.;
    let triangle_count = triangulation.triangle_count();

    let location = triangulation.locate(middle).expect("Point is in bounds");
    assert_eq!(LocationKind::OnEdge, location.kind);
    triangulation.insert(middle).expect("Point is in bounds");

    assert_eq!(triangle_count + 2, triangulation.triangle_count());
    assert!(triangulation.is_delaunay());
    assert_triangles_are_delaunay(&triangulation);
}

#[test]
fn near_duplicate_points() {
    let mut triangulation = square();

    for point in random_points(300, SEED + 11) {
        triangulation.insert(point).expect("Point is in bounds");
        // A few epsilons away from the point, or from each other
        for offset in [
            Vertex::new(2e-9, 0.),
            Vertex::new(3e-9, 0.),
            Vertex::new(0., 1e-8),
            Vertex::new(-1e-8, 3e-9),
        ] {
            triangulation
                .insert(point + offset)
                .expect("Point is in bounds");
        }
    }

    assert!(triangulation.is_delaunay());
    assert_triangles_are_ccw(&triangulation);
    let vertex_count = triangulation.vertex_count();
    assert_eq!(2 * vertex_count - 6, triangulation.triangle_count());
}

#[test]
fn near_colinear_points_around_edges() {
    let mut triangulation = square();
    triangulation
        .insert_all(random_points(60, SEED + 12))
        .expect("Points are in bounds");
    let edges: Vec<_> = triangulation.edges().real_vertices_only().collect();

    for edge in edges {
        let (from, to) = edge.points;
        let direction = (to - from).normalize();
        let normal = direction.perp();
        for point in [
            from + direction * 4e-9 + normal * 2e-9,
            from + direction * 4e-9 - normal * 5e-10,
            to - direction * 3e-9 + normal * 1e-9,
            (from + to) / 2. + normal * 5e-10,
            // Near the line, past the ends of the edge
            from - direction * 3e-9 + normal * 5e-10,
            to + direction * 2e-9 - normal * 2e-9,
        ] {
            triangulation.insert(point).expect("Point is in bounds");
        }
    }

    assert!(triangulation.is_delaunay());
    assert_triangles_are_ccw(&triangulation);
    let vertex_count = triangulation.vertex_count();
    assert_eq!(2 * vertex_count - 6, triangulation.triangle_count());
    assert_eq!(3 * vertex_count - 7, triangulation.edge_count());
}

#[test]
fn rejected_insertions_leave_subdivision_untouched() {
    let mut triangulation = square();
    triangulation
        .insert_all(random_points(40, SEED + 8))
        .expect("Points are in bounds");
    let triangles: Vec<_> = triangulation.triangles().collect();
    let vertex_count = triangulation.vertex_count();

    for point in [
        Vertex::new(-10., 300.),
        Vertex::new(300., 600.5),
        Vertex::new(0., 300.),
        Vertex::new(Float::NAN, 1.),
    ] {
        assert!(matches!(
            triangulation.insert(point),
            Err(SubdivisionError::OutOfBounds { .. })
        ));
    }

    assert_eq!(vertex_count, triangulation.vertex_count());
    assert_eq!(triangles, triangulation.triangles().collect::<Vec<_>>());
}

#[test]
fn concurrent_readers_with_exclusive_writer() {
    let triangulation = std::sync::RwLock::new(square());
    let points = random_points(100, SEED + 9);

    std::thread::scope(|scope| {
        scope.spawn(|| {
            for point in &points {
                let mut triangulation = triangulation.write().expect("Lock is not poisoned");
                triangulation.insert(*point).expect("Point is in bounds");
            }
        });
        for seed in 0..2 {
            let triangulation = &triangulation;
            scope.spawn(move || {
                for query in random_points(100, SEED + 10 + seed) {
                    let triangulation = triangulation.read().expect("Lock is not poisoned");
                    assert!(triangulation.locate(query).is_ok());
                    let vertex_count = triangulation.vertex_count();
                    assert_eq!(2 * vertex_count - 6, triangulation.triangle_count());
                }
            });
        }
    });

    let triangulation = triangulation.into_inner().expect("Lock is not poisoned");
    assert_eq!(100, triangulation.real_vertex_count());
}
