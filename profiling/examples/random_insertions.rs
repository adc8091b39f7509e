use ghx_incremental_delaunay::{
    types::Vertex, BoundingRect, DelaunayTriangulation, SubdivisionConfiguration,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::{layer::SubscriberExt, Registry};
use tracing_tracy::TracyLayer;

pub const SEED: &[u8; 32] = b"\xfb\xdc\x4e\xa0\x30\xde\x82\xba\x69\x97\x3c\x52\x49\x4d\x00\xca
\x5c\x21\xa3\x8d\x5c\xf2\x34\x4e\x58\x7d\x80\x16\x66\x23\x30";

const SIZE: f64 = 10_000.;
const VERTICES_COUNT: usize = 200_000;

/// Uniformly distributed points, away from the sides of a `size` x `size` square
pub fn uniform_distribution(size: f64, seed: [u8; 32]) -> impl Iterator<Item = [f64; 2]> {
    let range = rand::distributions::Uniform::new(1., size - 1.);
    let mut rng = StdRng::from_seed(seed);
    core::iter::from_fn(move || Some([rng.sample(range), rng.sample(range)]))
}

fn main() {
    let subscriber = Registry::default().with(TracyLayer::default());
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let vertices: Vec<Vertex> = uniform_distribution(SIZE, *SEED)
        .take(VERTICES_COUNT)
        .map(|vertex| Vertex::new(vertex[0], vertex[1]))
        .collect();

    let mut triangulation = DelaunayTriangulation::with_configuration(
        BoundingRect::new(0., 0., SIZE, SIZE),
        SubdivisionConfiguration {
            parallel_voronoi_vertex_count_threshold: 10000,
            parallel_voronoi_min_batch_len: 10000,
            ..Default::default()
        },
    )
    .expect("Bounds are valid");
    triangulation
        .insert_all(vertices)
        .expect("Vertices are in bounds");

    let _facets = triangulation.voronoi_facets();
}
