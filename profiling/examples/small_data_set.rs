use ghx_incremental_delaunay::{
    types::Vertex, BoundingRect, DelaunayTriangulation, LocationKind,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::{layer::SubscriberExt, Registry};
use tracing_tracy::TracyLayer;

pub const SEED: &[u8; 32] = b"\xfb\xdc\x4e\xa0\x30\xde\x82\xba\x69\x97\x3c\x52\x49\x4d\x00\xca
\x5c\x21\xa3\x8d\x5c\xf2\x34\x4e\x58\x7d\x80\x16\x66\x23\x30";

/// Random walk, starting from the center of the square and bouncing on its sides
pub fn random_walk_distribution(
    step_size: f64,
    size: f64,
    seed: [u8; 32],
) -> impl Iterator<Item = [f64; 2]> {
    let range = rand::distributions::Uniform::new_inclusive(-step_size, step_size);
    let mut last_x = size / 2.;
    let mut last_y = size / 2.;

    let mut rng = StdRng::from_seed(seed);
    let step_fn = move || {
        last_x = (last_x + rng.sample(range)).clamp(1., size - 1.);
        last_y = (last_y + rng.sample(range)).clamp(1., size - 1.);

        Some([last_x, last_y])
    };
    core::iter::from_fn(step_fn)
}

const SIZE: f64 = 100.;
const VERTICES_COUNT: usize = 2000;

fn main() {
    let subscriber = Registry::default().with(TracyLayer::default());
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let vertices: Vec<Vertex> = random_walk_distribution(1.0, SIZE, *SEED)
        .take(VERTICES_COUNT)
        .map(|vertex| Vertex::new(vertex[0], vertex[1]))
        .collect();

    let mut triangulation = DelaunayTriangulation::new(BoundingRect::new(0., 0., SIZE, SIZE))
        .expect("Bounds are valid");
    for vertex in vertices {
        let location = triangulation.locate(vertex).expect("Vertex is in bounds");
        if let LocationKind::OnVertex(_) = location.kind {
            continue;
        }
        triangulation.insert(vertex).expect("Vertex is in bounds");
    }
}
