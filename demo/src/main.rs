use std::{fs, path::Path};

use anyhow::Context;
use ghx_incremental_delaunay::{
    glam::DVec2, BoundingRect, DelaunayTriangulation, EdgeNeighbor, LocationKind,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod draw;

use draw::{Canvas, ACTIVE_FACET_COLOR, DELAUNAY_COLOR};

const SIZE: u32 = 600;
const ITERATIONS: usize = 200;
const SEED: u64 = 42;
/// A frame is saved every `FRAME_INTERVAL` insertions
const FRAME_INTERVAL: usize = 10;
const OUTPUT_DIR: &str = "output";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let output = Path::new(OUTPUT_DIR);
    fs::create_dir_all(output).context("Failed to create the output directory")?;

    let bounds = BoundingRect::new(0., 0., SIZE as f64, SIZE as f64);
    let mut triangulation = DelaunayTriangulation::new(bounds)?;
    let mut rng = StdRng::seed_from_u64(SEED);

    for i in 0..ITERATIONS {
        let point = DVec2::new(
            rng.gen_range(5..SIZE - 5) as f64,
            rng.gen_range(5..SIZE - 5) as f64,
        );

        if i % FRAME_INTERVAL == 0 {
            let mut canvas = Canvas::new(SIZE)?;
            canvas.draw_triangles(&triangulation, DELAUNAY_COLOR)?;
            draw_located_facet(&mut canvas, &triangulation, point)?;
            canvas.draw_point(point, ACTIVE_FACET_COLOR)?;
            canvas.save(&output.join(format!("frame_{i:03}_locate.png")))?;
        }

        triangulation.insert(point)?;

        if i % FRAME_INTERVAL == 0 {
            let mut canvas = Canvas::new(SIZE)?;
            canvas.draw_triangles(&triangulation, DELAUNAY_COLOR)?;
            canvas.save(&output.join(format!("frame_{i:03}_insert.png")))?;
        }
    }
    debug_assert!(triangulation.is_delaunay());

    let mut canvas = Canvas::new(SIZE)?;
    canvas.paint_voronoi(&triangulation, &mut rng)?;
    let voronoi_path = output.join("voronoi.png");
    canvas.save(&voronoi_path)?;

    info!(
        "{} vertices, {} triangles, Voronoi diagram saved to {}",
        triangulation.real_vertex_count(),
        triangulation.triangle_count(),
        voronoi_path.display()
    );
    Ok(())
}

/// Outlines the face containing `point` by walking around the left face of the located edge
fn draw_located_facet(
    canvas: &mut Canvas,
    triangulation: &DelaunayTriangulation,
    point: DVec2,
) -> anyhow::Result<()> {
    let location = triangulation.locate(point)?;
    if let LocationKind::OnVertex(vertex) = location.kind {
        info!("Point {point} is already vertex {}", vertex.id());
    }

    let first = location.edge;
    let mut edge = first;
    loop {
        canvas.draw_edge(triangulation.edge_points(edge), ACTIVE_FACET_COLOR, 3.)?;
        edge = triangulation.next_edge(edge, EdgeNeighbor::NextAroundLeft);
        if edge == first {
            break;
        }
    }
    Ok(())
}
