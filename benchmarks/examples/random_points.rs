use std::time::Instant;

use anyhow::Context;
use benchmarks::{uniform_points, SEED, SIZE};
use ghx_incremental_delaunay::{BoundingRect, DelaunayTriangulation};
use spade::{Point2, Triangulation};
use tiny_skia::{Paint, PathBuilder, Pixmap, Stroke, Transform};

const VERTICES_COUNT: usize = 100_000;
const OUTPUT_FILE: &str = "random_points.png";

fn main() -> anyhow::Result<()> {
    let points = uniform_points(VERTICES_COUNT, SEED);
    println!("{} vertices", points.len());
    println!();

    load_with_spade(&points)?;
    println!();

    load_with_delaunator(&points);
    println!();

    let triangulation = load_with_ghx_crate(&points)?;

    println!("Creating and saving output image...");
    draw_to_pixmap(&triangulation)?.save_png(OUTPUT_FILE)?;
    println!("Done!");

    Ok(())
}

fn load_with_spade(points: &[[f64; 2]]) -> anyhow::Result<()> {
    println!("Loading triangulation (spade)...");
    let now = Instant::now();
    let mut triangulation = spade::DelaunayTriangulation::<Point2<f64>>::new();
    for p in points {
        triangulation.insert(Point2::new(p[0], p[1]))?;
    }
    println!(
        "insertion time (spade, incremental): {}ms",
        now.elapsed().as_millis()
    );
    println!("{} triangles", triangulation.num_inner_faces());

    let now = Instant::now();
    spade::DelaunayTriangulation::<Point2<f64>>::bulk_load(
        points.iter().map(|p| Point2::new(p[0], p[1])).collect(),
    )?;
    println!("loading time (spade, bulk): {}ms", now.elapsed().as_millis());

    Ok(())
}

fn load_with_delaunator(points: &[[f64; 2]]) {
    let points: Vec<_> = points
        .iter()
        .map(|p| delaunator::Point { x: p[0], y: p[1] })
        .collect();

    println!("Loading triangulation (delaunator)...");
    let now = Instant::now();
    let triangulation = delaunator::triangulate(&points);
    println!(
        "loading time (delaunator, bulk): {}ms",
        now.elapsed().as_millis()
    );
    println!("{} triangles", triangulation.triangles.len() / 3);
}

fn load_with_ghx_crate(points: &[[f64; 2]]) -> anyhow::Result<DelaunayTriangulation> {
    println!("Loading triangulation (ghx_incremental_delaunay)...");
    let now = Instant::now();
    let mut triangulation = DelaunayTriangulation::new(BoundingRect::new(0., 0., SIZE, SIZE))?;
    triangulation.insert_all(points.iter().copied())?;
    println!(
        "insertion time (ghx_incremental_delaunay, incremental): {}ms",
        now.elapsed().as_millis()
    );
    println!(
        "{} triangles ({} without the rectangle corners)",
        triangulation.triangle_count(),
        triangulation.triangles().real_vertices_only().count()
    );

    let now = Instant::now();
    let facets = triangulation.voronoi_facets();
    println!(
        "{} Voronoi facets extracted in {}ms",
        facets.len(),
        now.elapsed().as_millis()
    );

    Ok(triangulation)
}

fn draw_to_pixmap(triangulation: &DelaunayTriangulation) -> anyhow::Result<Pixmap> {
    let mut edges = PathBuilder::new();
    for edge in triangulation.edges().real_vertices_only() {
        let (from, to) = edge.points;
        edges.move_to(from.x as f32, from.y as f32);
        edges.line_to(to.x as f32, to.y as f32);
    }
    let edges = edges.finish().context("Failed to finish edge path")?;

    let res = 1024.0;
    let mut pixmap = Pixmap::new(res as u32, res as u32).context("Failed to create pixmap")?;

    let scale = res / SIZE;
    let transform = Transform::from_scale(scale as f32, -scale as f32).post_translate(0.0, res as f32);

    let stroke = Stroke {
        width: 0.5 / scale as f32,
        ..Default::default()
    };
    let mut paint = Paint::default();
    paint.set_color_rgba8(50, 127, 150, 255);
    pixmap.stroke_path(&edges, &paint, &stroke, transform, None);

    Ok(pixmap)
}
