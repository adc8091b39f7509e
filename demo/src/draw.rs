use std::path::Path;

use anyhow::Context;
use ghx_incremental_delaunay::{glam::DVec2, DelaunayTriangulation};
use rand::Rng;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

pub const DELAUNAY_COLOR: [u8; 3] = [255, 255, 255];
pub const ACTIVE_FACET_COLOR: [u8; 3] = [255, 0, 0];
const POINT_RADIUS: f32 = 3.;

pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    pub fn new(size: u32) -> anyhow::Result<Self> {
        let mut pixmap = Pixmap::new(size, size).context("Failed to create pixmap")?;
        pixmap.fill(Color::BLACK);
        Ok(Self { pixmap })
    }

    pub fn draw_edge(
        &mut self,
        (from, to): (DVec2, DVec2),
        color: [u8; 3],
        width: f32,
    ) -> anyhow::Result<()> {
        let mut path = PathBuilder::new();
        path.move_to(from.x as f32, from.y as f32);
        path.line_to(to.x as f32, to.y as f32);
        let path = path.finish().context("Failed to finish edge path")?;

        let stroke = Stroke {
            width,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
        Ok(())
    }

    pub fn draw_triangles(
        &mut self,
        triangulation: &DelaunayTriangulation,
        color: [u8; 3],
    ) -> anyhow::Result<()> {
        let mut path = PathBuilder::new();
        for triangle in triangulation.triangles() {
            let [p0, p1, p2] = triangle.points;
            path.move_to(p0.x as f32, p0.y as f32);
            path.line_to(p1.x as f32, p1.y as f32);
            path.line_to(p2.x as f32, p2.y as f32);
            path.close();
        }
        let path = path.finish().context("Failed to finish triangles path")?;

        self.pixmap.stroke_path(
            &path,
            &paint(color),
            &Stroke::default(),
            Transform::identity(),
            None,
        );
        Ok(())
    }

    pub fn draw_point(&mut self, point: DVec2, color: [u8; 3]) -> anyhow::Result<()> {
        let circle = PathBuilder::from_circle(point.x as f32, point.y as f32, POINT_RADIUS)
            .context("Failed to build point circle")?;
        self.pixmap.fill_path(
            &circle,
            &paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
        Ok(())
    }

    /// Fills every facet with a random color, then outlines them and draws their center
    pub fn paint_voronoi(
        &mut self,
        triangulation: &DelaunayTriangulation,
        rng: &mut impl Rng,
    ) -> anyhow::Result<()> {
        let mut facets: Vec<_> = triangulation.voronoi_facets().into_values().collect();
        facets.sort_by_key(|facet| facet.vertex);

        let mut outlines = PathBuilder::new();
        for facet in &facets {
            let Some((first, rest)) = facet.polygon.split_first() else {
                continue;
            };
            let mut path = PathBuilder::new();
            path.move_to(first.x as f32, first.y as f32);
            outlines.move_to(first.x as f32, first.y as f32);
            for p in rest {
                path.line_to(p.x as f32, p.y as f32);
                outlines.line_to(p.x as f32, p.y as f32);
            }
            path.close();
            outlines.close();

            let path = path.finish().context("Failed to finish facet path")?;
            self.pixmap.fill_path(
                &path,
                &paint(rng.gen()),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
        let outlines = outlines.finish().context("Failed to finish outlines path")?;
        self.pixmap.stroke_path(
            &outlines,
            &paint([0, 0, 0]),
            &Stroke::default(),
            Transform::identity(),
            None,
        );

        for facet in &facets {
            self.draw_point(facet.center, [0, 0, 0])?;
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        self.pixmap
            .save_png(path)
            .with_context(|| format!("Failed to save {}", path.display()))
    }
}

fn paint(color: [u8; 3]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], 255);
    paint.anti_alias = true;
    paint
}
