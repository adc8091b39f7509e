use robust::{incircle, orient2d, Coord};

use crate::types::{EdgeVertices, Float, TriangleVertices, Vertex};

#[cfg(feature = "more_profile_traces")]
use tracing::{span, Level};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Orientation {
    Colinear,
    Clockwise,
    CounterClockwise,
}

/// Cross product of vectors e0.e1 and e0.p
///
/// Positive if `p` is on the left side of the oriented edge `e`, negative if it is on its right side.
/// Its absolute value is twice the area of the triangle (e0, e1, p).
#[inline(always)]
pub fn edge_side_value(e: EdgeVertices, p: Vertex) -> Float {
    (e.1.x - e.0.x) * (p.y - e.0.y) - (e.1.y - e.0.y) * (p.x - e.0.x)
}

/// Returns the orientation of `p` relatively to the oriented edge `e`.
///
/// `p` is considered [Orientation::Colinear] when its distance to the line supporting `e` is lower or equal to `epsilon`.
#[inline]
pub fn point_edge_orientation(e: EdgeVertices, p: Vertex, epsilon: Float) -> Orientation {
    #[cfg(feature = "more_profile_traces")]
    let _span = span!(Level::TRACE, "point_edge_orientation").entered();

    let val = edge_side_value(e, p);
    // |val| is the distance from p to the line, scaled by the edge length
    let tolerance = epsilon * e.0.distance(e.1);
    if val > tolerance {
        Orientation::CounterClockwise
    } else if val < -tolerance {
        Orientation::Clockwise
    } else {
        Orientation::Colinear
    }
}

/// Exact orientation of `p` relatively to the oriented edge `e`, with no tolerance.
#[inline]
pub fn exact_orientation(e: EdgeVertices, p: Vertex) -> Orientation {
    #[cfg(feature = "more_profile_traces")]
    let _span = span!(Level::TRACE, "exact_orientation").entered();

    let val = orient2d(coord(e.0), coord(e.1), coord(p));
    if val > 0. {
        Orientation::CounterClockwise
    } else if val < 0. {
        Orientation::Clockwise
    } else {
        Orientation::Colinear
    }
}

/// Checks if vertex `p` is strictly inside the circumcircle of the triangle formed by the first three vertices in
/// `triangle`. Cocircular vertices are not inside.
/// - `triangle` contains the vertices of the triangle.
///     - length of `triangle` **MUST** be >= 3.
///     - `triangle` vertices must be in a counter-clockwise order
///
/// ```text
/// v3 --------- v2
/// |          / |
/// |        /   |
/// |      /     |
/// |    /       |
/// |  /         |
/// v1 --------- p
/// ```
#[inline(always)]
pub(crate) fn is_vertex_in_triangle_circumcircle(triangle: &[Vertex], p: Vertex) -> bool {
    #[cfg(feature = "more_profile_traces")]
    let _span = span!(Level::TRACE, "is_vertex_in_triangle_circumcircle").entered();

    incircle(
        coord(triangle[0]),
        coord(triangle[1]),
        coord(triangle[2]),
        coord(p),
    ) > 0.
}

#[inline(always)]
fn coord(v: Vertex) -> Coord<Float> {
    Coord { x: v.x, y: v.y }
}

/// Computes the center of the circle passing through the 3 vertices of `triangle`.
///
/// Returns [None] if the triangle is flat (its vertices are colinear).
pub fn circumcenter(triangle: &TriangleVertices) -> Option<Vertex> {
    let [a, b, c] = *triangle;
    let d = 2. * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < Float::EPSILON * (a.length_squared() + b.length_squared() + c.length_squared())
    {
        return None;
    }

    let a2 = a.length_squared();
    let b2 = b.length_squared();
    let c2 = c.length_squared();

    Some(Vertex::new(
        (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
        (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
    ))
}

#[inline]
pub fn centroid(triangle: &TriangleVertices) -> Vertex {
    (triangle[0] + triangle[1] + triangle[2]) / 3.
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {

    use crate::{
        types::{Float, Vertex},
        utils::{
            centroid, circumcenter, edge_side_value, exact_orientation,
            is_vertex_in_triangle_circumcircle, point_edge_orientation, Orientation,
        },
    };

    #[test]
    fn vertex_in_triangle_circumcircle() {
        let unit_circle = [
            Vertex::new(-1., 0.),
            Vertex::new(1., 0.),
            Vertex::new(0., 1.),
        ];

        let step = 100;
        for i in -step..step {
            for j in -step..step {
                let p = Vertex::new(i as Float / step as Float, j as Float / step as Float);
                let p_length = p.length();
                let p_in_circle = is_vertex_in_triangle_circumcircle(&unit_circle, p);
                if p_length < 1. {
                    assert_eq!(true, p_in_circle, "p_length < 1, p should be in the circle");
                } else if p_length > 1. {
                    assert_eq!(
                        false, p_in_circle,
                        "p_length > 1, p should be out of the circle"
                    );
                }
            }
        }
    }

    #[test]
    fn cocircular_vertex_is_not_in_circumcircle() {
        let triangle = [
            Vertex::new(0., 0.),
            Vertex::new(1., 0.),
            Vertex::new(1., 1.),
        ];

        assert!(!is_vertex_in_triangle_circumcircle(&triangle, Vertex::new(0., 1.)));
        assert!(is_vertex_in_triangle_circumcircle(
            &triangle,
            Vertex::new(Float::EPSILON, 1.)
        ));
    }

    #[test]
    fn exact_orientation_has_no_tolerance() {
        let edge = (Vertex::new(0., 0.), Vertex::new(3., 3.));

        assert_eq!(
            Orientation::Colinear,
            exact_orientation(edge, Vertex::new(1.5, 1.5))
        );
        assert_eq!(
            Orientation::Colinear,
            exact_orientation(edge, Vertex::new(-6., -6.))
        );
        // One unit in the last place away from the line
        assert_eq!(
            Orientation::CounterClockwise,
            exact_orientation(edge, Vertex::new(1.5, 1.5 + Float::EPSILON))
        );
        assert_eq!(
            Orientation::Clockwise,
            exact_orientation(edge, Vertex::new(1.5 + Float::EPSILON, 1.5))
        );
    }

    #[test]
    fn point_edge_orientation_left_right_colinear() {
        let edge = (Vertex::new(0., 0.), Vertex::new(3., 0.));

        assert_eq!(
            Orientation::CounterClockwise,
            point_edge_orientation(edge, Vertex::new(1., 3.), 1e-6)
        );
        assert_eq!(
            Orientation::Clockwise,
            point_edge_orientation(edge, Vertex::new(1., -3.), 1e-6)
        );
        assert_eq!(
            Orientation::Colinear,
            point_edge_orientation(edge, Vertex::new(7., 0.), 1e-6)
        );
        // Within tolerance of the line
        assert_eq!(
            Orientation::Colinear,
            point_edge_orientation(edge, Vertex::new(1., 0.05), 0.1)
        );
    }

    #[test]
    fn edge_side_value_sign() {
        let edge = (Vertex::new(0., 0.), Vertex::new(3., 0.));

        assert_eq!(6., edge_side_value(edge, Vertex::new(1., 2.)));
        assert_eq!(-6., edge_side_value(edge, Vertex::new(1., -2.)));
        assert_eq!(0., edge_side_value(edge, Vertex::new(-4., 0.)));
    }

    #[test]
    fn point_edge_orientation_scales_with_edge_length() {
        // The tolerance is a distance, whatever the length of the edge
        let long_edge = (Vertex::new(0., 0.), Vertex::new(1000., 0.));
        let short_edge = (Vertex::new(0., 0.), Vertex::new(0.001, 0.));
        let p = Vertex::new(0.0005, 0.05);

        assert_eq!(
            Orientation::Colinear,
            point_edge_orientation(long_edge, p, 0.1)
        );
        assert_eq!(
            Orientation::Colinear,
            point_edge_orientation(short_edge, p, 0.1)
        );
        assert_eq!(
            Orientation::CounterClockwise,
            point_edge_orientation(short_edge, p, 0.01)
        );
    }

    #[test]
    fn circumcenter_right_triangle() {
        let center = circumcenter(&[
            Vertex::new(0., 0.),
            Vertex::new(4., 0.),
            Vertex::new(0., 2.),
        ])
        .expect("Triangle is not flat");

        assert!((center - Vertex::new(2., 1.)).length() < 1e-4);
    }

    #[test]
    fn circumcenter_is_equidistant() {
        let triangle = [
            Vertex::new(100., 100.),
            Vertex::new(500., 100.),
            Vertex::new(300., 500.),
        ];
        let center = circumcenter(&triangle).expect("Triangle is not flat");

        let r0 = center.distance(triangle[0]);
        assert!((r0 - center.distance(triangle[1])).abs() < 1e-3);
        assert!((r0 - center.distance(triangle[2])).abs() < 1e-3);
    }

    #[test]
    fn circumcenter_flat_triangle() {
        let center = circumcenter(&[
            Vertex::new(0., 0.),
            Vertex::new(1., 1.),
            Vertex::new(2., 2.),
        ]);

        assert_eq!(None, center);
    }

    #[test]
    fn triangle_centroid() {
        let center = centroid(&[
            Vertex::new(0., 0.),
            Vertex::new(3., 0.),
            Vertex::new(0., 3.),
        ]);

        assert_eq!(Vertex::new(1., 1.), center);
    }
}
