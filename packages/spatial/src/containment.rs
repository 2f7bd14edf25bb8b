//! Exact point-in-polygon tests.
//!
//! A point is contained when it lies strictly inside the exterior ring and
//! outside every hole. Points on an edge or a vertex are not contained, and
//! polygons whose exterior has fewer than three distinct vertices contain
//! nothing.

use geo::{Contains as _, MultiPolygon, Point, Polygon};

/// Whether the point is strictly inside the polygon, holes excluded.
#[must_use]
pub fn polygon_contains(polygon: &Polygon<f64>, x: f64, y: f64) -> bool {
    polygon.contains(&Point::new(x, y))
}

/// Whether any member polygon contains the point.
#[must_use]
pub fn multi_polygon_contains(mp: &MultiPolygon<f64>, x: f64, y: f64) -> bool {
    let point = Point::new(x, y);
    mp.0.iter().any(|polygon| polygon.contains(&point))
}

#[cfg(test)]
mod tests {
    use geo::{LineString, MultiPolygon, Polygon, polygon};

    use super::*;

    fn unit_square() -> Polygon<f64> {
        polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ]
    }

    fn square_with_hole() -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]),
            vec![LineString::from(vec![
                (1.0, 1.0),
                (3.0, 1.0),
                (3.0, 3.0),
                (1.0, 3.0),
            ])],
        )
    }

    #[test]
    fn contains_interior_point() {
        assert!(polygon_contains(&unit_square(), 0.5, 0.5));
    }

    #[test]
    fn rejects_exterior_point() {
        assert!(!polygon_contains(&unit_square(), 1.5, 0.5));
        assert!(!polygon_contains(&unit_square(), 0.5, -0.1));
    }

    #[test]
    fn edges_and_vertices_are_outside() {
        let square = unit_square();
        assert!(!polygon_contains(&square, 0.0, 0.5));
        assert!(!polygon_contains(&square, 1.0, 0.5));
        assert!(!polygon_contains(&square, 0.5, 0.0));
        assert!(!polygon_contains(&square, 0.5, 1.0));
        assert!(!polygon_contains(&square, 0.0, 0.0));
        assert!(!polygon_contains(&square, 1.0, 1.0));
    }

    #[test]
    fn shared_edge_belongs_to_neither_neighbour() {
        let mp = MultiPolygon(vec![
            unit_square(),
            polygon![
                (x: 1.0, y: 0.0),
                (x: 2.0, y: 0.0),
                (x: 2.0, y: 1.0),
                (x: 1.0, y: 1.0),
            ],
        ]);
        assert!(!multi_polygon_contains(&mp, 1.0, 0.5));
        assert!(multi_polygon_contains(&mp, 0.999, 0.5));
        assert!(multi_polygon_contains(&mp, 1.001, 0.5));
    }

    #[test]
    fn repeated_calls_agree() {
        let square = unit_square();
        let first = polygon_contains(&square, 0.25, 0.75);
        for _ in 0..10 {
            assert_eq!(polygon_contains(&square, 0.25, 0.75), first);
        }
    }

    #[test]
    fn point_in_hole_is_not_contained() {
        let poly = square_with_hole();
        assert!(!polygon_contains(&poly, 2.0, 2.0));
        assert!(!polygon_contains(&poly, 1.0, 2.0));
        assert!(polygon_contains(&poly, 0.5, 2.0));
        assert!(polygon_contains(&poly, 3.5, 3.5));
    }

    #[test]
    fn concave_notch_is_outside() {
        // U shape opening upwards; (1.5, 1.5) sits in the notch.
        let u_shape = polygon![
            (x: 0.0, y: 0.0),
            (x: 3.0, y: 0.0),
            (x: 3.0, y: 2.0),
            (x: 2.0, y: 2.0),
            (x: 2.0, y: 1.0),
            (x: 1.0, y: 1.0),
            (x: 1.0, y: 2.0),
            (x: 0.0, y: 2.0),
        ];
        assert!(!polygon_contains(&u_shape, 1.5, 1.5));
        assert!(polygon_contains(&u_shape, 0.5, 1.5));
        assert!(polygon_contains(&u_shape, 1.5, 0.5));
    }

    #[test]
    fn open_ring_behaves_like_closed_ring() {
        let open = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let mut closed = open.clone();
        closed.close();
        let open = Polygon::new(open, vec![]);
        let closed = Polygon::new(closed, vec![]);
        assert_eq!(polygon_contains(&open, 0.5, 0.5), polygon_contains(&closed, 0.5, 0.5));
        assert!(polygon_contains(&open, 0.5, 0.5));
    }

    #[test]
    fn degenerate_polygons_contain_nothing() {
        let empty = Polygon::new(LineString::<f64>::from(Vec::<(f64, f64)>::new()), vec![]);
        let single = Polygon::new(LineString::from(vec![(0.0, 0.0)]), vec![]);
        let segment = Polygon::new(LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]), vec![]);
        assert!(!polygon_contains(&empty, 0.0, 0.0));
        assert!(!polygon_contains(&single, 0.0, 0.0));
        assert!(!polygon_contains(&segment, 0.5, 0.5));
        assert!(!polygon_contains(&segment, 0.5, 0.4));
    }

    #[test]
    fn multi_polygon_matches_any_member() {
        let mp = MultiPolygon(vec![
            unit_square(),
            polygon![
                (x: 2.0, y: 0.0),
                (x: 3.0, y: 0.0),
                (x: 3.0, y: 1.0),
                (x: 2.0, y: 1.0),
            ],
        ]);
        assert!(multi_polygon_contains(&mp, 2.5, 0.5));
        assert!(multi_polygon_contains(&mp, 0.5, 0.5));
        assert!(!multi_polygon_contains(&mp, 1.5, 0.5));
    }
}
