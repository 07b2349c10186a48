use crate::coords::{Point2D, Rectangle};

/// Liang-Barsky: the part of segment `a`-`b` inside `bounds`, or `None` when
/// they are disjoint. A segment already inside comes back unchanged.
pub(crate) fn clip_line(a: Point2D, b: Point2D, bounds: &Rectangle) -> Option<(Point2D, Point2D)> {
    let d = b - a;
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;

    let edges = [
        (-d.x, a.x - bounds.left()),
        (d.x, bounds.right() - a.x),
        (-d.y, a.y - bounds.bottom()),
        (d.y, bounds.top() - a.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    let start = if t0 > 0.0 { a + d * t0 } else { a };
    let end = if t1 < 1.0 { a + d * t1 } else { b };
    Some((start, end))
}

/// Sutherland-Hodgman against each edge of `bounds`.
///
/// The result fills the same area inside `bounds` as `points` under both
/// fill rules; edges introduced by the clip run along `bounds`.
pub(crate) fn clip_polygon(points: &[Point2D], bounds: &Rectangle) -> Vec<Point2D> {
    let (left, right, bottom, top) = (bounds.left(), bounds.right(), bounds.bottom(), bounds.top());

    let mut polygon = points.to_vec();
    polygon = clip_edge(&polygon, |p| p.x >= left, |a, b| at_x(a, b, left));
    polygon = clip_edge(&polygon, |p| p.x <= right, |a, b| at_x(a, b, right));
    polygon = clip_edge(&polygon, |p| p.y >= bottom, |a, b| at_y(a, b, bottom));
    clip_edge(&polygon, |p| p.y <= top, |a, b| at_y(a, b, top))
}

fn clip_edge(
    points: &[Point2D],
    inside: impl Fn(Point2D) -> bool,
    cross: impl Fn(Point2D, Point2D) -> Point2D,
) -> Vec<Point2D> {
    let Some(&last) = points.last() else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(points.len() + 2);
    let mut prev = last;
    for &p in points {
        match (inside(prev), inside(p)) {
            (true, true) => out.push(p),
            (true, false) => out.push(cross(prev, p)),
            (false, true) => {
                out.push(cross(prev, p));
                out.push(p);
            }
            (false, false) => {}
        }
        prev = p;
    }
    out
}

fn at_x(a: Point2D, b: Point2D, x: f64) -> Point2D {
    Point2D::new(x, a.y + (b.y - a.y) * (x - a.x) / (b.x - a.x))
}

fn at_y(a: Point2D, b: Point2D, y: f64) -> Point2D {
    Point2D::new(a.x + (b.x - a.x) * (y - a.y) / (b.y - a.y), y)
}
