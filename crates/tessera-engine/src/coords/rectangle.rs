use super::Point2D;

/// Axis-aligned rectangle stored as two diagonally opposite corners.
///
/// The corners are kept in the order they were given. Every edge accessor
/// derives its value with min/max, so `left() <= right()` and
/// `bottom() <= top()` hold regardless of which corner came first.
///
/// "Bottom" is the minimum y and "top" the maximum y. In world space that is
/// the visual bottom/top; in screen space (+Y down) the roles are reversed.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rectangle {
    first: Point2D,
    second: Point2D,
}

impl Rectangle {
    /// Creates a rectangle from two diagonally opposite corners.
    #[inline]
    pub const fn new(first: Point2D, second: Point2D) -> Self {
        Self { first, second }
    }

    /// Creates a rectangle from one corner and a (possibly negative) extent.
    #[inline]
    pub fn from_size(origin: Point2D, width: f64, height: f64) -> Self {
        Self {
            first: origin,
            second: Point2D::new(origin.x + width, origin.y + height),
        }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.first.x.min(self.second.x)
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.first.x.max(self.second.x)
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.first.y.min(self.second.y)
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.first.y.max(self.second.y)
    }

    #[inline]
    pub fn bottom_left(&self) -> Point2D {
        Point2D::new(self.left(), self.bottom())
    }

    #[inline]
    pub fn top_right(&self) -> Point2D {
        Point2D::new(self.right(), self.top())
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right() - self.left()
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.top() - self.bottom()
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    #[inline]
    pub fn centre_x(&self) -> f64 {
        (self.right() + self.left()) * 0.5
    }

    #[inline]
    pub fn centre_y(&self) -> f64 {
        (self.top() + self.bottom()) * 0.5
    }

    #[inline]
    pub fn centre(&self) -> Point2D {
        Point2D::new(self.centre_x(), self.centre_y())
    }

    /// Closed containment: points on the edges are inside.
    #[inline]
    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        !(x < self.left() || self.right() < x || y < self.bottom() || self.top() < y)
    }

    #[inline]
    pub fn contains(&self, point: Point2D) -> bool {
        self.contains_xy(point.x, point.y)
    }

    /// Separating-axis overlap test. Rectangles that share an edge overlap.
    #[inline]
    pub fn intersects(&self, other: &Rectangle) -> bool {
        !(other.right() < self.left()
            || other.left() > self.right()
            || other.top() < self.bottom()
            || other.bottom() > self.top())
    }

    /// Moves both corners.
    #[inline]
    pub fn offset(&mut self, dx: f64, dy: f64) {
        self.first.offset(dx, dy);
        self.second.offset(dx, dy);
    }

    /// True when both extents are strictly positive and finite.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.first.is_finite()
            && self.second.is_finite()
            && self.width() > 0.0
            && self.height() > 0.0
    }
}
