use core::ops::{Add, Div, Mul, Neg, Sub};

/// 2D point (or displacement) in world or screen units.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Moves the point in place.
    #[inline]
    pub fn offset(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point2D {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Point2D {
    type Output = Point2D;
    #[inline]
    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Point2D;
    #[inline]
    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point2D {
    type Output = Point2D;
    #[inline]
    fn neg(self) -> Point2D {
        Point2D::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Point2D;
    #[inline]
    fn mul(self, rhs: f64) -> Point2D {
        Point2D::new(self.x * rhs, self.y * rhs)
    }
}

/// Component-wise product, used to apply per-axis scale factors.
impl Mul<Point2D> for Point2D {
    type Output = Point2D;
    #[inline]
    fn mul(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Div<f64> for Point2D {
    type Output = Point2D;
    #[inline]
    fn div(self, rhs: f64) -> Point2D {
        Point2D::new(self.x / rhs, self.y / rhs)
    }
}
