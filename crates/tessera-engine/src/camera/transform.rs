use crate::coords::{Point2D, Rectangle};

/// Affine mapping between a world rectangle and a screen rectangle.
///
/// World space is +Y up, screen space is +Y down: the world's top edge maps to
/// the screen's minimum y.
///
/// Invariant: both rectangles have strictly positive width and height.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    world: Rectangle,
    screen: Rectangle,
    initial_world: Rectangle,

    /// Screen pixels per world unit, per axis.
    scale: Point2D,
}

impl Camera {
    /// Creates a camera whose screen initially coincides with `world`.
    ///
    /// The owning canvas replaces the screen rectangle once it knows its pixel
    /// size.
    pub fn new(world: Rectangle) -> Self {
        debug_assert!(world.is_valid(), "Camera::new: degenerate world {world:?}");
        let mut camera = Self {
            world,
            screen: world,
            initial_world: world,
            scale: Point2D::new(1.0, 1.0),
        };
        camera.update_scale_factors();
        camera
    }

    #[inline]
    pub fn world(&self) -> Rectangle {
        self.world
    }

    #[inline]
    pub fn screen(&self) -> Rectangle {
        self.screen
    }

    /// The world rectangle the camera was created with.
    #[inline]
    pub fn initial_world(&self) -> Rectangle {
        self.initial_world
    }

    pub fn update_world(&mut self, world: Rectangle) {
        debug_assert!(world.is_valid(), "Camera::update_world: degenerate world {world:?}");
        self.world = world;
        self.update_scale_factors();
    }

    pub fn update_screen(&mut self, screen: Rectangle) {
        debug_assert!(screen.is_valid(), "Camera::update_screen: degenerate screen {screen:?}");
        self.screen = screen;
        self.update_scale_factors();
    }

    /// Screen pixels per world unit, `(S.width / W.width, S.height / W.height)`.
    #[inline]
    pub fn scale(&self) -> Point2D {
        self.scale
    }

    /// World units per screen pixel.
    ///
    /// Converts device-measured quantities (stroke widths, text extents) back
    /// into world units.
    #[inline]
    pub fn world_scale_factor(&self) -> Point2D {
        Point2D::new(1.0 / self.scale.x, 1.0 / self.scale.y)
    }

    pub fn world_to_screen(&self, world: Point2D) -> Point2D {
        Point2D::new(
            (world.x - self.world.left()) * self.scale.x + self.screen.left(),
            (self.world.top() - world.y) * self.scale.y + self.screen.bottom(),
        )
    }

    pub fn screen_to_world(&self, screen: Point2D) -> Point2D {
        Point2D::new(
            (screen.x - self.screen.left()) / self.scale.x + self.world.left(),
            self.world.top() - (screen.y - self.screen.bottom()) / self.scale.y,
        )
    }

    /// Shifts the world rectangle by `(dx, dy)` world units.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        let mut world = self.world;
        world.offset(dx, dy);
        self.update_world(world);
    }

    /// Scales the world rectangle about `centre` (world units).
    ///
    /// `factor > 1` zooms in; `centre` keeps its screen position.
    pub fn zoom(&mut self, centre: Point2D, factor: f64) {
        debug_assert!(factor > 0.0 && factor.is_finite(), "Camera::zoom: bad factor {factor}");
        let bl = centre + (self.world.bottom_left() - centre) / factor;
        let tr = centre + (self.world.top_right() - centre) / factor;
        self.update_world(Rectangle::new(bl, tr));
    }

    /// Restores the world rectangle the camera was created with.
    pub fn reset_world(&mut self) {
        self.update_world(self.initial_world);
    }

    fn update_scale_factors(&mut self) {
        self.scale = Point2D::new(
            self.screen.width() / self.world.width(),
            self.screen.height() / self.world.height(),
        );
    }
}
