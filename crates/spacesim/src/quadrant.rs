//! Axis-aligned square regions used to key the Barnes-Hut quadtree.

use nalgebra::{Point2, Vector2};

/// An immutable axis-aligned square region of the simulation plane.
///
/// A quadrant is described by its center and side length (meters). Its four
/// sub-quadrants are pure functions of the parent: each has half the side
/// length and a center shifted by a quarter side along both axes.
///
/// ```text
/// +-------+-------+
/// |  NW   |  NE   |
/// +-------+-------+
/// |  SW   |  SE   |
/// +-------+-------+
/// ```
///
/// # Examples
///
/// ```rust
/// use nalgebra::Point2;
/// use spacesim::quadrant::Quadrant;
///
/// let quad = Quadrant::new(Point2::origin(), 4.0);
/// assert!(quad.contains(&Point2::new(2.0, -2.0))); // bounds are inclusive
///
/// let [nw, ne, sw, se] = quad.subdivide();
/// assert_eq!(nw.center(), Point2::new(-1.0, 1.0));
/// assert_eq!(se.side(), 2.0);
/// # let _ = (ne, sw);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quadrant {
    center: Point2<f64>,
    side: f64,
}

impl Quadrant {
    /// Creates a quadrant from its center and side length.
    ///
    /// The side is expected to be strictly positive. Degenerate quadrants are
    /// not special-cased here; callers building trees must avoid them.
    pub fn new(center: Point2<f64>, side: f64) -> Self {
        debug_assert!(side >= 0.0, "quadrant side must not be negative");
        Self { center, side }
    }

    /// Creates a quadrant centered at the origin with the given side length.
    pub fn centered_at_origin(side: f64) -> Self {
        Self::new(Point2::origin(), side)
    }

    pub fn center(&self) -> Point2<f64> {
        self.center
    }

    pub fn side(&self) -> f64 {
        self.side
    }

    pub fn min_x(&self) -> f64 {
        self.center.x - self.side / 2.0
    }

    pub fn max_x(&self) -> f64 {
        self.center.x + self.side / 2.0
    }

    pub fn min_y(&self) -> f64 {
        self.center.y - self.side / 2.0
    }

    pub fn max_y(&self) -> f64 {
        self.center.y + self.side / 2.0
    }

    /// Inclusive containment test on both axes.
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        point.x >= self.min_x()
            && point.x <= self.max_x()
            && point.y >= self.min_y()
            && point.y <= self.max_y()
    }

    /// North-west sub-quadrant.
    pub fn nw(&self) -> Self {
        self.offset_child(-1.0, 1.0)
    }

    /// North-east sub-quadrant.
    pub fn ne(&self) -> Self {
        self.offset_child(1.0, 1.0)
    }

    /// South-west sub-quadrant.
    pub fn sw(&self) -> Self {
        self.offset_child(-1.0, -1.0)
    }

    /// South-east sub-quadrant.
    pub fn se(&self) -> Self {
        self.offset_child(1.0, -1.0)
    }

    /// All four sub-quadrants in `[NW, NE, SW, SE]` order.
    pub fn subdivide(&self) -> [Self; 4] {
        [self.nw(), self.ne(), self.sw(), self.se()]
    }

    /// Returns the index (in `[NW, NE, SW, SE]` order) of the first
    /// sub-quadrant containing `point`.
    ///
    /// Points on a shared edge belong to the first matching child. Returns
    /// `None` when no child contains the point, which can only happen for
    /// points outside this quadrant or through rounding on the outer edge.
    pub fn child_index(&self, point: &Point2<f64>) -> Option<usize> {
        self.subdivide()
            .iter()
            .position(|child| child.contains(point))
    }

    fn offset_child(&self, sx: f64, sy: f64) -> Self {
        let quarter = self.side / 4.0;
        Self {
            center: self.center + Vector2::new(sx * quarter, sy * quarter),
            side: self.side / 2.0,
        }
    }
}
