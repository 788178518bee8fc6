use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in screen pixels. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle of the given size centred on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Same size, shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Strict AABB overlap. Rectangles that only share an edge do not intersect,
    /// so an actor resting on a platform top is not "inside" it.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Whether the horizontal extents overlap (strictly).
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }
}

/// Free-function form of [`Rect::intersects`].
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

/// Fixed screen bounds the simulation is constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenBounds {
    pub width: f32,
    pub height: f32,
}

impl ScreenBounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether `rect` lies fully inside the screen.
    pub fn contains(&self, rect: &Rect) -> bool {
        rect.left() >= 0.0
            && rect.top() >= 0.0
            && rect.right() <= self.width
            && rect.bottom() <= self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.center_x(), 25.0);
        assert_eq!(r.center_y(), 40.0);
    }

    #[test]
    fn overlapping_rects_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(intersects(&b, &a));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        let beside = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&below), "shared bottom edge is not overlap");
        assert!(!a.intersects(&beside), "shared right edge is not overlap");
    }

    #[test]
    fn disjoint_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(50.0, 50.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn centered_rect_places_center() {
        let r = Rect::centered(100.0, 50.0, 20.0, 20.0);
        assert_eq!(r.x, 90.0);
        assert_eq!(r.y, 40.0);
        assert_eq!(r.center_x(), 100.0);
    }

    #[test]
    fn screen_contains() {
        let screen = ScreenBounds::new(800.0, 600.0);
        assert!(screen.contains(&Rect::new(0.0, 0.0, 800.0, 600.0)));
        assert!(!screen.contains(&Rect::new(-1.0, 0.0, 10.0, 10.0)));
        assert!(!screen.contains(&Rect::new(795.0, 0.0, 10.0, 10.0)));
    }
}
