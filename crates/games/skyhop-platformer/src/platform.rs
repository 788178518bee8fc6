use serde::{Deserialize, Serialize};

use skyhop_core::geometry::{Rect, ScreenBounds};
use skyhop_core::visual::{Body, VisualTag};

/// A static or horizontally oscillating platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub is_moving: bool,
    /// Pixels per step while moving.
    pub speed: f32,
    /// `1.0` (right) or `-1.0` (left).
    pub direction: f32,
    /// One-way platforms can be jumped through from below.
    pub passable_from_below: bool,
}

impl Platform {
    pub fn solid(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            is_moving: false,
            speed: 0.0,
            direction: 1.0,
            passable_from_below: false,
        }
    }

    pub fn one_way(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            passable_from_below: true,
            ..Self::solid(x, y, width, height)
        }
    }

    /// Make this platform oscillate horizontally at `speed` px/step.
    pub fn moving(mut self, speed: f32) -> Self {
        self.is_moving = true;
        self.speed = speed;
        self
    }

    /// Horizontal displacement this platform applies per step.
    pub fn drift(&self) -> f32 {
        if self.is_moving {
            self.speed * self.direction
        } else {
            0.0
        }
    }

    /// Advance one step. Direction flips once an edge leaves the screen.
    pub fn update(&mut self, bounds: &ScreenBounds) {
        if !self.is_moving {
            return;
        }
        self.rect.x += self.speed * self.direction;
        if self.rect.left() < 0.0 || self.rect.right() > bounds.width {
            self.direction = -self.direction;
        }
    }
}

impl Body for Platform {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn visual_tag(&self) -> VisualTag {
        VisualTag::Platform {
            moving: self.is_moving,
            one_way: self.passable_from_below,
        }
    }
}
