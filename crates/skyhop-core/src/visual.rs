use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Horizontal facing of the actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    None,
    Right,
}

impl Facing {
    pub fn from_dir(dir: i8) -> Self {
        match dir.signum() {
            -1 => Facing::Left,
            1 => Facing::Right,
            _ => Facing::None,
        }
    }

    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::None => 0.0,
            Facing::Right => 1.0,
        }
    }
}

/// Opaque visual state a renderer uses to pick a sprite or colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualTag {
    Actor { impaired: bool, facing: Facing },
    Platform { moving: bool, one_way: bool },
    Collectible,
    Hazard,
}

/// Anything with a rectangle and a visual tag.
pub trait Body {
    fn rect(&self) -> Rect;
    fn visual_tag(&self) -> VisualTag;

    fn drawable(&self) -> Drawable {
        Drawable {
            rect: self.rect(),
            tag: self.visual_tag(),
        }
    }
}

/// One entry of a frame's draw list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub rect: Rect,
    pub tag: VisualTag,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_from_dir() {
        assert_eq!(Facing::from_dir(-3), Facing::Left);
        assert_eq!(Facing::from_dir(0), Facing::None);
        assert_eq!(Facing::from_dir(1), Facing::Right);
        assert_eq!(Facing::Right.sign(), 1.0);
    }
}
