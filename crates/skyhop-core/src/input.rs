use serde::{Deserialize, Serialize};

/// Per-frame input snapshot.
///
/// `left` and `right` are held states. `jump`, `pause` and `restart` mean
/// "pressed during this frame" and are consumed by a single update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub pause: bool,
    pub restart: bool,
}

impl InputSnapshot {
    /// Horizontal intent in `{-1, 0, 1}`. Right wins when both are held.
    pub fn move_dir(&self) -> i8 {
        if self.right {
            1
        } else if self.left {
            -1
        } else {
            0
        }
    }
}
