/// A component that represents the "side" or "handedness" that an entity is on
#[derive(Debug, PartialEq, Clone, Copy, Eq, PartialOrd, Ord)]
pub enum Handedness {
    /// Left hand side
    Left,
    /// Right hand side
    Right,
}

/// A component that's added to an entity to represent a tracked VR hand
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    /// Which controller is this hand mapped to?
    pub handedness: Handedness,
}

impl Hand {
    /// Shortcut helper to create a left hand
    pub fn left() -> Hand {
        Hand {
            handedness: Handedness::Left,
        }
    }

    /// Shortcut helper to create a right hand
    pub fn right() -> Hand {
        Hand {
            handedness: Handedness::Right,
        }
    }
}
