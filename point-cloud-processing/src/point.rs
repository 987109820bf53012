/// Point record shared by every processing stage
use serde::{Deserialize, Serialize};

/// Per-point colour. A point is either fully coloured or not coloured at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Colour {
    Present {
        r: u8,
        g: u8,
        b: u8,
    },
    #[default]
    Absent,
}

impl Colour {
    /// Build a colour from optional channels.
    /// Any missing channel makes the whole colour absent.
    pub fn from_channels(r: Option<u8>, g: Option<u8>, b: Option<u8>) -> Self {
        match (r, g, b) {
            (Some(r), Some(g), Some(b)) => Colour::Present { r, g, b },
            _ => Colour::Absent,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Colour::Present { .. })
    }

    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        match *self {
            Colour::Present { r, g, b } => Some((r, g, b)),
            Colour::Absent => None,
        }
    }
}

/// A single cloud point. Transforms always produce new points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub colour: Colour,
}

impl Point {
    /// Create an uncoloured point
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            colour: Colour::Absent,
        }
    }

    /// Create a coloured point
    pub fn with_colour(x: f64, y: f64, z: f64, r: u8, g: u8, b: u8) -> Self {
        Self {
            x,
            y,
            z,
            colour: Colour::Present { r, g, b },
        }
    }

    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn has_colour(&self) -> bool {
        self.colour.is_present()
    }

    /// Euclidean distance in the horizontal (x, y) plane
    pub fn horizontal_distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
