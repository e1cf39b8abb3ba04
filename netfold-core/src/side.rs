/// The six sides of an axis-aligned cube
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;

/// Integer unit direction, used where exact comparison matters.
pub type Direction = [i8; 3];

/// One side of a cube centred on the origin, named as seen from a viewer on +z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CubeSide {
    Front,
    Back,
    Right,
    Left,
    Top,
    Bottom,
}

impl CubeSide {
    pub const ALL: [CubeSide; 6] = [
        CubeSide::Front,
        CubeSide::Back,
        CubeSide::Right,
        CubeSide::Left,
        CubeSide::Top,
        CubeSide::Bottom,
    ];

    pub fn direction(self) -> Direction {
        match self {
            CubeSide::Front => [0, 0, 1],
            CubeSide::Back => [0, 0, -1],
            CubeSide::Right => [1, 0, 0],
            CubeSide::Left => [-1, 0, 0],
            CubeSide::Top => [0, 1, 0],
            CubeSide::Bottom => [0, -1, 0],
        }
    }

    pub fn from_direction(direction: Direction) -> Option<CubeSide> {
        CubeSide::ALL
            .into_iter()
            .find(|side| side.direction() == direction)
    }

    pub fn normal(self) -> Vector3<f32> {
        let [x, y, z] = self.direction();
        Vector3::new(f32::from(x), f32::from(y), f32::from(z))
    }

    /// Euler rotation that turns a +z-facing panel onto this side.
    pub fn rotation(self) -> Vector3<f32> {
        match self {
            CubeSide::Front => Vector3::new(0.0, 0.0, 0.0),
            CubeSide::Back => Vector3::new(0.0, PI, 0.0),
            CubeSide::Right => Vector3::new(0.0, FRAC_PI_2, 0.0),
            CubeSide::Left => Vector3::new(0.0, -FRAC_PI_2, 0.0),
            CubeSide::Top => Vector3::new(-FRAC_PI_2, 0.0, 0.0),
            CubeSide::Bottom => Vector3::new(FRAC_PI_2, 0.0, 0.0),
        }
    }

    pub fn opposite(self) -> CubeSide {
        match self {
            CubeSide::Front => CubeSide::Back,
            CubeSide::Back => CubeSide::Front,
            CubeSide::Right => CubeSide::Left,
            CubeSide::Left => CubeSide::Right,
            CubeSide::Top => CubeSide::Bottom,
            CubeSide::Bottom => CubeSide::Top,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CubeSide::Front => "Front",
            CubeSide::Back => "Back",
            CubeSide::Right => "Right",
            CubeSide::Left => "Left",
            CubeSide::Top => "Top",
            CubeSide::Bottom => "Bottom",
        }
    }
}

impl fmt::Display for CubeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
