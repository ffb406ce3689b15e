use glam::{Mat2, Vec2};
use serde::{Deserialize, Serialize};

/// Position and heading of an object in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    /// Heading in radians, counter-clockwise from +X.
    pub rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
        }
    }
}

impl Transform {
    pub fn new(position: Vec2, rotation: f32) -> Self {
        Self { position, rotation }
    }

    /// Unit vector the object is facing.
    pub fn heading(&self) -> Vec2 {
        Vec2::from_angle(self.rotation)
    }

    /// Maps a point from object space into world space.
    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        self.position + Mat2::from_angle(self.rotation) * local
    }
}

/// Linear and angular velocity of an object.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: Vec2,
    /// Radians per second.
    pub angular: f32,
}

/// Mass and scalar moment of inertia about the center of mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    pub mass: f32,
    pub inertia: f32,
}

impl Default for MassProperties {
    fn default() -> Self {
        Self {
            mass: 1.0,
            inertia: 1.0,
        }
    }
}

impl MassProperties {
    /// Solid rectangle of the given full extents, e.g. a car body seen from above.
    pub fn rectangle(mass: f32, width: f32, height: f32) -> Self {
        Self {
            mass,
            inertia: mass * (width * width + height * height) / 12.0,
        }
    }
}
