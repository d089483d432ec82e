//! Spatial value objects used when placing instantiated entities.

use serde::{Deserialize, Serialize};
use std::ops::Add;

/// A point or offset in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// Orientation as a unit quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// World placement of an entity node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Rotation,
}

impl Transform {
    /// Placement at `position` with identity orientation.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Rotation::IDENTITY,
        }
    }

    /// This transform moved by a local offset (rotation is not applied to the offset).
    pub fn offset_by(self, offset: Vec3) -> Self {
        Self {
            position: self.position + offset,
            rotation: self.rotation,
        }
    }
}
