//! 3D Vector Math
//!
//! Minimal `f32` vector type for steering and placement. The simulation is
//! Y-up: steering only ever writes the horizontal (X/Z) plane, gravity and
//! impulses own the Y component.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Move a scalar toward a target by at most `max_delta`.
///
/// This is the rate limiter used for acceleration-clamped velocity blending:
/// never overshoots, never springs back.
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + max_delta.copysign(delta)
    }
}

/// 3D vector with `f32` components.
#[derive(Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component (up)
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    /// Unit vector pointing up (+Y)
    pub const UP: Self = Self { x: 0.0, y: 1.0, z: 0.0 };

    /// Unit vector along +X
    pub const X: Self = Self { x: 1.0, y: 0.0, z: 0.0 };

    /// Unit vector along +Z
    pub const Z: Self = Self { x: 0.0, y: 0.0, z: 1.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Squared length (prefer this for comparisons).
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Length (magnitude).
    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Projection onto the horizontal (X/Z) plane.
    #[inline]
    pub fn horizontal(self) -> Self {
        Self { x: self.x, y: 0.0, z: self.z }
    }

    /// Horizontal distance to another point, ignoring height difference.
    #[inline]
    pub fn horizontal_distance(self, other: Self) -> f32 {
        (other - self).horizontal().length()
    }

    /// Normalize to unit length. Returns `ZERO` for a zero vector.
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            Self::ZERO
        } else {
            self * (1.0 / len)
        }
    }

    /// Normalize to unit length, falling back when degenerate.
    #[inline]
    pub fn normalize_or(self, fallback: Self) -> Self {
        let len = self.length();
        if len <= f32::EPSILON {
            fallback
        } else {
            self * (1.0 / len)
        }
    }

    /// Move toward `target` by at most `max_delta`, clamped per component.
    #[inline]
    pub fn move_towards(self, target: Self, max_delta: f32) -> Self {
        Self {
            x: move_towards(self.x, target.x, max_delta),
            y: move_towards(self.y, target.y, max_delta),
            z: move_towards(self.z, target.z, max_delta),
        }
    }

    /// Linear interpolation: `t = 0` returns self, `t = 1` returns other.
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    /// Horizontal vector perpendicular to this one (the body's "right" axis
    /// for a given facing). Sign convention does not matter to callers that
    /// pick a random side.
    #[inline]
    pub fn horizontal_right(self) -> Self {
        Self { x: self.z, y: 0.0, z: -self.x }
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Debug for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vec3({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

// =============================================================================
// TESTS
// =============================================================================
