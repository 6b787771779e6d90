//! Common components used across multiple entity types.

use serde::{Deserialize, Serialize};

/// 2D vector
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Rotate counterclockwise by an angle in degrees.
    pub fn rotate(&self, degrees: f32) -> Self {
        let radians = degrees.to_radians();
        let (sin, cos) = radians.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// Spatial position component - where an entity is located
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position(pub Vec2);

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

/// Footprint component - full width and height used for overlap tests
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Extent {
    pub w: f32,
    pub h: f32,
}

impl Extent {
    /// Square footprint, the common case for mobile entities.
    pub fn square(size: f32) -> Self {
        Self { w: size, h: size }
    }

    pub fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }
}

/// AABB overlap test between two positioned, sized entities.
///
/// Two entities collide when the gap between centers is strictly smaller
/// than the combined half-widths on both axes.
pub fn collides(a_pos: Vec2, a: Extent, b_pos: Vec2, b: Extent) -> bool {
    (a_pos.x - b_pos.x).abs() < (a.w + b.w) / 2.0 && (a_pos.y - b_pos.y).abs() < (a.h + b.h) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_operations() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);

        let sum = a + b;
        assert_eq!(sum.x, 5.0);
        assert_eq!(sum.y, 8.0);

        let diff = b - a;
        assert_eq!(diff.x, 3.0);

        let scaled = a * 2.0;
        assert_eq!(scaled.x, 2.0);
        assert_eq!(scaled.y, 4.0);

        assert_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn test_vec2_normalize() {
        let v = Vec2::new(3.0, 4.0);
        let n = v.normalize();
        assert!((n.length() - 1.0).abs() < 0.001);
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
    }

    #[test]
    fn test_vec2_rotate() {
        let v = Vec2::new(1.0, 0.0);
        let r = v.rotate(90.0);
        assert!(r.x.abs() < 0.001);
        assert!((r.y - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_collides_overlap_and_gap() {
        let unit = Extent::square(1.0);
        assert!(collides(
            Vec2::new(0.0, 0.0),
            unit,
            Vec2::new(0.9, 0.0),
            unit
        ));
        // Touching edges do not count as overlap.
        assert!(!collides(
            Vec2::new(0.0, 0.0),
            unit,
            Vec2::new(1.0, 0.0),
            unit
        ));
        // Overlap must hold on both axes.
        assert!(!collides(
            Vec2::new(0.0, 0.0),
            unit,
            Vec2::new(0.5, 2.0),
            unit
        ));
    }

    #[test]
    fn test_collides_rectangles() {
        let strip = Extent::new(2.0, 0.5);
        let mover = Extent::square(1.0);
        assert!(collides(
            Vec2::new(0.0, 0.0),
            strip,
            Vec2::new(1.2, 0.5),
            mover
        ));
        assert!(!collides(
            Vec2::new(0.0, 0.0),
            strip,
            Vec2::new(0.0, 1.0),
            mover
        ));
    }
}
