//! Terrain components - walls, their collision strips, and fire hazards.

use crate::components::Vec2;

/// The visible wall block. Collision happens against the four
/// [`WallCollider`] strips launched around it, not the block itself.
#[derive(Debug, Clone, Copy)]
pub struct Wall;

/// A thin collision strip along one wall edge. Movers that overlap it are
/// nudged along `normal`; bullets are destroyed on contact.
#[derive(Debug, Clone, Copy)]
pub struct WallCollider {
    /// Outward-facing unit normal of the edge this strip guards.
    pub normal: Vec2,
}

/// A patch of fire. Movers overlapping it receive targeted
/// heat-gain events from the collision resolver.
#[derive(Debug, Clone, Copy)]
pub struct Hazard;
