//! Play-space bounds and per-level terrain placement.

use hecs::World;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{Extent, Hazard, Position, Vec2, Wall, WallCollider};
use crate::config::waves;

/// Full width/height of a wall block.
const WALL_SIZE: f32 = 2.0;
/// Thickness of the collision strip along each wall edge.
const STRIP_THICKNESS: f32 = 0.5;
/// Terrain never lands closer to the player than this.
const PLACEMENT_CLEARANCE: f32 = 4.0;
/// Candidate points drawn per terrain piece before placement gives up.
const CANDIDATE_FACTOR: u32 = 4;

/// The rectangle enemies and spawns are confined to. Grows with level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlaySpace {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl PlaySpace {
    pub fn for_level(level: u32) -> Self {
        let half = waves::BOUNDS_BASE + waves::BOUNDS_SCALAR * level as f32;
        Self {
            top: half,
            right: half,
            bottom: -half,
            left: -half,
        }
    }

    /// Whether `position` lies on or beyond any edge. Strictly interior
    /// points are inside; an edge itself counts as outside.
    pub fn outside(&self, position: Vec2) -> bool {
        let x_out = self.left >= position.x || position.x >= self.right;
        let y_out = self.bottom >= position.y || position.y >= self.top;
        x_out || y_out
    }

    pub fn random_point(&self, rng: &mut impl Rng) -> Vec2 {
        Vec2::new(
            rng.gen_range(self.left..self.right),
            rng.gen_range(self.bottom..self.top),
        )
    }
}

/// Place the walls and hazards for a level.
///
/// Candidate points come from a finite draw; points too close to the
/// player are rejected, and running out of candidates simply ends
/// placement for that terrain kind - that is normal termination, not an
/// error.
pub fn populate_level(world: &mut World, level: u32, player_pos: Vec2, rng: &mut impl Rng) {
    let bounds = PlaySpace::for_level(level);

    let wall_count = level * waves::WALL_SPAWN_STEP_COUNT;
    for origin in placement_candidates(&bounds, player_pos, wall_count, rng) {
        spawn_wall(world, origin);
    }

    if level >= waves::HAZARD_MIN_LEVEL {
        let hazard_count = level - waves::HAZARD_MIN_LEVEL + 1;
        for origin in placement_candidates(&bounds, player_pos, hazard_count, rng) {
            let _ = world.spawn((
                Hazard,
                Position(origin),
                Extent::square(crate::config::fire::HAZARD_SIZE),
            ));
        }
    }
}

/// Up to `count` placement points with clearance from the player.
fn placement_candidates(
    bounds: &PlaySpace,
    player_pos: Vec2,
    count: u32,
    rng: &mut impl Rng,
) -> Vec<Vec2> {
    (0..count * CANDIDATE_FACTOR)
        .map(|_| bounds.random_point(rng))
        .filter(|p| p.distance(&player_pos) > PLACEMENT_CLEARANCE)
        .take(count as usize)
        .collect()
}

/// Spawn a wall block plus the four collision strips along its edges,
/// each carrying the outward normal of the edge it guards.
pub fn spawn_wall(world: &mut World, center: Vec2) {
    let _ = world.spawn((Wall, Position(center), Extent::square(WALL_SIZE)));

    let offset = (WALL_SIZE - STRIP_THICKNESS) / 2.0;
    let normals = [
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(-1.0, 0.0),
        Vec2::new(0.0, -1.0),
    ];
    for normal in normals {
        let vertical = normal.x == 0.0;
        let extent = if vertical {
            Extent::new(WALL_SIZE, STRIP_THICKNESS)
        } else {
            Extent::new(STRIP_THICKNESS, WALL_SIZE)
        };
        let _ = world.spawn((
            WallCollider { normal },
            Position(center + normal * offset),
            extent,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_outside_limit() {
        let bounds = PlaySpace {
            top: 1.0,
            right: 1.0,
            bottom: -1.0,
            left: -1.0,
        };
        assert!(!bounds.outside(Vec2::new(0.0, 0.0)));
        // On an edge counts as outside.
        assert!(bounds.outside(Vec2::new(-1.0, 1.0)));
        assert!(bounds.outside(Vec2::new(-2.0, 2.0)));
    }

    #[test]
    fn test_bounds_scale_with_level() {
        let one = PlaySpace::for_level(1);
        let five = PlaySpace::for_level(5);
        assert_eq!(one.top, 13.0);
        assert_eq!(five.top, 25.0);
        assert_eq!(one.left, -13.0);
    }

    #[test]
    fn test_random_point_inside() {
        let bounds = PlaySpace::for_level(1);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(!bounds.outside(bounds.random_point(&mut rng)));
        }
    }

    #[test]
    fn test_wall_spawns_four_strips() {
        let mut world = World::new();
        spawn_wall(&mut world, Vec2::new(3.0, 3.0));

        assert_eq!(world.query::<&Wall>().iter().count(), 1);
        let strips: Vec<_> = world
            .query::<(&WallCollider, &Position)>()
            .iter()
            .map(|(_, (c, p))| (c.normal, p.0))
            .collect();
        assert_eq!(strips.len(), 4);
        // The top strip's upper edge lines up with the wall's upper edge.
        let top = strips
            .iter()
            .find(|(n, _)| n.y > 0.0)
            .expect("top strip present");
        assert!((top.1.y + STRIP_THICKNESS / 2.0 - (3.0 + WALL_SIZE / 2.0)).abs() < 1e-6);
    }

    #[test]
    fn test_hazards_only_past_min_level() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut world = World::new();
        populate_level(&mut world, 1, Vec2::ZERO, &mut rng);
        assert_eq!(world.query::<&Hazard>().iter().count(), 0);

        let mut world = World::new();
        populate_level(&mut world, waves::HAZARD_MIN_LEVEL, Vec2::ZERO, &mut rng);
        assert!(world.query::<&Hazard>().iter().count() >= 1);
    }

    #[test]
    fn test_placement_respects_clearance() {
        let mut rng = SmallRng::seed_from_u64(3);
        let bounds = PlaySpace::for_level(1);
        let player = Vec2::new(2.0, -2.0);
        for point in placement_candidates(&bounds, player, 20, &mut rng) {
            assert!(point.distance(&player) > PLACEMENT_CLEARANCE);
        }
    }
}
