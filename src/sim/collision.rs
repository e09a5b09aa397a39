//! Closest-collision queries over registered collidables
//!
//! The index is the broad phase: it walks every registered collidable,
//! intersects the trajectory with each side of its collision rectangle, and
//! keeps the hit nearest the trajectory start. At tens of objects per frame
//! the linear scan is far from being the bottleneck.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Rect, Segment};
use super::velocity::Velocity;

/// Capability shared by everything a ball can bounce off.
///
/// `hit` is the pure velocity policy: given where the ball struck and how
/// fast it was going, produce the outgoing velocity. Gameplay consequences
/// of the hit (scoring, destruction) are decided separately in the event
/// layer, after the velocity is known.
pub trait Collidable {
    /// The rectangle occupied by this object.
    fn collision_rect(&self) -> Rect;

    /// Outgoing velocity for a ball striking at `collision_point`.
    fn hit(&self, collision_point: DVec2, incoming: Velocity) -> Velocity;
}

/// Identity of a registered collidable.
///
/// The index holds ids rather than owned objects; the game state owns the
/// entities and resolves ids back to rectangles at query time. This keeps
/// hit responses free to remove entries mid-frame without invalidating
/// anything the index holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollidableId {
    Block(u32),
    Paddle,
}

/// Result of a closest-collision query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// Exact contact point on the struck side
    pub point: DVec2,
    /// Which collidable was struck
    pub id: CollidableId,
}

/// Registration-ordered set of live collidables.
///
/// Order is part of the contract: when two objects are struck at exactly
/// the same distance, the first registered wins, which keeps runs
/// reproducible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollisionIndex {
    entries: Vec<CollidableId>,
}

impl CollisionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collidable. Callers are expected not to double-register.
    pub fn add(&mut self, id: CollidableId) {
        debug_assert!(!self.entries.contains(&id));
        self.entries.push(id);
    }

    /// Unregister a collidable. Safe to call from a hit response: the next
    /// query simply no longer sees the entry. Removal preserves the
    /// registration order of the survivors.
    pub fn remove(&mut self, id: CollidableId) {
        if let Some(pos) = self.entries.iter().position(|&e| e == id) {
            self.entries.remove(pos);
        }
    }

    pub fn contains(&self, id: CollidableId) -> bool {
        self.entries.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the collision nearest `trajectory.start()` across all entries.
    ///
    /// `rect_of` resolves an id to its current rectangle; returning `None`
    /// (an id whose entity is already gone) skips the entry. Strict `<` on
    /// the running minimum gives the registration-order tie-break.
    pub fn closest_collision<F>(&self, trajectory: &Segment, rect_of: F) -> Option<Collision>
    where
        F: Fn(CollidableId) -> Option<Rect>,
    {
        let mut closest: Option<Collision> = None;
        let mut best = f64::MAX;

        for &id in &self.entries {
            let Some(rect) = rect_of(id) else {
                continue;
            };
            let Some(point) = trajectory.closest_intersection_to_start(&rect) else {
                continue;
            };
            let d = trajectory.start().distance(point);
            if d < best {
                best = d;
                closest = Some(Collision { point, id });
            }
        }

        if let Some(ref c) = closest {
            log::trace!("closest collision with {:?} at {:?}", c.id, c.point);
        }
        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::points_approx_eq;
    use std::collections::HashMap;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(DVec2::new(x, y), w, h).unwrap()
    }

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(DVec2::new(x1, y1), DVec2::new(x2, y2)).unwrap()
    }

    #[test]
    fn test_no_collidables_no_collision() {
        let index = CollisionIndex::new();
        let t = seg(0.0, 0.0, 10.0, 10.0);
        assert!(index.closest_collision(&t, |_| None).is_none());
    }

    #[test]
    fn test_nearest_of_two_blocks_wins() {
        let mut index = CollisionIndex::new();
        index.add(CollidableId::Block(1));
        index.add(CollidableId::Block(2));

        let mut rects = HashMap::new();
        rects.insert(CollidableId::Block(1), rect(40.0, -5.0, 10.0, 10.0));
        rects.insert(CollidableId::Block(2), rect(20.0, -5.0, 10.0, 10.0));

        // Moving right along y=0: block 2's left side at x=20 comes first
        let t = seg(0.0, 0.0, 100.0, 0.0);
        let hit = index
            .closest_collision(&t, |id| rects.get(&id).copied())
            .unwrap();
        assert_eq!(hit.id, CollidableId::Block(2));
        assert!(points_approx_eq(hit.point, DVec2::new(20.0, 0.0)));
    }

    #[test]
    fn test_tie_break_by_registration_order() {
        let mut index = CollisionIndex::new();
        index.add(CollidableId::Block(7));
        index.add(CollidableId::Block(8));

        // Both blocks present the same left edge at x=20
        let mut rects = HashMap::new();
        rects.insert(CollidableId::Block(7), rect(20.0, -5.0, 10.0, 10.0));
        rects.insert(CollidableId::Block(8), rect(20.0, -5.0, 10.0, 10.0));

        let t = seg(0.0, 0.0, 100.0, 0.0);
        let hit = index
            .closest_collision(&t, |id| rects.get(&id).copied())
            .unwrap();
        assert_eq!(hit.id, CollidableId::Block(7));
    }

    #[test]
    fn test_removed_entry_not_reported() {
        let mut index = CollisionIndex::new();
        index.add(CollidableId::Block(1));
        index.add(CollidableId::Block(2));

        let mut rects = HashMap::new();
        rects.insert(CollidableId::Block(1), rect(20.0, -5.0, 10.0, 10.0));
        rects.insert(CollidableId::Block(2), rect(40.0, -5.0, 10.0, 10.0));

        index.remove(CollidableId::Block(1));

        let t = seg(0.0, 0.0, 100.0, 0.0);
        let hit = index
            .closest_collision(&t, |id| rects.get(&id).copied())
            .unwrap();
        assert_eq!(hit.id, CollidableId::Block(2));
        assert!(!index.contains(CollidableId::Block(1)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_trajectory_clear_of_everything() {
        let mut index = CollisionIndex::new();
        index.add(CollidableId::Block(1));

        let t = seg(0.0, 0.0, 5.0, 5.0);
        let hit = index.closest_collision(&t, |_| Some(rect(100.0, 100.0, 10.0, 10.0)));
        assert!(hit.is_none());
    }

    #[test]
    fn test_stale_id_skipped() {
        // Entity already gone from the world but still registered:
        // resolver returns None and the entry is ignored.
        let mut index = CollisionIndex::new();
        index.add(CollidableId::Block(9));
        let t = seg(0.0, 0.0, 100.0, 0.0);
        assert!(index.closest_collision(&t, |_| None).is_none());
    }
}
