//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick = one frame, no wall-clock dependence
//! - Stable iteration order (registration order everywhere)
//! - No rendering or platform dependencies
//!
//! Determinism matters beyond reproducible tests: the closest-collision
//! query breaks distance ties by registration order, so reordering any
//! collection changes gameplay.

pub mod collision;
pub mod events;
pub mod geometry;
pub mod state;
pub mod tick;
pub mod velocity;

pub use collision::{Collidable, CollidableId, Collision, CollisionIndex};
pub use events::{HitEvent, HitListenerKind, ListenerId};
pub use geometry::{GeometryError, Rect, Segment, points_approx_eq};
pub use state::{Ball, Block, BlockColor, Counter, GameState, GameStatus, Paddle, SpriteId};
pub use tick::{TickInput, tick};
pub use velocity::Velocity;
