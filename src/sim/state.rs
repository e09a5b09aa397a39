//! Game entities and the state container that owns them
//!
//! `GameState` owns every entity plus the collision index and the sprite
//! list. Both collections are registration-ordered; the index's tie-break
//! and the tick's update order depend on that.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::EPSILON;

use super::collision::{Collidable, CollidableId, CollisionIndex};
use super::events::{HitListenerKind, ListenerId};
use super::geometry::{GeometryError, Rect};
use super::velocity::Velocity;

/// Palette for blocks and balls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockColor {
    Gray,
    Red,
    Yellow,
    Blue,
    Pink,
    Green,
    Orange,
}

impl BlockColor {
    /// Row colors for the board layout, cycled top to bottom.
    pub const ROW_PALETTE: [Self; 6] = [
        Self::Gray,
        Self::Red,
        Self::Yellow,
        Self::Blue,
        Self::Pink,
        Self::Green,
    ];
}

/// Signed tally used for remaining blocks, remaining balls, and score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    value: i32,
}

impl Counter {
    pub fn new(value: i32) -> Self {
        Self { value }
    }

    pub fn increase(&mut self, amount: i32) {
        self.value += amount;
    }

    pub fn decrease(&mut self, amount: i32) {
        self.value -= amount;
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

/// A stationary rectangle the ball bounces off.
///
/// Frame walls and grid blocks are the same type; walls just carry
/// `destructible: false` so no hit ever removes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    rect: Rect,
    pub color: BlockColor,
    pub destructible: bool,
    listeners: Vec<ListenerId>,
}

impl Block {
    pub fn new(id: u32, rect: Rect, color: BlockColor, destructible: bool) -> Self {
        Self {
            id,
            rect,
            color,
            destructible,
            listeners: Vec::new(),
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn add_hit_listener(&mut self, listener: ListenerId) {
        self.listeners.push(listener);
    }

    pub fn remove_hit_listener(&mut self, listener: ListenerId) {
        self.listeners.retain(|&l| l != listener);
    }

    /// Copy of the listener list, taken before dispatch so listeners may
    /// unregister themselves mid-notification.
    pub fn listener_snapshot(&self) -> Vec<ListenerId> {
        self.listeners.clone()
    }
}

impl Collidable for Block {
    fn collision_rect(&self) -> Rect {
        self.rect
    }

    /// Side test against the contact point. A corner contact lies on two
    /// perpendicular sides and negates both components, reversing the ball.
    fn hit(&self, collision_point: DVec2, incoming: Velocity) -> Velocity {
        let mut v = incoming;
        if self.rect.left_side().contains_point(collision_point)
            || self.rect.right_side().contains_point(collision_point)
        {
            v = Velocity::new(-v.dx, v.dy);
        }
        if self.rect.top_side().contains_point(collision_point)
            || self.rect.bottom_side().contains_point(collision_point)
        {
            v = Velocity::new(v.dx, -v.dy);
        }
        v
    }
}

/// The player's bat. Moves horizontally, wraps around the field edges,
/// and rebounds balls at an angle chosen by where they land on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    rect: Rect,
    speed: f64,
    /// Horizontal extent the paddle may occupy, inner edges of the walls.
    left_bound: f64,
    right_bound: f64,
}

impl Paddle {
    pub fn new(config: &GameConfig) -> Result<Self, GeometryError> {
        let x = (config.screen_width - config.paddle_width) / 2.0;
        let y = config.screen_height - 2.0 * config.paddle_height;
        let rect = Rect::new(
            DVec2::new(x, y),
            config.paddle_width,
            config.paddle_height,
        )?;
        Ok(Self {
            rect,
            speed: config.paddle_speed,
            left_bound: config.frame_size,
            right_bound: config.screen_width - config.frame_size,
        })
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// One step left; sliding past the left wall re-enters from the right.
    pub fn move_left(&mut self) {
        let mut x = self.rect.upper_left().x - self.speed;
        if x < self.left_bound {
            x = self.right_bound - self.rect.width();
        }
        self.rect = self
            .rect
            .with_upper_left(DVec2::new(x, self.rect.upper_left().y));
    }

    /// One step right; sliding past the right wall re-enters from the left.
    pub fn move_right(&mut self) {
        let mut x = self.rect.upper_left().x + self.speed;
        if x > self.right_bound - self.rect.width() {
            x = self.left_bound;
        }
        self.rect = self
            .rect
            .with_upper_left(DVec2::new(x, self.rect.upper_left().y));
    }
}

impl Collidable for Paddle {
    fn collision_rect(&self) -> Rect {
        self.rect
    }

    /// Five equal regions across the paddle's width steer the rebound:
    /// outer regions deflect steeply (300° and 60°), inner regions gently
    /// (330° and 30°), and the middle mirrors the vertical component like a
    /// plain block. Boundary comparisons are inclusive toward the lower
    /// region, so a contact exactly on a seam resolves deterministically.
    fn hit(&self, collision_point: DVec2, incoming: Velocity) -> Velocity {
        let region = self.rect.width() / 5.0;
        let offset = collision_point.x - self.rect.upper_left().x;
        let speed = incoming.speed();

        let angle_deg: f64 = if offset < region + EPSILON {
            300.0
        } else if offset < 2.0 * region + EPSILON {
            330.0
        } else if offset < 3.0 * region + EPSILON {
            return Velocity::new(incoming.dx, -incoming.dy);
        } else if offset < 4.0 * region + EPSILON {
            30.0
        } else {
            60.0
        };
        Velocity::from_angle_speed(angle_deg.to_radians(), speed)
    }
}

/// A moving ball. Created at rest; the launch velocity is assigned once
/// during setup and thereafter only hit responses change it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub center: DVec2,
    pub radius: f64,
    pub color: BlockColor,
    pub velocity: Velocity,
    listeners: Vec<ListenerId>,
}

impl Ball {
    pub fn new(id: u32, center: DVec2, radius: f64, color: BlockColor) -> Self {
        Self {
            id,
            center,
            radius,
            color,
            velocity: Velocity::default(),
            listeners: Vec::new(),
        }
    }

    pub fn add_hit_listener(&mut self, listener: ListenerId) {
        self.listeners.push(listener);
    }

    pub fn remove_hit_listener(&mut self, listener: ListenerId) {
        self.listeners.retain(|&l| l != listener);
    }

    pub fn listener_snapshot(&self) -> Vec<ListenerId> {
        self.listeners.clone()
    }
}

/// Everything that gets drawn, in draw (and update) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteId {
    Block(u32),
    Ball(u32),
    Paddle,
    ScoreBoard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Running,
    Won,
    Lost,
}

/// Owner of all entities plus the registration-ordered index and sprite
/// list. Ids stay stable for an entity's whole life, so removing one
/// entity never invalidates references to another.
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub paddle: Paddle,
    pub blocks: Vec<Block>,
    pub balls: Vec<Ball>,
    pub index: CollisionIndex,
    pub sprites: Vec<SpriteId>,
    pub status: GameStatus,
    pub block_counter: Counter,
    pub ball_counter: Counter,
    pub score: Counter,
    listeners: Vec<(ListenerId, HitListenerKind)>,
    next_block_id: u32,
    next_ball_id: u32,
    next_listener_id: ListenerId,
}

impl GameState {
    /// A field with only the paddle built (not yet registered). Used by
    /// `new` and by tests that compose their own boards.
    pub fn empty(config: &GameConfig) -> Result<Self, GeometryError> {
        Ok(Self {
            config: config.clone(),
            paddle: Paddle::new(config)?,
            blocks: Vec::new(),
            balls: Vec::new(),
            index: CollisionIndex::new(),
            sprites: Vec::new(),
            status: GameStatus::Running,
            block_counter: Counter::default(),
            ball_counter: Counter::default(),
            score: Counter::default(),
            listeners: Vec::new(),
            next_block_id: 0,
            next_ball_id: 0,
            next_listener_id: 0,
        })
    }

    /// The full board: frame walls with a death region below the open
    /// bottom edge, the staircase block grid, the paddle, and the balls,
    /// with removal and scoring listeners wired up.
    pub fn new(config: &GameConfig) -> Result<Self, GeometryError> {
        let mut state = Self::empty(config)?;
        let w = config.screen_width;
        let h = config.screen_height;
        let f = config.frame_size;

        // Walls first so they win distance ties against everything else.
        // The wall below the open bottom edge is the death region.
        let death_region = state.add_wall(Rect::new(DVec2::new(0.0, h + f), w, f)?);
        state.add_wall(Rect::new(DVec2::new(0.0, f), w, f)?);
        state.add_wall(Rect::new(DVec2::new(0.0, f), f, h - f)?);
        state.add_wall(Rect::new(DVec2::new(w - f, f), f, h - f)?);

        // Staircase grid, anchored to the right wall: each row is one
        // block shorter than the row above it.
        let mut grid_ids = Vec::new();
        for row in 0..config.block_rows {
            let color = BlockColor::ROW_PALETTE[row as usize % BlockColor::ROW_PALETTE.len()];
            let y = h / 4.0 + row as f64 * config.block_height;
            let in_row = config.blocks_in_top_row.saturating_sub(row);
            for col in 0..in_row {
                let x = w - f - (col + 1) as f64 * config.block_width;
                let rect = Rect::new(DVec2::new(x, y), config.block_width, config.block_height)?;
                grid_ids.push(state.add_block(rect, color));
            }
        }

        state.register_paddle();

        let mut ball_ids = Vec::new();
        for i in 0..config.ball_count {
            let center = DVec2::new(w / 2.0, h - 7.0 * f);
            let id = state.add_ball(center, config.ball_radius, BlockColor::Orange);
            let angle_deg = i as f64 * 60.0 - 60.0;
            if let Some(ball) = state.ball_mut(id) {
                ball.velocity =
                    Velocity::from_angle_speed(angle_deg.to_radians(), config.ball_speed);
            }
            ball_ids.push(id);
        }

        let block_remover = state.register_listener(HitListenerKind::BlockRemover);
        for &id in &grid_ids {
            if let Some(block) = state.block_mut(id) {
                block.add_hit_listener(block_remover);
            }
        }

        let ball_remover = state.register_listener(HitListenerKind::BallRemover { death_region });
        let score_tracker = state.register_listener(HitListenerKind::ScoreTracker);
        for &id in &ball_ids {
            if let Some(ball) = state.ball_mut(id) {
                ball.add_hit_listener(ball_remover);
                ball.add_hit_listener(score_tracker);
            }
        }

        state.sprites.push(SpriteId::ScoreBoard);

        log::info!(
            "board ready: {} blocks, {} balls",
            state.block_counter.value(),
            state.ball_counter.value()
        );
        Ok(state)
    }

    /// Register an indestructible gray block that counts toward nothing.
    pub fn add_wall(&mut self, rect: Rect) -> u32 {
        self.insert_block(rect, BlockColor::Gray, false)
    }

    /// Register a destructible grid block; it counts toward the win check.
    pub fn add_block(&mut self, rect: Rect, color: BlockColor) -> u32 {
        let id = self.insert_block(rect, color, true);
        self.block_counter.increase(1);
        id
    }

    fn insert_block(&mut self, rect: Rect, color: BlockColor, destructible: bool) -> u32 {
        let id = self.next_block_id;
        self.next_block_id += 1;
        self.blocks.push(Block::new(id, rect, color, destructible));
        self.index.add(CollidableId::Block(id));
        self.sprites.push(SpriteId::Block(id));
        id
    }

    /// Register a ball; it counts toward the loss check.
    pub fn add_ball(&mut self, center: DVec2, radius: f64, color: BlockColor) -> u32 {
        let id = self.next_ball_id;
        self.next_ball_id += 1;
        self.balls.push(Ball::new(id, center, radius, color));
        self.sprites.push(SpriteId::Ball(id));
        self.ball_counter.increase(1);
        id
    }

    /// Put the paddle into the index and the sprite list.
    pub fn register_paddle(&mut self) {
        self.index.add(CollidableId::Paddle);
        self.sprites.push(SpriteId::Paddle);
    }

    pub fn register_listener(&mut self, kind: HitListenerKind) -> ListenerId {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, kind));
        id
    }

    pub fn listener_kind(&self, listener: ListenerId) -> Option<HitListenerKind> {
        self.listeners
            .iter()
            .find(|&&(id, _)| id == listener)
            .map(|&(_, kind)| kind)
    }

    pub fn block(&self, id: u32) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn block_mut(&mut self, id: u32) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    pub fn ball(&self, id: u32) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn ball_mut(&mut self, id: u32) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    /// Resolve a collidable id to its current rectangle. `None` for ids
    /// whose entity has already been removed this frame.
    pub fn rect_of(&self, id: CollidableId) -> Option<Rect> {
        match id {
            CollidableId::Block(block_id) => self.block(block_id).map(Block::collision_rect),
            CollidableId::Paddle => Some(self.paddle.collision_rect()),
        }
    }

    /// Drop a block from the world, the index, and the sprite list.
    /// Returns false if it was already gone.
    pub fn remove_block(&mut self, id: u32) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.id != id);
        if self.blocks.len() == before {
            return false;
        }
        self.index.remove(CollidableId::Block(id));
        self.sprites.retain(|&s| s != SpriteId::Block(id));
        true
    }

    /// Drop a ball from the world and the sprite list. Returns false if it
    /// was already gone.
    pub fn remove_ball(&mut self, id: u32) -> bool {
        let before = self.balls.len();
        self.balls.retain(|b| b.id != id);
        if self.balls.len() == before {
            return false;
        }
        self.sprites.retain(|&s| s != SpriteId::Ball(id));
        true
    }
}
