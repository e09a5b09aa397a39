//! Breakline - a paddle-and-blocks arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, collision detection, game state)
//! - `config`: Data-driven board layout and tuning
//! - `render`: Drawing contract consumed by external renderers
//!
//! The interesting part lives in `sim`: per tick every ball traces a
//! trajectory segment and the collision index finds the first solid surface
//! it would cross, so fast balls cannot tunnel through thin blocks.

pub mod config;
pub mod render;
pub mod sim;

pub use config::GameConfig;
pub use render::{NullSurface, Surface};

/// Game configuration constants
pub mod consts {
    /// Tolerance for all geometric floating-point comparisons.
    ///
    /// Every predicate in the crate compares through this one constant;
    /// changing it recalibrates all boundary tests together.
    pub const EPSILON: f64 = 1e-4;

    /// Play field dimensions (pixels)
    pub const SCREEN_WIDTH: f64 = 800.0;
    pub const SCREEN_HEIGHT: f64 = 620.0;
    /// Thickness of the frame walls around the field
    pub const FRAME_SIZE: f64 = 25.0;

    /// Ball defaults
    pub const BALL_COUNT: u32 = 3;
    pub const BALL_RADIUS: f64 = 10.0;
    pub const BALL_SPEED: f64 = 3.5;

    /// Block grid defaults
    pub const BLOCK_WIDTH: f64 = 50.0;
    pub const BLOCK_HEIGHT: f64 = 25.0;
    pub const BLOCK_ROWS: u32 = 6;
    /// Top row width; each row below it is one block shorter
    pub const BLOCKS_IN_TOP_ROW: u32 = 12;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f64 = 100.0;
    pub const PADDLE_HEIGHT: f64 = 20.0;
    pub const PADDLE_SPEED: f64 = 5.0;

    /// Fraction of the new velocity applied after a collision response.
    ///
    /// Deliberately less than 1.0: the ball stops just short of where a full
    /// step would land so the next tick's trajectory starts clear of the
    /// surface it just bounced off. Calibration constant, not physics.
    pub const POST_HIT_ADVANCE: f64 = 0.9;

    /// Target frame rate for the paced demo loop
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Score awarded per destroyed block
    pub const BLOCK_SCORE: i32 = 5;
    /// Bonus awarded for clearing the whole board
    pub const CLEAR_BONUS: i32 = 100;
}

/// Compare two floats within the global [`consts::EPSILON`] tolerance.
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < consts::EPSILON
}
