//! Headless demo binary
//!
//! Runs a full game at a fixed frame rate with a simple autopilot on the
//! paddle, logging progress until the board is cleared or every ball is
//! lost. Pass a JSON config path as the first argument to reshape the
//! board.

use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use breakline::consts::FRAMES_PER_SECOND;
use breakline::render::{NullSurface, draw_all};
use breakline::sim::{GameState, GameStatus, TickInput, tick};
use breakline::GameConfig;

fn main() -> ExitCode {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match GameConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };

    let mut state = match GameState::new(&config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("cannot build board: {e}");
            return ExitCode::FAILURE;
        }
    };

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    log::info!("autopilot seed: {seed}");
    let mut autopilot = Autopilot::new(seed);

    let frame_budget = Duration::from_millis(1000 / FRAMES_PER_SECOND as u64);
    let mut surface = NullSurface;
    let mut frames: u64 = 0;

    while state.status == GameStatus::Running {
        let frame_start = Instant::now();

        let input = autopilot.decide(&state);
        tick(&mut state, input);
        draw_all(&state, &mut surface);
        frames += 1;

        if frames % (10 * FRAMES_PER_SECOND as u64) == 0 {
            log::info!(
                "frame {frames}: score {}, {} blocks and {} balls left",
                state.score.value(),
                state.block_counter.value(),
                state.ball_counter.value()
            );
        }

        // Sleep off whatever is left of the frame budget
        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            std::thread::sleep(frame_budget - elapsed);
        }
    }

    match state.status {
        GameStatus::Won => log::info!(
            "board cleared in {frames} frames, score {}",
            state.score.value()
        ),
        GameStatus::Lost => log::info!(
            "all balls lost after {frames} frames, score {}",
            state.score.value()
        ),
        GameStatus::Running => unreachable!(),
    }
    ExitCode::SUCCESS
}

/// Chases the ball closest to the bottom of the field, with a little
/// jitter so demo runs differ.
struct Autopilot {
    rng: Pcg32,
    jitter: f64,
    frames_until_rejitter: u32,
}

impl Autopilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            jitter: 0.0,
            frames_until_rejitter: 0,
        }
    }

    fn decide(&mut self, state: &GameState) -> TickInput {
        if self.frames_until_rejitter == 0 {
            self.jitter = self.rng.random_range(-15.0..=15.0);
            self.frames_until_rejitter = self.rng.random_range(20..60);
        }
        self.frames_until_rejitter -= 1;

        // Lowest ball is the one that will reach the paddle row first
        let Some(target) = state
            .balls
            .iter()
            .map(|b| b.center)
            .max_by(|a, b| a.y.total_cmp(&b.y))
        else {
            return TickInput::default();
        };

        let paddle = state.paddle.rect();
        let paddle_center = paddle.upper_left().x + paddle.width() / 2.0;
        let diff = target.x + self.jitter - paddle_center;

        // Inside half a step of the target, stay put to avoid oscillating
        TickInput {
            move_left: diff < -state.config.paddle_speed / 2.0,
            move_right: diff > state.config.paddle_speed / 2.0,
        }
    }
}
