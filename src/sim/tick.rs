//! One fixed step of the simulation
//!
//! A tick walks the sprite list in registration order: the paddle consumes
//! the player's input, then each ball traces its trajectory for the frame
//! and bounces off the first thing it would cross. Win and loss are
//! decided at the end of the tick from the counters.

use glam::DVec2;

use crate::consts::{CLEAR_BONUS, POST_HIT_ADVANCE};

use super::collision::{Collidable, CollidableId};
use super::events::{self, HitEvent};
use super::geometry::Segment;
use super::state::{GameState, GameStatus, SpriteId};

/// Player input for one frame. Left wins if both are held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
}

/// Advance the game by one frame.
pub fn tick(state: &mut GameState, input: TickInput) {
    if state.status != GameStatus::Running {
        return;
    }

    // Snapshot: hit responses may remove sprites mid-frame.
    let sprites = state.sprites.clone();
    for sprite in sprites {
        match sprite {
            SpriteId::Paddle => {
                if input.move_left {
                    state.paddle.move_left();
                } else if input.move_right {
                    state.paddle.move_right();
                }
            }
            SpriteId::Ball(id) => move_ball(state, id),
            SpriteId::Block(_) | SpriteId::ScoreBoard => {}
        }
    }

    if state.block_counter.value() <= 0 {
        state.score.increase(CLEAR_BONUS);
        state.status = GameStatus::Won;
        log::info!("board cleared, final score {}", state.score.value());
    } else if state.ball_counter.value() <= 0 {
        state.status = GameStatus::Lost;
        log::info!("all balls lost, final score {}", state.score.value());
    }
}

/// Move one ball along its trajectory for this frame.
///
/// The trajectory is the segment from the current center to where a full
/// step would land. If nothing crosses it the ball takes the full step;
/// otherwise the struck object picks the new velocity, the ball advances
/// most of a step along it, and block hits raise exactly one event.
fn move_ball(state: &mut GameState, id: u32) {
    // Removed earlier this same frame
    let Some(ball) = state.ball(id) else {
        return;
    };
    let center = ball.center;
    let velocity = ball.velocity;
    let next = velocity.apply_to(center);

    // A stationary ball has a degenerate trajectory and stays put.
    let Ok(trajectory) = Segment::new(center, next) else {
        return;
    };

    let hit = state
        .index
        .closest_collision(&trajectory, |cid| state.rect_of(cid));

    let Some(collision) = hit else {
        if let Some(ball) = state.ball_mut(id) {
            ball.center = next;
        }
        return;
    };

    let new_velocity = match collision.id {
        CollidableId::Paddle => state.paddle.hit(collision.point, velocity),
        CollidableId::Block(block_id) => match state.block(block_id) {
            Some(block) => block.hit(collision.point, velocity),
            // Stale index entry: treat the path as clear
            None => {
                if let Some(ball) = state.ball_mut(id) {
                    ball.center = next;
                }
                return;
            }
        },
    };

    if let Some(ball) = state.ball_mut(id) {
        ball.velocity = new_velocity;
        ball.center = DVec2::new(
            center.x + POST_HIT_ADVANCE * new_velocity.dx,
            center.y + POST_HIT_ADVANCE * new_velocity.dy,
        );
    }

    if let CollidableId::Block(block_id) = collision.id {
        events::notify_hit(
            state,
            HitEvent {
                block: block_id,
                ball: id,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approx_eq;
    use crate::config::GameConfig;
    use crate::consts::BLOCK_SCORE;
    use crate::sim::events::HitListenerKind;
    use crate::sim::geometry::Rect;
    use crate::sim::state::BlockColor;
    use crate::sim::velocity::Velocity;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(DVec2::new(x, y), w, h).unwrap()
    }

    fn board() -> GameState {
        GameState::empty(&GameConfig::default()).unwrap()
    }

    #[test]
    fn test_free_flight_takes_a_full_step() {
        let mut state = board();
        let id = state.add_ball(DVec2::new(400.0, 300.0), 10.0, BlockColor::Orange);
        state.ball_mut(id).unwrap().velocity = Velocity::new(2.0, -3.0);

        tick(&mut state, TickInput::default());
        let ball = state.ball(id).unwrap();
        assert!(approx_eq(ball.center.x, 402.0));
        assert!(approx_eq(ball.center.y, 297.0));
        // Velocity unchanged in free flight
        assert!(approx_eq(ball.velocity.dx, 2.0));
        assert!(approx_eq(ball.velocity.dy, -3.0));
    }

    #[test]
    fn test_stationary_ball_stays_put() {
        let mut state = board();
        let id = state.add_ball(DVec2::new(400.0, 300.0), 10.0, BlockColor::Orange);

        tick(&mut state, TickInput::default());
        let ball = state.ball(id).unwrap();
        assert!(approx_eq(ball.center.x, 400.0));
        assert!(approx_eq(ball.center.y, 300.0));
    }

    #[test]
    fn test_ball_bounces_off_block_top_without_tunneling() {
        let mut state = board();
        state.add_block(rect(375.0, 103.0, 50.0, 25.0), BlockColor::Red);
        let id = state.add_ball(DVec2::new(400.0, 100.0), 10.0, BlockColor::Red);
        state.ball_mut(id).unwrap().velocity = Velocity::new(0.0, 5.0);

        tick(&mut state, TickInput::default());
        let ball = state.ball(id).unwrap();
        // Top-side hit mirrors the vertical component
        assert!(approx_eq(ball.velocity.dx, 0.0));
        assert!(approx_eq(ball.velocity.dy, -5.0));
        // The ball backed off along the new velocity, clear of the block
        assert!(approx_eq(ball.center.y, 100.0 - POST_HIT_ADVANCE * 5.0));
        assert!(ball.center.y < 103.0);
    }

    #[test]
    fn test_block_hit_raises_exactly_one_event() {
        let mut state = board();
        let block = state.add_block(rect(375.0, 103.0, 50.0, 25.0), BlockColor::Red);
        // A second block far away keeps the board from clearing
        state.add_block(rect(100.0, 400.0, 50.0, 25.0), BlockColor::Green);
        let id = state.add_ball(DVec2::new(400.0, 100.0), 10.0, BlockColor::Orange);
        state.ball_mut(id).unwrap().velocity = Velocity::new(0.0, 5.0);

        let remover = state.register_listener(HitListenerKind::BlockRemover);
        state.block_mut(block).unwrap().add_hit_listener(remover);
        let tracker = state.register_listener(HitListenerKind::ScoreTracker);
        state.ball_mut(id).unwrap().add_hit_listener(tracker);

        tick(&mut state, TickInput::default());
        assert!(state.block(block).is_none());
        // Scored once, not once per struck side
        assert_eq!(state.score.value(), BLOCK_SCORE);
        assert_eq!(state.ball(id).unwrap().color, BlockColor::Red);
    }

    #[test]
    fn test_corner_hit_reverses_and_notifies_once() {
        let mut state = board();
        let block = state.add_block(rect(400.0, 100.0, 50.0, 25.0), BlockColor::Red);
        let id = state.add_ball(DVec2::new(395.0, 95.0), 10.0, BlockColor::Orange);
        // Heading straight for the block's upper-left corner
        state.ball_mut(id).unwrap().velocity = Velocity::new(5.0, 5.0);

        let tracker = state.register_listener(HitListenerKind::ScoreTracker);
        state.ball_mut(id).unwrap().add_hit_listener(tracker);

        tick(&mut state, TickInput::default());
        let ball = state.ball(id).unwrap();
        assert!(approx_eq(ball.velocity.dx, -5.0));
        assert!(approx_eq(ball.velocity.dy, -5.0));
        assert_eq!(state.score.value(), BLOCK_SCORE);
    }

    #[test]
    fn test_removed_block_invisible_to_later_balls_same_tick() {
        // Two balls aimed at the same one-hit block: the first destroys
        // it, the second must fly through where it stood.
        let mut state = board();
        let block = state.add_block(rect(375.0, 103.0, 50.0, 25.0), BlockColor::Red);
        let first = state.add_ball(DVec2::new(390.0, 100.0), 10.0, BlockColor::Orange);
        let second = state.add_ball(DVec2::new(410.0, 100.0), 10.0, BlockColor::Orange);
        state.ball_mut(first).unwrap().velocity = Velocity::new(0.0, 5.0);
        state.ball_mut(second).unwrap().velocity = Velocity::new(0.0, 5.0);

        let remover = state.register_listener(HitListenerKind::BlockRemover);
        state.block_mut(block).unwrap().add_hit_listener(remover);

        tick(&mut state, TickInput::default());
        assert!(state.block(block).is_none());
        let ball = state.ball(second).unwrap();
        // Full step, no bounce
        assert!(approx_eq(ball.center.y, 105.0));
        assert!(approx_eq(ball.velocity.dy, 5.0));
    }

    #[test]
    fn test_paddle_moves_with_input() {
        let mut state = board();
        state.register_paddle();
        let before = state.paddle.rect().upper_left().x;

        tick(
            &mut state,
            TickInput {
                move_left: false,
                move_right: true,
            },
        );
        let after = state.paddle.rect().upper_left().x;
        assert!(approx_eq(after - before, GameConfig::default().paddle_speed));
    }

    #[test]
    fn test_left_input_wins_over_both_held() {
        let mut state = board();
        state.register_paddle();
        let before = state.paddle.rect().upper_left().x;

        tick(
            &mut state,
            TickInput {
                move_left: true,
                move_right: true,
            },
        );
        let after = state.paddle.rect().upper_left().x;
        assert!(approx_eq(before - after, GameConfig::default().paddle_speed));
    }

    #[test]
    fn test_clearing_last_block_wins_with_bonus() {
        let mut state = board();
        let block = state.add_block(rect(375.0, 103.0, 50.0, 25.0), BlockColor::Red);
        let id = state.add_ball(DVec2::new(400.0, 100.0), 10.0, BlockColor::Orange);
        state.ball_mut(id).unwrap().velocity = Velocity::new(0.0, 5.0);

        let remover = state.register_listener(HitListenerKind::BlockRemover);
        state.block_mut(block).unwrap().add_hit_listener(remover);
        let tracker = state.register_listener(HitListenerKind::ScoreTracker);
        state.ball_mut(id).unwrap().add_hit_listener(tracker);

        tick(&mut state, TickInput::default());
        assert_eq!(state.status, GameStatus::Won);
        assert_eq!(state.score.value(), BLOCK_SCORE + CLEAR_BONUS);
    }

    #[test]
    fn test_losing_last_ball_loses() {
        let mut state = board();
        // A block keeps the win check from firing first
        state.add_block(rect(100.0, 100.0, 50.0, 25.0), BlockColor::Red);
        let death = state.add_wall(rect(0.0, 645.0, 800.0, 25.0));
        let id = state.add_ball(DVec2::new(400.0, 642.0), 10.0, BlockColor::Orange);
        state.ball_mut(id).unwrap().velocity = Velocity::new(0.0, 5.0);
        let remover = state.register_listener(HitListenerKind::BallRemover {
            death_region: death,
        });
        state.ball_mut(id).unwrap().add_hit_listener(remover);

        tick(&mut state, TickInput::default());
        assert!(state.ball(id).is_none());
        assert_eq!(state.status, GameStatus::Lost);
    }

    #[test]
    fn test_finished_game_is_frozen() {
        let mut state = board();
        let id = state.add_ball(DVec2::new(400.0, 300.0), 10.0, BlockColor::Orange);
        state.ball_mut(id).unwrap().velocity = Velocity::new(2.0, 2.0);
        state.status = GameStatus::Won;

        tick(&mut state, TickInput::default());
        let ball = state.ball(id).unwrap();
        assert!(approx_eq(ball.center.x, 400.0));
        assert!(approx_eq(ball.center.y, 300.0));
    }

    #[test]
    fn test_full_board_runs_without_losing_balls_immediately() {
        let mut state = GameState::new(&GameConfig::default()).unwrap();
        for _ in 0..120 {
            tick(&mut state, TickInput::default());
        }
        // 120 frames is nowhere near enough for all three balls to die
        assert!(state.ball_counter.value() > 0);
        // Balls stay inside the walls the whole time
        let config = &state.config;
        for ball in &state.balls {
            assert!(ball.center.x > config.frame_size);
            assert!(ball.center.x < config.screen_width - config.frame_size);
            assert!(ball.center.y > 2.0 * config.frame_size);
        }
    }
}
