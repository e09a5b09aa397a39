//! Hit notification and its gameplay consequences
//!
//! The tick computes the bounce first, then raises exactly one hit event
//! per collision with a block. Listeners are stored centrally by id;
//! blocks and balls only hold id lists, so a listener firing can remove
//! entities without invalidating anything mid-dispatch.

use serde::{Deserialize, Serialize};

use crate::consts::BLOCK_SCORE;

use super::state::{Ball, Block, GameState};

pub type ListenerId = u32;

/// One ball-strikes-block collision, raised after the velocity response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitEvent {
    pub block: u32,
    pub ball: u32,
}

/// The gameplay policies that can be attached to blocks and balls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitListenerKind {
    /// Destroys a destructible block struck by a ball of another color,
    /// and repaints the ball in the destroyed block's color.
    BlockRemover,
    /// Takes a ball out of play when it reaches the region below the field.
    BallRemover { death_region: u32 },
    /// Awards points for each destroyed block.
    ScoreTracker,
}

/// Deliver one hit event to every interested listener.
///
/// Ball-side listeners always hear about the hit. Block-side listeners
/// only fire when the ball's color differs from the block's; a same-color
/// ball bounces off without consequence.
pub fn notify_hit(state: &mut GameState, event: HitEvent) {
    log::trace!("ball {} struck block {}", event.ball, event.block);

    let ball_listeners = state
        .ball(event.ball)
        .map(Ball::listener_snapshot)
        .unwrap_or_default();
    for listener in ball_listeners {
        dispatch(state, listener, event);
    }

    if color_mismatch(state, event) {
        let block_listeners = state
            .block(event.block)
            .map(Block::listener_snapshot)
            .unwrap_or_default();
        for listener in block_listeners {
            dispatch(state, listener, event);
        }
    }
}

fn color_mismatch(state: &GameState, event: HitEvent) -> bool {
    match (state.block(event.block), state.ball(event.ball)) {
        (Some(block), Some(ball)) => block.color != ball.color,
        _ => false,
    }
}

fn dispatch(state: &mut GameState, listener: ListenerId, event: HitEvent) {
    let Some(kind) = state.listener_kind(listener) else {
        return;
    };
    match kind {
        HitListenerKind::ScoreTracker => {
            let destructible = state
                .block(event.block)
                .map(|b| b.destructible)
                .unwrap_or(false);
            if destructible && color_mismatch(state, event) {
                state.score.increase(BLOCK_SCORE);
            }
        }
        HitListenerKind::BallRemover { death_region } => {
            if event.block == death_region && state.remove_ball(event.ball) {
                state.ball_counter.decrease(1);
                log::info!("ball {} lost, {} remain", event.ball, state.ball_counter.value());
            }
        }
        HitListenerKind::BlockRemover => {
            let Some(block) = state.block(event.block) else {
                return;
            };
            if !block.destructible || !color_mismatch(state, event) {
                return;
            }
            let color = block.color;
            if state.remove_block(event.block) {
                state.block_counter.decrease(1);
                if let Some(ball) = state.ball_mut(event.ball) {
                    ball.color = color;
                }
            }
        }
    }
}
