//! Drawing contract
//!
//! The simulation never draws; it only exposes what exists and in which
//! order. A frontend implements [`Surface`] and calls [`draw_all`] once
//! per frame. [`NullSurface`] discards everything, which is all the
//! headless demo binary and the tests need.

use glam::DVec2;

use crate::sim::{BlockColor, GameState, Rect, SpriteId};

/// Minimal drawing operations a frontend must provide.
pub trait Surface {
    fn fill_rect(&mut self, rect: &Rect, color: BlockColor);
    fn fill_circle(&mut self, center: DVec2, radius: f64, color: BlockColor);
    fn draw_text(&mut self, position: DVec2, text: &str);
}

/// Surface that draws nothing.
#[derive(Debug, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn fill_rect(&mut self, _rect: &Rect, _color: BlockColor) {}
    fn fill_circle(&mut self, _center: DVec2, _radius: f64, _color: BlockColor) {}
    fn draw_text(&mut self, _position: DVec2, _text: &str) {}
}

/// Draw every sprite in registration order, so later sprites paint over
/// earlier ones the same way every frame.
pub fn draw_all(state: &GameState, surface: &mut impl Surface) {
    for &sprite in &state.sprites {
        match sprite {
            SpriteId::Block(id) => {
                if let Some(block) = state.block(id) {
                    surface.fill_rect(&block.rect(), block.color);
                }
            }
            SpriteId::Ball(id) => {
                if let Some(ball) = state.ball(id) {
                    surface.fill_circle(ball.center, ball.radius, ball.color);
                }
            }
            SpriteId::Paddle => {
                surface.fill_rect(&state.paddle.rect(), BlockColor::Yellow);
            }
            SpriteId::ScoreBoard => {
                let position = DVec2::new(
                    state.config.screen_width / 2.0,
                    state.config.frame_size / 2.0,
                );
                surface.draw_text(position, &format!("Score: {}", state.score.value()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;

    /// Records draw calls in order.
    #[derive(Default)]
    struct RecordingSurface {
        rects: usize,
        circles: usize,
        texts: Vec<String>,
    }

    impl Surface for RecordingSurface {
        fn fill_rect(&mut self, _rect: &Rect, _color: BlockColor) {
            self.rects += 1;
        }
        fn fill_circle(&mut self, _center: DVec2, _radius: f64, _color: BlockColor) {
            self.circles += 1;
        }
        fn draw_text(&mut self, _position: DVec2, text: &str) {
            self.texts.push(text.to_string());
        }
    }

    #[test]
    fn test_draw_all_covers_every_sprite() {
        let state = GameState::new(&GameConfig::default()).unwrap();
        let mut surface = RecordingSurface::default();
        draw_all(&state, &mut surface);

        // 57 grid blocks + 4 walls + the paddle
        assert_eq!(surface.rects, 62);
        assert_eq!(surface.circles, 3);
        assert_eq!(surface.texts, vec!["Score: 0".to_string()]);
    }

    #[test]
    fn test_null_surface_accepts_everything() {
        let state = GameState::new(&GameConfig::default()).unwrap();
        draw_all(&state, &mut NullSurface);
    }
}
