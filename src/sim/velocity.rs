//! Per-tick ball velocity

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Displacement applied to a ball's center each tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub dx: f64,
    pub dy: f64,
}

impl Velocity {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Build a velocity from a direction and speed.
    ///
    /// Angle 0 points straight up (toward −y in screen coordinates), so the
    /// paddle's rebound angles read like a clock face: 330° deflects
    /// up-left, 30° up-right.
    pub fn from_angle_speed(angle: f64, speed: f64) -> Self {
        let rotated = angle - std::f64::consts::FRAC_PI_2;
        Self {
            dx: speed * rotated.cos(),
            dy: speed * rotated.sin(),
        }
    }

    /// Magnitude of the displacement.
    pub fn speed(&self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }

    /// Raw direction of the displacement vector.
    pub fn angle(&self) -> f64 {
        self.dy.atan2(self.dx)
    }

    /// One tick of movement from `p`.
    pub fn apply_to(&self, p: DVec2) -> DVec2 {
        DVec2::new(p.x + self.dx, p.y + self.dy)
    }
}
