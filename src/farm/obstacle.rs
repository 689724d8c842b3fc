use super::{Arena, Bounded, Rect};

pub const OBSTACLE_W: f64 = 28.0;
pub const OBSTACLE_H: f64 = 20.0;
pub const DEFAULT_VELOCITY_X: f64 = -80.0;

// Wrap margins: leave well past the edge, re-enter just outside the opposite one.
const WRAP_LEAVE: f64 = 100.0;
const WRAP_ENTER: f64 = 40.0;

/// A crow crossing the field horizontally. Hitting one costs time.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub vx: f64, // units per second, signed
}

impl Obstacle {
    /// `None` (or a zero velocity) falls back to [`DEFAULT_VELOCITY_X`].
    pub fn new(x: f64, y: f64, velocity_x: Option<f64>) -> Self {
        let vx = match velocity_x {
            Some(v) if v != 0.0 => v,
            _ => DEFAULT_VELOCITY_X,
        };
        Self { x, y, vx }
    }

    pub fn update(&mut self, dt: f64, arena: Arena) {
        self.x += self.vx * dt;
        if self.x < -WRAP_LEAVE {
            self.x = arena.width + WRAP_ENTER;
        }
        if self.x > arena.width + WRAP_LEAVE {
            self.x = -WRAP_ENTER;
        }
    }
}

impl Bounded for Obstacle {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, OBSTACLE_W, OBSTACLE_H)
    }
}
