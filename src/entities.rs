//! Game entities: a shared movable body plus the player and obstacle kinds.

use crate::constants::{
    LANE_WIDTH, OBSTACLE_HEIGHT, OBSTACLE_WIDTH, PLAYER_CENTER_Y, PLAYER_HEIGHT, PLAYER_WIDTH,
    WINDOW_WIDTH,
};
use crate::geometry::Rect;

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// Drawable handle. The renderer decides what each one looks like.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sprite {
    Player,
    /// Car artwork variant, 1-based.
    Car(u8),
}

/// Horizontal center of a lane (0 is the leftmost).
pub fn lane_center(lane: usize) -> i32 {
    lane as i32 * LANE_WIDTH + LANE_WIDTH / 2
}

// ── Shared body ───────────────────────────────────────────────────────────────

/// Position, velocity and sprite shared by every entity kind.
///
/// The bounding rectangle is the only positional state: its top-left corner
/// is the entity's position.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    rect: Rect,
    velocity_x: i32,
    velocity_y: i32,
    sprite: Sprite,
}

impl Entity {
    /// Place a sprite of the given size centred on `(cx, cy)`.
    pub fn new(sprite: Sprite, cx: i32, cy: i32, width: i32, height: i32, velocity_y: i32) -> Self {
        Self {
            rect: Rect::from_center(cx, cy, width, height),
            velocity_x: 0,
            velocity_y,
            sprite,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn position(&self) -> (i32, i32) {
        (self.rect.x, self.rect.y)
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.rect.x = x;
        self.rect.y = y;
    }

    pub fn velocity_y(&self) -> i32 {
        self.velocity_y
    }

    pub fn set_velocity_y(&mut self, v: i32) {
        self.velocity_y = v;
    }

    pub fn sprite(&self) -> Sprite {
        self.sprite
    }

    /// Advance one frame.
    pub fn update(&mut self) {
        self.rect.x += self.velocity_x;
        self.rect.y += self.velocity_y;
    }
}

/// Anything with a body can be collided with and drawn.
pub trait Body {
    fn body(&self) -> &Entity;

    fn rect(&self) -> Rect {
        self.body().rect()
    }

    fn collides_with(&self, other: &impl Body) -> bool {
        self.rect().intersects(&other.rect())
    }
}

impl Body for Entity {
    fn body(&self) -> &Entity {
        self
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    body: Entity,
    score: u32,
    step_x: i32,
    window_width: i32,
}

impl Player {
    /// A player centred on `(cx, cy)` that moves `step_x` pixels per command.
    pub fn new(cx: i32, cy: i32, step_x: i32, window_width: i32) -> Self {
        Self {
            body: Entity::new(Sprite::Player, cx, cy, PLAYER_WIDTH, PLAYER_HEIGHT, 0),
            score: 0,
            step_x,
            window_width,
        }
    }

    /// Fresh player in lane 0, the start of every run.
    pub fn spawn() -> Self {
        Self::new(lane_center(0), PLAYER_CENTER_Y, LANE_WIDTH, WINDOW_WIDTH)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    /// Vertical velocity is always zero, so this never moves the player;
    /// lane changes happen in `move_left` / `move_right`.
    pub fn update(&mut self) {
        self.body.update();
    }

    pub fn move_right(&mut self) {
        let (x, y) = self.body.position();
        let candidate = x + self.step_x;
        if candidate + self.body.rect().width <= self.window_width {
            self.body.set_position(candidate, y);
        }
    }

    pub fn move_left(&mut self) {
        let (x, y) = self.body.position();
        let candidate = x - self.step_x;
        if candidate >= 0 {
            self.body.set_position(candidate, y);
        }
    }
}

impl Body for Player {
    fn body(&self) -> &Entity {
        &self.body
    }
}

// ── Obstacle ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    body: Entity,
}

impl Obstacle {
    pub fn new(sprite: Sprite, cx: i32, cy: i32, velocity_y: i32) -> Self {
        Self {
            body: Entity::new(sprite, cx, cy, OBSTACLE_WIDTH, OBSTACLE_HEIGHT, velocity_y),
        }
    }

    pub fn update(&mut self) {
        self.body.update();
    }

    /// True once the top edge has dropped below `window_height`.
    pub fn is_past(&self, window_height: i32) -> bool {
        self.body.position().1 > window_height
    }
}

impl Body for Obstacle {
    fn body(&self) -> &Entity {
        &self.body
    }
}
