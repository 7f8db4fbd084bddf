//! Fixed gameplay constants. All positions are logical window pixels.

// ── Window & lanes ────────────────────────────────────────────────────────────

pub const WINDOW_WIDTH: i32 = 800;
pub const WINDOW_HEIGHT: i32 = 600;

pub const LANE_COUNT: usize = 4;
pub const LANE_WIDTH: i32 = WINDOW_WIDTH / LANE_COUNT as i32;

// ── Sprites ───────────────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: i32 = 60;
pub const PLAYER_HEIGHT: i32 = 100;
/// Vertical center of the player sprite; it never moves vertically.
pub const PLAYER_CENTER_Y: i32 = WINDOW_HEIGHT - 100;

pub const OBSTACLE_WIDTH: i32 = 60;
pub const OBSTACLE_HEIGHT: i32 = 100;
/// Obstacles appear just above the top edge.
pub const OBSTACLE_SPAWN_Y: i32 = -50;
/// Number of car sprite variants an obstacle can be drawn with.
pub const CAR_VARIANTS: u8 = 3;

// ── Timing ────────────────────────────────────────────────────────────────────

pub const SPAWN_INTERVAL_MS: u64 = 2_000;

pub const BASE_OBSTACLE_SPEED: i32 = 5;
pub const MAX_OBSTACLE_SPEED: i32 = 12;
/// Obstacle speed grows by one pixel per frame every interval.
pub const SPEED_RAMP_INTERVAL_MS: u64 = 10_000;

// ── Game-over buttons ─────────────────────────────────────────────────────────

pub const BUTTON_WIDTH: i32 = 200;
pub const BUTTON_HEIGHT: i32 = 60;
pub const RETRY_BUTTON_Y: i32 = 320;
pub const QUIT_BUTTON_Y: i32 = 400;
