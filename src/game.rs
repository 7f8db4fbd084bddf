//! The game orchestrator.
//!
//! `Game` owns the session state, both handler chains and the key bindings,
//! and drives one frame at a time. Within a frame the order is fixed:
//! input dispatch, obstacle spawn, obstacle update/expiry, then the
//! game-event chain. Rendering and frame pacing belong to the caller.
//!
//! Time comes in as a monotonic millisecond clock (`now_ms`) and randomness
//! through an injected RNG, so a seeded RNG and a fake clock make every run
//! reproducible.

use rand::Rng;
use tracing::{debug, info};

use crate::chain::{Chain, Dispatch};
use crate::commands::KeyBindings;
use crate::constants::{
    BASE_OBSTACLE_SPEED, BUTTON_HEIGHT, BUTTON_WIDTH, CAR_VARIANTS, LANE_COUNT,
    MAX_OBSTACLE_SPEED, OBSTACLE_SPAWN_Y, QUIT_BUTTON_Y, RETRY_BUTTON_Y, SPAWN_INTERVAL_MS,
    SPEED_RAMP_INTERVAL_MS, WINDOW_HEIGHT, WINDOW_WIDTH,
};
use crate::entities::{lane_center, GameStatus, Obstacle, Player, Sprite};
use crate::events::{default_event_chain, EventHandler, FrameTick};
use crate::geometry::Rect;
use crate::input::{default_input_chain, InputContext, InputEvent, InputHandler, Key};

// ── Game-over buttons ─────────────────────────────────────────────────────────

pub fn retry_button() -> Rect {
    Rect::new(
        (WINDOW_WIDTH - BUTTON_WIDTH) / 2,
        RETRY_BUTTON_Y,
        BUTTON_WIDTH,
        BUTTON_HEIGHT,
    )
}

pub fn quit_button() -> Rect {
    Rect::new(
        (WINDOW_WIDTH - BUTTON_WIDTH) / 2,
        QUIT_BUTTON_Y,
        BUTTON_WIDTH,
        BUTTON_HEIGHT,
    )
}

// ── Session ───────────────────────────────────────────────────────────────────

/// The part of the game the handler chains are allowed to see: the player,
/// the active obstacles, and the lose / stop transitions.
#[derive(Clone, Debug)]
pub struct Session {
    player: Player,
    obstacles: Vec<Obstacle>,
    status: GameStatus,
    running: bool,
}

impl Session {
    fn new() -> Self {
        Self {
            player: Player::spawn(),
            obstacles: Vec::new(),
            status: GameStatus::Playing,
            running: true,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// End the current run. Only the first call has any effect.
    pub fn lose(&mut self) {
        if self.status == GameStatus::Playing {
            info!(score = self.player.score(), "game over");
            self.status = GameStatus::GameOver;
        }
    }

    /// Ask the outer loop to terminate.
    pub fn stop(&mut self) {
        self.running = false;
    }
}

// ── Game ──────────────────────────────────────────────────────────────────────

pub struct Game {
    session: Session,
    bindings: KeyBindings,
    input_chain: Chain<InputHandler>,
    event_chain: Chain<EventHandler>,
    /// Clock reading of the last obstacle spawn (or of the run start).
    last_spawn_ms: u64,
    /// Clock reading the speed ramp is measured from.
    run_started_ms: u64,
    frame: u64,
}

impl Game {
    pub fn new(now_ms: u64) -> Self {
        Self {
            session: Session::new(),
            bindings: KeyBindings::default(),
            input_chain: default_input_chain(),
            event_chain: default_event_chain(),
            last_spawn_ms: now_ms,
            run_started_ms: now_ms,
            frame: 0,
        }
    }

    pub fn player(&self) -> &Player {
        self.session.player()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.session.obstacles()
    }

    pub fn status(&self) -> &GameStatus {
        self.session.status()
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    pub fn score(&self) -> u32 {
        self.session.player().score()
    }

    /// Frames simulated since the current run started.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.bindings
    }

    pub fn input_chain_mut(&mut self) -> &mut Chain<InputHandler> {
        &mut self.input_chain
    }

    pub fn event_chain_mut(&mut self) -> &mut Chain<EventHandler> {
        &mut self.event_chain
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    pub fn lose(&mut self) {
        self.session.lose();
    }

    pub fn quit(&mut self) {
        self.session.stop();
    }

    /// Start a fresh run: new player, no obstacles, timers measured from `now_ms`.
    pub fn restart(&mut self, now_ms: u64) {
        self.session.player = Player::spawn();
        self.session.obstacles.clear();
        self.session.status = GameStatus::Playing;
        self.last_spawn_ms = now_ms;
        self.run_started_ms = now_ms;
        self.frame = 0;
        info!("restarted");
    }

    // ── Input ────────────────────────────────────────────────────────────────

    /// Run one event through the input chain, regardless of run state.
    pub fn dispatch_input(&mut self, event: &InputEvent) -> Dispatch {
        let mut ctx = InputContext {
            session: &mut self.session,
            bindings: &self.bindings,
        };
        self.input_chain.dispatch(event, &mut ctx)
    }

    /// Route one event: quit requests are handled here, everything else goes
    /// to the input chain while playing or to the game-over controls.
    pub fn handle_input(&mut self, event: InputEvent, now_ms: u64) {
        if event == InputEvent::Quit {
            info!("quit requested");
            self.quit();
            return;
        }
        match self.session.status {
            GameStatus::Playing => {
                self.dispatch_input(&event);
            }
            GameStatus::GameOver => self.handle_game_over_input(event, now_ms),
        }
    }

    fn handle_game_over_input(&mut self, event: InputEvent, now_ms: u64) {
        match event {
            InputEvent::MouseDown { x, y } if retry_button().contains(x, y) => self.restart(now_ms),
            InputEvent::MouseDown { x, y } if quit_button().contains(x, y) => self.quit(),
            InputEvent::KeyDown(Key::Restart) => self.restart(now_ms),
            InputEvent::KeyDown(Key::Escape) => self.quit(),
            _ => {}
        }
    }

    // ── Simulation ───────────────────────────────────────────────────────────

    /// Velocity given to obstacles spawned at `now_ms`.
    pub fn obstacle_speed(&self, now_ms: u64) -> i32 {
        let steps = now_ms.saturating_sub(self.run_started_ms) / SPEED_RAMP_INTERVAL_MS;
        let ramp = i32::try_from(steps).unwrap_or(i32::MAX);
        BASE_OBSTACLE_SPEED.saturating_add(ramp).min(MAX_OBSTACLE_SPEED)
    }

    /// Add an obstacle to the active set as-is.
    pub fn insert_obstacle(&mut self, obstacle: Obstacle) {
        self.session.obstacles.push(obstacle);
    }

    /// Spawn an obstacle above a random lane with the current ramped speed.
    pub fn spawn_obstacle(&mut self, now_ms: u64, rng: &mut impl Rng) {
        let lane = rng.gen_range(0..LANE_COUNT);
        let variant = rng.gen_range(1..=CAR_VARIANTS);
        let speed = self.obstacle_speed(now_ms);
        debug!(lane, variant, speed, "spawning obstacle");
        self.insert_obstacle(Obstacle::new(
            Sprite::Car(variant),
            lane_center(lane),
            OBSTACLE_SPAWN_Y,
            speed,
        ));
        self.last_spawn_ms = now_ms;
    }

    /// Advance the simulation by one frame without reading input.
    /// Does nothing once the run is over.
    pub fn step(&mut self, now_ms: u64, rng: &mut impl Rng) {
        if self.session.status != GameStatus::Playing {
            return;
        }
        self.frame += 1;

        if now_ms.saturating_sub(self.last_spawn_ms) > SPAWN_INTERVAL_MS {
            self.spawn_obstacle(now_ms, rng);
        }

        self.session.player.update();
        self.session.obstacles.retain_mut(|obstacle| {
            obstacle.update();
            !obstacle.is_past(WINDOW_HEIGHT)
        });

        let tick = FrameTick { frame: self.frame };
        self.event_chain.dispatch(&tick, &mut self.session);
    }

    /// One full frame: drain `events`, then step the simulation.
    pub fn frame<I>(&mut self, now_ms: u64, events: I, rng: &mut impl Rng)
    where
        I: IntoIterator<Item = InputEvent>,
    {
        for event in events {
            self.handle_input(event, now_ms);
        }
        self.step(now_ms, rng);
    }
}
