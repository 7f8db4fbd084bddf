use lane_dodger::chain::Dispatch;
use lane_dodger::commands::Command;
use lane_dodger::constants::*;
use lane_dodger::entities::*;
use lane_dodger::events::EventHandler;
use lane_dodger::game::*;
use lane_dodger::input::{InputEvent, InputHandler, Key};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn player_lane(game: &Game) -> i32 {
    (game.player().rect().center().0 - LANE_WIDTH / 2) / LANE_WIDTH
}

/// Obstacle sitting on top of the player, not moving.
fn blocker() -> Obstacle {
    Obstacle::new(Sprite::Car(1), lane_center(0), PLAYER_CENTER_Y, 0)
}

// ── Initial state ─────────────────────────────────────────────────────────────

#[test]
fn new_game_is_playing_and_empty() {
    let g = Game::new(0);
    assert_eq!(*g.status(), GameStatus::Playing);
    assert!(g.is_running());
    assert!(g.obstacles().is_empty());
    assert_eq!(g.score(), 0);
    assert_eq!(g.frame_count(), 0);
    assert_eq!(player_lane(&g), 0);
}

// ── Input chain ───────────────────────────────────────────────────────────────

#[test]
fn right_key_is_consumed_by_first_link() {
    let mut g = Game::new(0);
    let d = g.dispatch_input(&InputEvent::KeyDown(Key::Right));
    assert_eq!(d, Dispatch::Consumed(0));
    assert_eq!(player_lane(&g), 1);
}

#[test]
fn same_event_twice_moves_twice() {
    let mut g = Game::new(0);
    let ev = InputEvent::KeyDown(Key::Right);
    g.handle_input(ev, 0);
    g.handle_input(ev, 0);
    assert_eq!(player_lane(&g), 2);
}

#[test]
fn left_key_is_consumed_by_second_link() {
    let mut g = Game::new(0);
    g.handle_input(InputEvent::KeyDown(Key::Right), 0);
    let d = g.dispatch_input(&InputEvent::KeyDown(Key::Left));
    assert_eq!(d, Dispatch::Consumed(1));
    assert_eq!(player_lane(&g), 0);
}

#[test]
fn escape_is_consumed_by_exit_link_and_stops_the_game() {
    let mut g = Game::new(0);
    let d = g.dispatch_input(&InputEvent::KeyDown(Key::Escape));
    assert_eq!(d, Dispatch::Consumed(2));
    assert!(!g.is_running());
    assert_eq!(*g.status(), GameStatus::Playing);
}

#[test]
fn unrecognized_events_fall_through_silently() {
    let mut g = Game::new(0);
    let before = g.player().clone();
    for ev in [
        InputEvent::KeyDown(Key::Restart),
        InputEvent::MouseDown { x: 400, y: 350 },
    ] {
        assert_eq!(g.dispatch_input(&ev), Dispatch::Exhausted);
    }
    assert_eq!(*g.player(), before);
    assert!(g.is_running());
    assert_eq!(*g.status(), GameStatus::Playing);
}

#[test]
fn quit_event_stops_without_touching_the_chain() {
    let mut g = Game::new(0);
    g.handle_input(InputEvent::Quit, 0);
    assert!(!g.is_running());
    assert_eq!(player_lane(&g), 0);
}

#[test]
fn rebinding_changes_what_a_key_does() {
    let mut g = Game::new(0);
    g.handle_input(InputEvent::KeyDown(Key::Right), 0);
    g.bindings_mut().bind(Key::Right, Command::MoveLeft);
    g.handle_input(InputEvent::KeyDown(Key::Right), 0);
    assert_eq!(player_lane(&g), 0);
}

#[test]
fn unbound_key_falls_through() {
    let mut g = Game::new(0);
    g.bindings_mut().unbind(Key::Right);
    assert_eq!(g.dispatch_input(&InputEvent::KeyDown(Key::Right)), Dispatch::Exhausted);
    assert_eq!(player_lane(&g), 0);
}

#[test]
fn input_chain_can_be_reconfigured() {
    let mut g = Game::new(0);
    *g.input_chain_mut() = [InputHandler::Exit].into_iter().collect();
    assert_eq!(g.dispatch_input(&InputEvent::KeyDown(Key::Right)), Dispatch::Exhausted);
    assert_eq!(player_lane(&g), 0);

    g.input_chain_mut().push(InputHandler::MoveRight);
    assert_eq!(g.dispatch_input(&InputEvent::KeyDown(Key::Right)), Dispatch::Consumed(1));
    assert_eq!(player_lane(&g), 1);
    assert_eq!(g.dispatch_input(&InputEvent::KeyDown(Key::Escape)), Dispatch::Consumed(0));
    assert!(!g.is_running());
}

// ── Event chain ───────────────────────────────────────────────────────────────

#[test]
fn frame_without_collision_scores_one() {
    let mut g = Game::new(0);
    let mut rng = seeded_rng();
    g.step(0, &mut rng);
    assert_eq!(g.score(), 1);
    g.step(0, &mut rng);
    assert_eq!(g.score(), 2);
    assert_eq!(g.frame_count(), 2);
}

#[test]
fn frame_with_collision_ends_run_without_scoring() {
    let mut g = Game::new(0);
    let mut rng = seeded_rng();
    g.step(0, &mut rng);
    g.insert_obstacle(blocker());
    g.step(0, &mut rng);
    assert_eq!(*g.status(), GameStatus::GameOver);
    assert_eq!(g.score(), 1);
    assert!(g.is_running());
}

#[test]
fn collision_found_with_any_obstacle_in_the_set() {
    let mut g = Game::new(0);
    let mut rng = seeded_rng();
    g.insert_obstacle(Obstacle::new(Sprite::Car(2), lane_center(3), 100, 0));
    g.insert_obstacle(Obstacle::new(Sprite::Car(3), lane_center(2), 100, 0));
    g.insert_obstacle(blocker());
    g.step(0, &mut rng);
    assert_eq!(*g.status(), GameStatus::GameOver);
    assert_eq!(g.score(), 0);
}

#[test]
fn game_over_freezes_the_simulation() {
    let mut g = Game::new(0);
    let mut rng = seeded_rng();
    g.insert_obstacle(blocker());
    g.step(0, &mut rng);
    let frames = g.frame_count();
    g.step(10_000, &mut rng);
    assert_eq!(g.score(), 0);
    assert_eq!(g.frame_count(), frames);
    assert_eq!(g.obstacles().len(), 1);
}

#[test]
fn lose_is_idempotent() {
    let mut g = Game::new(0);
    g.lose();
    g.lose();
    assert_eq!(*g.status(), GameStatus::GameOver);
}

#[test]
fn appended_event_link_runs_every_frame() {
    let mut g = Game::new(0);
    let mut rng = seeded_rng();
    g.event_chain_mut().push(EventHandler::Score);
    g.step(0, &mut rng);
    assert_eq!(g.score(), 2);
}

// ── Spawning & speed ramp ─────────────────────────────────────────────────────

#[test]
fn obstacle_spawns_only_after_interval_elapses() {
    let mut g = Game::new(0);
    let mut rng = seeded_rng();
    g.step(SPAWN_INTERVAL_MS, &mut rng);
    assert!(g.obstacles().is_empty());

    g.step(SPAWN_INTERVAL_MS + 1, &mut rng);
    assert_eq!(g.obstacles().len(), 1);
    let o = &g.obstacles()[0];
    // Spawned at center y=-50, then moved once this frame
    assert_eq!(o.body().position().1, -100 + BASE_OBSTACLE_SPEED);
    assert_eq!(o.body().velocity_y(), BASE_OBSTACLE_SPEED);

    // Timer restarts from the spawn
    g.step(2 * SPAWN_INTERVAL_MS, &mut rng);
    assert_eq!(g.obstacles().len(), 1);
    g.step(2 * SPAWN_INTERVAL_MS + 2, &mut rng);
    assert_eq!(g.obstacles().len(), 2);
}

#[test]
fn spawned_obstacles_land_in_lanes() {
    let mut g = Game::new(0);
    let mut rng = seeded_rng();
    let centers: Vec<i32> = (0..LANE_COUNT).map(lane_center).collect();
    for i in 0..50 {
        g.spawn_obstacle(i, &mut rng);
    }
    assert_eq!(g.obstacles().len(), 50);
    for o in g.obstacles() {
        assert!(centers.contains(&o.rect().center().0));
        assert!(matches!(o.body().sprite(), Sprite::Car(1..=3)));
    }
}

#[test]
fn obstacle_speed_ramps_and_caps() {
    let g = Game::new(1_000);
    assert_eq!(g.obstacle_speed(1_000), BASE_OBSTACLE_SPEED);
    assert_eq!(g.obstacle_speed(1_000 + SPEED_RAMP_INTERVAL_MS - 1), BASE_OBSTACLE_SPEED);
    assert_eq!(g.obstacle_speed(1_000 + SPEED_RAMP_INTERVAL_MS), BASE_OBSTACLE_SPEED + 1);
    assert_eq!(g.obstacle_speed(u64::MAX), MAX_OBSTACLE_SPEED);
    // Clock readings before the run started count as no ramp
    assert_eq!(g.obstacle_speed(0), BASE_OBSTACLE_SPEED);
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn obstacle_in_player_lane_ends_the_run() {
    let mut g = Game::new(0);
    let mut rng = seeded_rng();
    g.insert_obstacle(Obstacle::new(Sprite::Car(1), lane_center(0), OBSTACLE_SPAWN_Y, 5));

    let max_ticks = (WINDOW_HEIGHT - OBSTACLE_SPAWN_Y + 4) / 5; // ceil(650 / 5)
    assert_eq!(max_ticks, 130);
    for _ in 0..max_ticks {
        g.step(0, &mut rng);
        if *g.status() == GameStatus::GameOver {
            break;
        }
    }

    assert_eq!(*g.status(), GameStatus::GameOver);
    // Bottom edge passes the player's top (450) on frame 91
    assert_eq!(g.frame_count(), 91);
    assert_eq!(g.score(), 90);
}

#[test]
fn dodged_obstacle_expires_and_scoring_continues() {
    let mut g = Game::new(0);
    let mut rng = seeded_rng();
    g.insert_obstacle(Obstacle::new(Sprite::Car(1), lane_center(0), OBSTACLE_SPAWN_Y, 5));
    g.frame(0, [InputEvent::KeyDown(Key::Right)], &mut rng);

    for _ in 1..140 {
        g.step(0, &mut rng);
    }
    assert_eq!(g.obstacles().len(), 1);

    g.step(0, &mut rng);
    assert!(g.obstacles().is_empty());
    assert_eq!(*g.status(), GameStatus::Playing);
    assert_eq!(g.score(), 141);
}

#[test]
fn frame_handles_input_before_simulating() {
    let mut g = Game::new(0);
    let mut rng = seeded_rng();
    // Moving out of the way in the same frame avoids the hit
    g.insert_obstacle(blocker());
    g.frame(0, [InputEvent::KeyDown(Key::Right)], &mut rng);
    assert_eq!(*g.status(), GameStatus::Playing);
    assert_eq!(g.score(), 1);
}

// ── Game over & restart ───────────────────────────────────────────────────────

fn lost_game() -> Game {
    let mut g = Game::new(0);
    let mut rng = seeded_rng();
    g.handle_input(InputEvent::KeyDown(Key::Right), 0);
    for _ in 0..10 {
        g.step(0, &mut rng);
    }
    g.spawn_obstacle(0, &mut rng);
    g.insert_obstacle(Obstacle::new(Sprite::Car(1), lane_center(1), PLAYER_CENTER_Y, 0));
    g.step(0, &mut rng);
    assert_eq!(*g.status(), GameStatus::GameOver);
    assert_eq!(g.score(), 10);
    g
}

#[test]
fn restart_resets_the_session() {
    let mut g = lost_game();
    g.handle_input(InputEvent::KeyDown(Key::Restart), 5_000);

    assert_eq!(*g.status(), GameStatus::Playing);
    assert_eq!(g.score(), 0);
    assert!(g.obstacles().is_empty());
    assert_eq!(*g.player(), Player::spawn());
    assert_eq!(g.frame_count(), 0);
    assert_eq!(g.obstacle_speed(5_000), BASE_OBSTACLE_SPEED);

    let mut rng = seeded_rng();
    g.step(5_000 + SPAWN_INTERVAL_MS, &mut rng);
    assert!(g.obstacles().is_empty());
    g.step(5_001 + SPAWN_INTERVAL_MS, &mut rng);
    assert_eq!(g.obstacles().len(), 1);
}

#[test]
fn clicking_retry_restarts() {
    let mut g = lost_game();
    let (x, y) = retry_button().center();
    g.handle_input(InputEvent::MouseDown { x, y }, 0);
    assert_eq!(*g.status(), GameStatus::Playing);
    assert!(g.is_running());
}

#[test]
fn clicking_quit_stops() {
    let mut g = lost_game();
    let (x, y) = quit_button().center();
    g.handle_input(InputEvent::MouseDown { x, y }, 0);
    assert!(!g.is_running());
    assert_eq!(*g.status(), GameStatus::GameOver);
}

#[test]
fn escape_on_game_over_screen_stops() {
    let mut g = lost_game();
    g.handle_input(InputEvent::KeyDown(Key::Escape), 0);
    assert!(!g.is_running());
}

#[test]
fn clicks_outside_buttons_and_moves_are_ignored_after_losing() {
    let mut g = lost_game();
    let before = g.player().clone();
    g.handle_input(InputEvent::MouseDown { x: 5, y: 5 }, 0);
    g.handle_input(InputEvent::KeyDown(Key::Left), 0);
    assert_eq!(*g.player(), before);
    assert_eq!(*g.status(), GameStatus::GameOver);
    assert!(g.is_running());
}

#[test]
fn buttons_do_not_overlap() {
    assert!(!retry_button().intersects(&quit_button()));
    assert_eq!(retry_button().center().0, WINDOW_WIDTH / 2);
    assert_eq!(quit_button().center().0, WINDOW_WIDTH / 2);
}
