//! Per-frame game-event chain: Collision -> Score.
//!
//! Collision runs first and stops the chain on a hit, so a frame either ends
//! the run or awards a point, never both.

use tracing::trace;

use crate::chain::{Chain, Flow, Handler};
use crate::entities::Body;
use crate::game::Session;

/// One simulation frame, fed to the event chain after obstacles have moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTick {
    pub frame: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventHandler {
    Collision,
    Score,
}

impl Handler<FrameTick, Session> for EventHandler {
    fn handle(&self, tick: &FrameTick, session: &mut Session) -> Flow {
        match self {
            EventHandler::Collision => {
                let hit = session
                    .obstacles()
                    .iter()
                    .any(|obstacle| session.player().collides_with(obstacle));
                if hit {
                    trace!(frame = tick.frame, "collision");
                    session.lose();
                    Flow::Stop
                } else {
                    Flow::Next
                }
            }
            EventHandler::Score => {
                let player = session.player_mut();
                player.set_score(player.score().saturating_add(1));
                Flow::Next
            }
        }
    }
}

pub fn default_event_chain() -> Chain<EventHandler> {
    [EventHandler::Collision, EventHandler::Score]
        .into_iter()
        .collect()
}
