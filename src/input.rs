//! Raw input events and the input handler chain.
//!
//! The chain is built as MoveRight -> MoveLeft -> Exit. Each link consumes
//! the one key it recognizes and forwards everything else, so unrecognized
//! events fall off the end of the chain without effect.

use tracing::{debug, info};

use crate::chain::{Chain, Flow, Handler};
use crate::commands::KeyBindings;
use crate::game::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Right,
    Left,
    Escape,
    /// Start a new run from the game-over screen.
    Restart,
}

/// A discrete input event, already translated out of the terminal backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    /// Window close / interrupt. Handled by the game itself, never by the chain.
    Quit,
    /// Primary button press in logical window coordinates.
    MouseDown { x: i32, y: i32 },
}

/// What the input chain may touch while handling one event.
pub struct InputContext<'a> {
    pub session: &'a mut Session,
    pub bindings: &'a KeyBindings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputHandler {
    MoveRight,
    MoveLeft,
    Exit,
}

impl InputHandler {
    /// Move through the bound command for `key`. Unbound keys are forwarded.
    fn run_bound(key: Key, event: &InputEvent, ctx: &mut InputContext<'_>) -> Flow {
        if *event != InputEvent::KeyDown(key) {
            return Flow::Next;
        }
        match ctx.bindings.command_for(key) {
            Some(command) => {
                command.execute(ctx.session.player_mut());
                debug!(?key, ?command, "command executed");
                Flow::Stop
            }
            None => Flow::Next,
        }
    }
}

impl<'a> Handler<InputEvent, InputContext<'a>> for InputHandler {
    fn handle(&self, event: &InputEvent, ctx: &mut InputContext<'a>) -> Flow {
        match self {
            InputHandler::MoveRight => Self::run_bound(Key::Right, event, ctx),
            InputHandler::MoveLeft => Self::run_bound(Key::Left, event, ctx),
            InputHandler::Exit => {
                if *event == InputEvent::KeyDown(Key::Escape) {
                    info!("exit requested");
                    ctx.session.stop();
                    Flow::Stop
                } else {
                    Flow::Next
                }
            }
        }
    }
}

pub fn default_input_chain() -> Chain<InputHandler> {
    [InputHandler::MoveRight, InputHandler::MoveLeft, InputHandler::Exit]
        .into_iter()
        .collect()
}
