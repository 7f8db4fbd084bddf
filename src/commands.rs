//! Player actions as invokable commands, and the key bindings that select them.

use std::collections::HashMap;

use crate::entities::Player;
use crate::input::Key;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
}

impl Command {
    pub fn execute(self, player: &mut Player) {
        match self {
            Command::MoveLeft => player.move_left(),
            Command::MoveRight => player.move_right(),
        }
    }
}

/// Which command each key triggers.
#[derive(Clone, Debug)]
pub struct KeyBindings {
    map: HashMap<Key, Command>,
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self { map: HashMap::new() }
    }

    /// Rebind `key`, returning the command it previously triggered.
    pub fn bind(&mut self, key: Key, command: Command) -> Option<Command> {
        self.map.insert(key, command)
    }

    pub fn unbind(&mut self, key: Key) -> Option<Command> {
        self.map.remove(&key)
    }

    pub fn command_for(&self, key: Key) -> Option<Command> {
        self.map.get(&key).copied()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings.bind(Key::Right, Command::MoveRight);
        bindings.bind(Key::Left, Command::MoveLeft);
        bindings
    }
}
