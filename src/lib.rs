//! Lane Dodger: steer a car across four lanes and dodge the traffic.
//!
//! Player input runs through a chain of input handlers that map keys to
//! movement commands; every frame, a second chain checks for collisions and
//! awards points. [`game::Game`] ties both chains to the player and the
//! active obstacles.

pub mod chain;
pub mod commands;
pub mod constants;
pub mod entities;
pub mod events;
pub mod game;
pub mod geometry;
pub mod input;
