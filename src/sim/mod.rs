//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One step per scheduled frame, no wall-clock deltas
//! - Stable iteration order (bullets by insertion)
//! - No rendering or platform dependencies

pub mod geometry;
pub mod input;
pub mod state;
pub mod tick;

pub use geometry::Rect;
pub use input::{Action, Control, InputState, KeyDisposition};
pub use state::{
    Absorber, Bullet, Outcome, Player, RoundEvent, RoundPhase, RoundState, Side, Team,
};
pub use tick::{greeting, press, release, tick};
