//! Shield Duel - a two-player local arena shooter
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (movement, bullets, shields, round phases)
//! - `controller`: Round controller that owns the state and drives collaborators
//! - `renderer`: Draw calls for a 2D surface
//! - `hud`: Health bars, labels and outcome text
//! - `platform`: Collaborator traits implemented by the host (canvas, DOM, timers)
//! - `tuning`: Data-driven game balance
//! - `settings`: Key bindings + tuning, persisted as JSON

pub mod controller;
pub mod hud;
pub mod names;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use controller::Arena;
pub use settings::{KeyBindings, Settings, SettingsError};
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Playfield dimensions (canvas size in the reference page)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Player box
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    /// Horizontal spawn columns
    pub const PLAYER1_START_X: f32 = 100.0;
    pub const PLAYER2_START_X: f32 = 600.0;
    /// Players drop in from the top edge...
    pub const DROP_START_Y: f32 = 0.0;
    /// ...and come to rest here
    pub const REST_Y: f32 = 300.0;
    /// Pixels per frame during the drop-in
    pub const DROP_SPEED: f32 = 5.0;

    /// Pixels per frame per held direction key
    pub const MOVE_SPEED: f32 = 5.0;

    /// Bullet box and horizontal speed (pixels per frame)
    pub const BULLET_WIDTH: f32 = 10.0;
    pub const BULLET_HEIGHT: f32 = 4.0;
    pub const BULLET_SPEED: f32 = 10.0;

    /// Damage applied to shield or health per hit
    pub const HIT_DAMAGE: u8 = 10;
    pub const MAX_HEALTH: u8 = 100;
    pub const MAX_SHIELD: u8 = 100;

    /// Landing greeting lifetime
    pub const GREETING_MS: u32 = 2000;
}
