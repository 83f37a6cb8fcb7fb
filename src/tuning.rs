//! Data-driven game balance
//!
//! Every number the simulation reads comes from here so a settings file can
//! reshape the arena without touching code.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::SettingsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Playfield extent; bullets die outside it, players are clamped to it
    pub playfield_width: f32,
    pub playfield_height: f32,

    pub player_width: f32,
    pub player_height: f32,
    /// Spawn column for player 1 and player 2
    pub spawn_x: [f32; 2],
    pub drop_start_y: f32,
    pub rest_y: f32,
    pub drop_speed: f32,
    pub move_speed: f32,

    pub bullet_width: f32,
    pub bullet_height: f32,
    /// Horizontal speed magnitude; the sign comes from the shooter's side
    pub bullet_speed: f32,

    pub hit_damage: u8,
    pub max_health: u8,
    pub max_shield: u8,

    /// How long the landing greeting stays on screen
    pub greeting_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            spawn_x: [PLAYER1_START_X, PLAYER2_START_X],
            drop_start_y: DROP_START_Y,
            rest_y: REST_Y,
            drop_speed: DROP_SPEED,
            move_speed: MOVE_SPEED,
            bullet_width: BULLET_WIDTH,
            bullet_height: BULLET_HEIGHT,
            bullet_speed: BULLET_SPEED,
            hit_damage: HIT_DAMAGE,
            max_health: MAX_HEALTH,
            max_shield: MAX_SHIELD,
            greeting_ms: GREETING_MS,
        }
    }
}

impl Tuning {
    /// Same balance, different playfield (the host knows the real canvas size)
    pub fn with_playfield(mut self, width: f32, height: f32) -> Self {
        self.playfield_width = width;
        self.playfield_height = height;
        self
    }

    /// Resize to the host's canvas. Falls back to the stock balance on that
    /// canvas, then to the stock playfield, when the result would not validate.
    pub fn fit_playfield(self, width: f32, height: f32) -> Self {
        let fitted = self.with_playfield(width, height);
        let Err(e) = fitted.validate() else {
            return fitted;
        };
        log::warn!("Stored tuning does not fit a {width}x{height} playfield ({e}), using defaults");

        let stock = Self::default().with_playfield(width, height);
        match stock.validate() {
            Ok(()) => stock,
            Err(e) => {
                log::warn!("Playfield too small for default balance ({e}), using 800x600");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            (self.playfield_width, "playfield_width"),
            (self.playfield_height, "playfield_height"),
            (self.player_width, "player_width"),
            (self.player_height, "player_height"),
            (self.drop_speed, "drop_speed"),
            (self.move_speed, "move_speed"),
            (self.bullet_width, "bullet_width"),
            (self.bullet_height, "bullet_height"),
            (self.bullet_speed, "bullet_speed"),
        ];
        for (value, field) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::InvalidTuning(format!("{field} must be positive")));
            }
        }
        if self.hit_damage == 0 {
            return Err(SettingsError::InvalidTuning("hit_damage must be positive".into()));
        }
        // Health bars are percentages; neither pool may start above the stock cap
        let pools = [
            (self.max_health, MAX_HEALTH, "max_health"),
            (self.max_shield, MAX_SHIELD, "max_shield"),
        ];
        for (value, cap, field) in pools {
            if value == 0 || value > cap {
                return Err(SettingsError::InvalidTuning(format!(
                    "{field} must be between 1 and {cap}"
                )));
            }
        }
        if self.rest_y < 0.0 || self.rest_y + self.player_height > self.playfield_height {
            return Err(SettingsError::InvalidTuning(
                "rest_y must keep players inside the playfield".into(),
            ));
        }
        if !(self.drop_start_y >= 0.0 && self.drop_start_y <= self.rest_y) {
            return Err(SettingsError::InvalidTuning(
                "drop_start_y must lie between the top edge and rest_y".into(),
            ));
        }
        for x in self.spawn_x {
            if x < 0.0 || x + self.player_width > self.playfield_width {
                return Err(SettingsError::InvalidTuning(
                    "spawn_x must keep players inside the playfield".into(),
                ));
            }
        }
        Ok(())
    }
}
