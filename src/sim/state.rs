//! Round state and entity types
//!
//! Everything the simulation mutates lives in [`RoundState`]; presentation
//! only ever reads it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::tuning::Tuning;

/// Which of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::One, Side::Two];

    pub fn opponent(self) -> Side {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }

    /// 1 or 2, as shown to players
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    /// Horizontal firing direction: player 1 shoots right, player 2 left
    pub fn facing(self) -> f32 {
        match self {
            Side::One => 1.0,
            Side::Two => -1.0,
        }
    }
}

/// Player colour tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Team {
    Blue,
    Red,
}

impl Team {
    pub fn for_side(side: Side) -> Self {
        match side {
            Side::One => Team::Blue,
            Side::Two => Team::Red,
        }
    }
}

/// Which pool soaked up a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Absorber {
    Shield,
    Health,
}

/// A player avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub side: Side,
    pub pos: Vec2,
    pub size: Vec2,
    pub team: Team,
    pub health: u8,
    pub shield: u8,
    /// Mirrors the shield key every playing frame
    pub shield_active: bool,
    /// Floating text above the avatar (empty = none)
    pub message: String,
    /// Fire latch: cleared by a shot, re-armed when the fire key is released
    pub can_shoot: bool,
}

impl Player {
    /// A fresh player at the top of its spawn column
    pub fn new(side: Side, tuning: &Tuning) -> Self {
        Self {
            side,
            pos: Vec2::new(tuning.spawn_x[side.index()], tuning.drop_start_y),
            size: Vec2::new(tuning.player_width, tuning.player_height),
            team: Team::for_side(side),
            health: tuning.max_health,
            shield: tuning.max_shield,
            shield_active: false,
            message: String::new(),
            can_shoot: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    pub fn is_down(&self) -> bool {
        self.health == 0
    }

    /// Apply one hit. A raised shield with charge left takes the whole hit,
    /// otherwise health does. Both floor at zero.
    pub fn take_hit(&mut self, damage: u8) -> Absorber {
        if self.shield_active && self.shield > 0 {
            self.shield = self.shield.saturating_sub(damage);
            Absorber::Shield
        } else {
            self.health = self.health.saturating_sub(damage);
            Absorber::Health
        }
    }

    /// Where a new bullet appears: just past the leading edge, vertically centred
    pub fn muzzle(&self, bullet_size: Vec2) -> Vec2 {
        let x = match self.side {
            Side::One => self.pos.x + self.size.x,
            Side::Two => self.pos.x - bullet_size.x,
        };
        let y = self.pos.y + self.size.y / 2.0 - bullet_size.y / 2.0;
        Vec2::new(x, y)
    }
}

/// A projectile in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    /// Per-frame displacement
    pub vel: Vec2,
    pub owner: Side,
}

impl Bullet {
    pub fn fired_by(player: &Player, tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.bullet_width, tuning.bullet_height);
        Self {
            pos: player.muzzle(size),
            size,
            vel: Vec2::new(tuning.bullet_speed * player.side.facing(), 0.0),
            owner: player.side,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Out once its origin corner leaves the playfield
    pub fn out_of_bounds(&self, width: f32, height: f32) -> bool {
        !Rect::new(0.0, 0.0, width, height).contains_point(self.pos)
    }
}

/// How a round finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Side),
    Draw,
}

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Players dropping in; no physics
    Intro,
    /// Simulation runs every frame
    Playing,
    /// Someone's health hit zero; frozen until restart
    Ended(Outcome),
}

/// Things presentation may want to react to, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// Both players reached rest height; play begins
    Landed,
    Hit {
        target: Side,
        absorber: Absorber,
        health: u8,
        shield: u8,
    },
    BulletExpired { owner: Side },
    RoundOver(Outcome),
}

/// Complete state of one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub tuning: Tuning,
    pub phase: RoundPhase,
    pub players: [Player; 2],
    /// Live bullets in firing order
    pub bullets: Vec<Bullet>,
    /// Playing frames stepped this round
    pub frame: u64,
    #[serde(skip)]
    events: Vec<RoundEvent>,
}

impl RoundState {
    pub fn new(tuning: Tuning) -> Self {
        let players = [Player::new(Side::One, &tuning), Player::new(Side::Two, &tuning)];
        Self {
            tuning,
            phase: RoundPhase::Intro,
            players,
            bullets: Vec::new(),
            frame: 0,
            events: Vec::new(),
        }
    }

    /// Back to a fresh intro. Fire latches survive: they track physical keys.
    pub fn reset(&mut self) {
        for player in &mut self.players {
            let can_shoot = player.can_shoot;
            *player = Player::new(player.side, &self.tuning);
            player.can_shoot = can_shoot;
        }
        self.bullets.clear();
        self.phase = RoundPhase::Intro;
        self.frame = 0;
        self.events.clear();
    }

    #[inline]
    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    #[inline]
    pub fn player_mut(&mut self, side: Side) -> &mut Player {
        &mut self.players[side.index()]
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Playing
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            RoundPhase::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn playfield(&self) -> Rect {
        Rect::new(0.0, 0.0, self.tuning.playfield_width, self.tuning.playfield_height)
    }

    /// Queue a bullet at `side`'s muzzle
    pub fn spawn_bullet(&mut self, side: Side) {
        let bullet = Bullet::fired_by(self.player(side), &self.tuning);
        self.bullets.push(bullet);
    }

    pub fn clear_messages(&mut self) {
        for player in &mut self.players {
            player.message.clear();
        }
    }

    pub(crate) fn emit(&mut self, event: RoundEvent) {
        self.events.push(event);
    }

    /// Take everything emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round_defaults() {
        let state = RoundState::new(Tuning::default());
        assert_eq!(state.phase, RoundPhase::Intro);
        assert_eq!(state.player(Side::One).pos, Vec2::new(100.0, 0.0));
        assert_eq!(state.player(Side::Two).pos, Vec2::new(600.0, 0.0));
        assert_eq!(state.player(Side::Two).team, Team::Red);
        for player in &state.players {
            assert_eq!(player.health, 100);
            assert_eq!(player.shield, 100);
            assert!(player.can_shoot);
            assert!(player.message.is_empty());
        }
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_muzzle_positions() {
        let mut state = RoundState::new(Tuning::default());
        state.player_mut(Side::One).pos = Vec2::new(100.0, 300.0);
        state.player_mut(Side::Two).pos = Vec2::new(600.0, 300.0);

        state.spawn_bullet(Side::One);
        state.spawn_bullet(Side::Two);

        let b1 = state.bullets[0];
        assert_eq!(b1.pos, Vec2::new(140.0, 318.0));
        assert_eq!(b1.vel, Vec2::new(10.0, 0.0));
        assert_eq!(b1.owner, Side::One);

        let b2 = state.bullets[1];
        assert_eq!(b2.pos, Vec2::new(590.0, 318.0));
        assert_eq!(b2.vel, Vec2::new(-10.0, 0.0));
    }

    #[test]
    fn test_take_hit_prefers_raised_shield() {
        let mut player = Player::new(Side::Two, &Tuning::default());
        player.shield_active = true;
        assert_eq!(player.take_hit(10), Absorber::Shield);
        assert_eq!((player.shield, player.health), (90, 100));

        player.shield_active = false;
        assert_eq!(player.take_hit(10), Absorber::Health);
        assert_eq!((player.shield, player.health), (90, 90));
    }

    #[test]
    fn test_take_hit_floors_at_zero() {
        let mut player = Player::new(Side::One, &Tuning::default());
        player.shield_active = true;
        player.shield = 5;
        assert_eq!(player.take_hit(10), Absorber::Shield);
        assert_eq!((player.shield, player.health), (0, 100));

        // Empty shield no longer protects even while raised
        assert_eq!(player.take_hit(10), Absorber::Health);
        player.health = 4;
        player.take_hit(10);
        assert_eq!(player.health, 0);
        assert!(player.is_down());
    }

    #[test]
    fn test_reset_keeps_fire_latch() {
        let mut state = RoundState::new(Tuning::default());
        state.player_mut(Side::One).can_shoot = false;
        state.player_mut(Side::Two).health = 0;
        state.player_mut(Side::Two).message = "Player 2!".into();
        state.spawn_bullet(Side::Two);
        state.phase = RoundPhase::Ended(Outcome::Winner(Side::One));

        state.reset();

        assert_eq!(state.phase, RoundPhase::Intro);
        assert!(!state.player(Side::One).can_shoot);
        assert_eq!(state.player(Side::Two).health, 100);
        assert!(state.player(Side::Two).message.is_empty());
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_bullet_bounds() {
        let tuning = Tuning::default();
        let player = Player::new(Side::One, &tuning);
        let mut bullet = Bullet::fired_by(&player, &tuning);
        bullet.pos = Vec2::new(800.0, 10.0);
        assert!(!bullet.out_of_bounds(800.0, 600.0));
        bullet.pos.x = 800.5;
        assert!(bullet.out_of_bounds(800.0, 600.0));
        bullet.pos = Vec2::new(-0.1, 10.0);
        assert!(bullet.out_of_bounds(800.0, 600.0));
    }
}
