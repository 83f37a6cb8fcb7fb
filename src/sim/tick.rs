//! Per-frame simulation step
//!
//! One call to [`tick`] per scheduled frame. Movement is in pixels per frame,
//! so game speed follows the display refresh rate.

use super::input::{Action, Control, InputState};
use super::state::{Outcome, RoundEvent, RoundPhase, RoundState, Side};

/// Text shown above each player when they land
pub fn greeting(side: Side) -> String {
    format!("Player {}!", side.number())
}

/// Key-down for a recognized control.
///
/// Firing is edge-triggered: a shot leaves the muzzle immediately if the
/// player's latch is armed, and the latch stays cleared until [`release`].
pub fn press(state: &mut RoundState, input: &mut InputState, control: Control) {
    if control.action == Action::Fire && state.player(control.side).can_shoot {
        state.spawn_bullet(control.side);
        state.player_mut(control.side).can_shoot = false;
    }
    input.set(control, true);
}

/// Key-up for a recognized control
pub fn release(state: &mut RoundState, input: &mut InputState, control: Control) {
    input.set(control, false);
    if control.action == Action::Fire {
        state.player_mut(control.side).can_shoot = true;
    }
}

/// Advance the round by one frame
pub fn tick(state: &mut RoundState, input: &InputState) {
    match state.phase {
        RoundPhase::Intro => drop_in(state),
        RoundPhase::Playing => {
            state.frame += 1;
            move_players(state, input);
            update_shields(state, input);
            update_bullets(state);
            check_round_over(state);
        }
        RoundPhase::Ended(_) => {}
    }
}

/// Lower both players toward rest height; start play once both are down
fn drop_in(state: &mut RoundState) {
    let rest_y = state.tuning.rest_y;
    let speed = state.tuning.drop_speed;
    for player in &mut state.players {
        if player.pos.y < rest_y {
            player.pos.y = (player.pos.y + speed).min(rest_y);
        }
    }

    if state.players.iter().all(|p| p.pos.y >= rest_y) {
        for player in &mut state.players {
            player.message = greeting(player.side);
        }
        state.phase = RoundPhase::Playing;
        state.emit(RoundEvent::Landed);
    }
}

/// Each held direction moves independently, so diagonals cover more ground
/// than a single axis. Players stop flush with the playfield edge.
fn move_players(state: &mut RoundState, input: &InputState) {
    let speed = state.tuning.move_speed;
    let width = state.tuning.playfield_width;
    let height = state.tuning.playfield_height;

    for player in &mut state.players {
        let side = player.side;
        let max_x = width - player.size.x;
        let max_y = height - player.size.y;

        if input.held(side, Action::Left) && player.pos.x > 0.0 {
            player.pos.x = (player.pos.x - speed).max(0.0);
        }
        if input.held(side, Action::Right) && player.pos.x < max_x {
            player.pos.x = (player.pos.x + speed).min(max_x);
        }
        if input.held(side, Action::Up) && player.pos.y > 0.0 {
            player.pos.y = (player.pos.y - speed).max(0.0);
        }
        if input.held(side, Action::Down) && player.pos.y < max_y {
            player.pos.y = (player.pos.y + speed).min(max_y);
        }
    }
}

fn update_shields(state: &mut RoundState, input: &InputState) {
    for player in &mut state.players {
        player.shield_active = input.held(player.side, Action::Shield);
    }
}

/// Move bullets, drop the ones that left the playfield, resolve hits.
///
/// Walks back to front so removal never skips a bullet.
fn update_bullets(state: &mut RoundState) {
    let width = state.tuning.playfield_width;
    let height = state.tuning.playfield_height;
    let damage = state.tuning.hit_damage;

    for i in (0..state.bullets.len()).rev() {
        let bullet = &mut state.bullets[i];
        bullet.pos += bullet.vel;
        let bullet = *bullet;

        if bullet.out_of_bounds(width, height) {
            state.bullets.remove(i);
            state.emit(RoundEvent::BulletExpired {
                owner: bullet.owner,
            });
            continue;
        }

        // Only the opponent can be hit
        let target = state.player_mut(bullet.owner.opponent());
        if bullet.rect().intersects(&target.rect()) {
            let absorber = target.take_hit(damage);
            let event = RoundEvent::Hit {
                target: target.side,
                absorber,
                health: target.health,
                shield: target.shield,
            };
            state.bullets.remove(i);
            state.emit(event);
        }
    }
}

fn check_round_over(state: &mut RoundState) {
    let outcome = match (
        state.player(Side::One).is_down(),
        state.player(Side::Two).is_down(),
    ) {
        (true, true) => Outcome::Draw,
        (true, false) => Outcome::Winner(Side::Two),
        (false, true) => Outcome::Winner(Side::One),
        (false, false) => return,
    };
    state.phase = RoundPhase::Ended(outcome);
    state.emit(RoundEvent::RoundOver(outcome));
}
