//! Scene drawing: bullets, avatars, shield rings, floating messages

use glam::Vec2;

use crate::platform::Surface;
use crate::sim::{Bullet, Player, RoundState, Side, Team};

pub const SHIELD_COLOR: &str = "cyan";
pub const SHIELD_LINE_WIDTH: f32 = 3.0;
pub const MESSAGE_COLOR: &str = "white";
pub const MESSAGE_FONT: &str = "18px Arial";
/// Message baseline offset from the avatar's top-left corner
pub const MESSAGE_OFFSET: Vec2 = Vec2::new(-10.0, -10.0);

pub fn team_color(team: Team) -> &'static str {
    match team {
        Team::Blue => "blue",
        Team::Red => "red",
    }
}

pub fn bullet_color(owner: Side) -> &'static str {
    match owner {
        Side::One => "cyan",
        Side::Two => "orange",
    }
}

/// Redraw the whole playfield
pub fn draw_scene(state: &RoundState, surface: &mut impl Surface) {
    surface.clear(state.playfield());
    for bullet in &state.bullets {
        draw_bullet(bullet, surface);
    }
    for player in &state.players {
        draw_player(player, surface);
    }
    for player in &state.players {
        draw_message(player, surface);
    }
}

fn draw_bullet(bullet: &Bullet, surface: &mut impl Surface) {
    surface.fill_rect(bullet.rect(), bullet_color(bullet.owner));
}

/// Filled box, plus a ring one box-width in radius while the shield is up
fn draw_player(player: &Player, surface: &mut impl Surface) {
    let rect = player.rect();
    surface.fill_rect(rect, team_color(player.team));
    if player.shield_active {
        surface.stroke_circle(rect.center(), player.size.x, SHIELD_COLOR, SHIELD_LINE_WIDTH);
    }
}

fn draw_message(player: &Player, surface: &mut impl Surface) {
    if !player.message.is_empty() {
        surface.fill_text(
            &player.message,
            player.pos + MESSAGE_OFFSET,
            MESSAGE_COLOR,
            MESSAGE_FONT,
        );
    }
}
