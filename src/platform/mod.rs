//! Platform abstraction layer
//!
//! The match core talks to the page only through these traits:
//! - `Surface`: 2D drawing (canvas on web)
//! - `Hud`: DOM labels, health bars, outcome text, full-screen
//! - `Timers`: one-shot delayed callbacks
//!
//! Frame scheduling stays with the host: it calls `Arena::frame` once per
//! animation frame for as long as that returns `true`.

use glam::Vec2;

use crate::sim::{Rect, Side};

/// Drawing primitives the renderer needs
pub trait Surface {
    fn clear(&mut self, region: Rect);
    fn fill_rect(&mut self, rect: Rect, color: &str);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: &str, line_width: f32);
    fn fill_text(&mut self, text: &str, pos: Vec2, color: &str, font: &str);
}

/// Page elements outside the canvas
pub trait Hud {
    /// Status label next to the health bar
    fn set_label(&mut self, side: Side, text: &str);
    /// Optional name display used by the outcome banner
    fn set_name_display(&mut self, side: Side, text: &str);
    /// Bar width and numeric text, both as a percentage
    fn set_health(&mut self, side: Side, health: u8);
    /// Outcome banner; empty text clears it
    fn set_outcome(&mut self, text: &str);
    /// Empty the free-text name field
    fn clear_name_field(&mut self, side: Side);
    /// Leave full-screen presentation if active
    fn exit_full_screen(&mut self) {}
}

/// Handle for a pending one-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(pub u64);

/// One-shot timers. When a scheduled timer fires the host passes its token
/// back to `Arena::on_timer`.
pub trait Timers {
    fn schedule(&mut self, token: TimerToken, delay_ms: u32);
    fn cancel(&mut self, token: TimerToken);
}
