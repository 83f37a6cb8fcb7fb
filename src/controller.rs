//! Round controller
//!
//! `Arena` is the single owner of everything a match mutates. The host feeds
//! it key events, animation frames and timer expiries, and lends it the
//! drawing surface, HUD and timer service for the duration of each call.

use crate::hud::{outcome_text, sync_all};
use crate::names::PlayerNames;
use crate::platform::{Hud, Surface, TimerToken, Timers};
use crate::renderer::draw_scene;
use crate::settings::{KeyBindings, Settings};
use crate::sim::{
    Action, Control, InputState, KeyDisposition, RoundEvent, RoundPhase, RoundState, Side, press,
    release, tick,
};

pub struct Arena {
    state: RoundState,
    input: InputState,
    bindings: KeyBindings,
    names: PlayerNames,
    /// Pending landing-greeting clear, if any
    greeting_timer: Option<TimerToken>,
    next_token: u64,
}

impl Arena {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: RoundState::new(settings.tuning),
            input: InputState::new(),
            bindings: settings.bindings,
            names: PlayerNames::default(),
            greeting_timer: None,
            next_token: 1,
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn greeting_timer(&self) -> Option<TimerToken> {
        self.greeting_timer
    }

    /// Push the initial labels and health into the page
    pub fn start(&mut self, hud: &mut impl Hud) {
        sync_all(hud, &self.state, &self.names);
        log::info!(
            "Round starting: {} vs {}",
            self.names.get(Side::One),
            self.names.get(Side::Two)
        );
    }

    pub fn key_down(&mut self, key: &str) -> KeyDisposition {
        let disposition = self.bindings.resolve(key);
        if let KeyDisposition::Handled(control) = disposition {
            press(&mut self.state, &mut self.input, control);
        }
        disposition
    }

    pub fn key_up(&mut self, key: &str) -> KeyDisposition {
        let disposition = self.bindings.resolve(key);
        if let KeyDisposition::Handled(control) = disposition {
            release(&mut self.state, &mut self.input, control);
        }
        disposition
    }

    /// Release every held control, e.g. when the window loses focus and the
    /// matching key-ups will never arrive
    pub fn release_all(&mut self) {
        for side in Side::BOTH {
            if self.input.held(side, Action::Fire) {
                let fire = Control {
                    side,
                    action: Action::Fire,
                };
                release(&mut self.state, &mut self.input, fire);
            }
        }
        self.input.clear();
    }

    /// Run one animation frame: step, sync the HUD, draw.
    ///
    /// Returns whether the host should schedule another frame.
    pub fn frame(
        &mut self,
        surface: &mut impl Surface,
        hud: &mut impl Hud,
        timers: &mut impl Timers,
    ) -> bool {
        tick(&mut self.state, &self.input);

        for event in self.state.drain_events() {
            match event {
                RoundEvent::Landed => {
                    log::info!("Players landed, round live");
                    self.arm_greeting_timer(timers);
                }
                RoundEvent::Hit {
                    target,
                    absorber,
                    health,
                    shield,
                } => {
                    log::debug!(
                        "Player {} hit ({:?}): health={} shield={}",
                        target.number(),
                        absorber,
                        health,
                        shield
                    );
                    hud.set_health(target, health);
                }
                RoundEvent::BulletExpired { owner } => {
                    log::trace!("Bullet from player {} left the arena", owner.number());
                }
                RoundEvent::RoundOver(outcome) => {
                    let text = outcome_text(outcome, &self.names);
                    log::info!("Round over after {} frames: {}", self.state.frame, text);
                    hud.set_outcome(&text);
                }
            }
        }

        draw_scene(&self.state, surface);
        !matches!(self.state.phase, RoundPhase::Ended(_))
    }

    /// Start over from the drop-in. Cancels the pending greeting clear first
    /// so a late expiry can't touch the new round.
    pub fn restart(&mut self, hud: &mut impl Hud, timers: &mut impl Timers) {
        hud.exit_full_screen();
        if let Some(token) = self.greeting_timer.take() {
            timers.cancel(token);
        }

        self.state.reset();
        self.names.reset();
        for side in Side::BOTH {
            hud.clear_name_field(side);
        }
        sync_all(hud, &self.state, &self.names);

        log::info!("Round restarted");
    }

    /// Name field edited
    pub fn set_name(&mut self, side: Side, raw: &str, hud: &mut impl Hud) {
        self.names.set(side, raw);
        let label = self.names.label(side);
        hud.set_label(side, &label);
        hud.set_name_display(side, &label);
    }

    /// A scheduled timer fired. Returns false for tokens that are no longer
    /// pending.
    pub fn on_timer(&mut self, token: TimerToken) -> bool {
        if self.greeting_timer != Some(token) {
            log::debug!("Ignoring stale timer {:?}", token);
            return false;
        }
        self.greeting_timer = None;
        self.state.clear_messages();
        true
    }

    fn arm_greeting_timer(&mut self, timers: &mut impl Timers) {
        if let Some(old) = self.greeting_timer.take() {
            timers.cancel(old);
        }
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        timers.schedule(token, self.state.tuning.greeting_ms);
        self.greeting_timer = Some(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::{ManualTimers, RecordingHud, RecordingSurface};
    use crate::sim::Outcome;
    use glam::Vec2;

    struct Rig {
        arena: Arena,
        surface: RecordingSurface,
        hud: RecordingHud,
        timers: ManualTimers,
    }

    impl Rig {
        fn new() -> Self {
            let mut rig = Self {
                arena: Arena::new(Settings::default()),
                surface: RecordingSurface::default(),
                hud: RecordingHud::default(),
                timers: ManualTimers::default(),
            };
            rig.arena.start(&mut rig.hud);
            rig
        }

        fn frame(&mut self) -> bool {
            self.arena.frame(&mut self.surface, &mut self.hud, &mut self.timers)
        }

        fn frames(&mut self, n: usize) -> bool {
            let mut keep_going = true;
            for _ in 0..n {
                keep_going = self.frame();
            }
            keep_going
        }

        fn land(&mut self) {
            while self.arena.state().phase == RoundPhase::Intro {
                self.frame();
            }
        }

        fn tap(&mut self, key: &str) {
            self.arena.key_down(key);
            self.arena.key_up(key);
        }

        fn restart(&mut self) {
            self.arena.restart(&mut self.hud, &mut self.timers);
        }
    }

    #[test]
    fn test_start_pushes_labels_and_health() {
        let rig = Rig::new();
        assert_eq!(rig.hud.labels, ["🟦 Player 1".to_string(), "🟥 Player 2".to_string()]);
        assert_eq!(rig.hud.health, [Some(100), Some(100)]);
        assert_eq!(rig.hud.outcome.as_deref(), Some(""));
    }

    #[test]
    fn test_landing_arms_greeting_timer() {
        let mut rig = Rig::new();
        rig.land();

        let token = rig.arena.greeting_timer().expect("greeting timer armed");
        assert_eq!(rig.timers.pending, vec![(token, 2000)]);
        assert_eq!(rig.arena.state().player(Side::One).message, "Player 1!");

        assert!(rig.arena.on_timer(token));
        assert!(rig.arena.state().players.iter().all(|p| p.message.is_empty()));
        assert_eq!(rig.arena.greeting_timer(), None);
    }

    #[test]
    fn test_restart_cancels_greeting_timer() {
        let mut rig = Rig::new();
        rig.land();
        let stale = rig.arena.greeting_timer().unwrap();

        rig.restart();
        assert_eq!(rig.timers.cancelled, vec![stale]);
        rig.land();

        // The old expiry arrives late and must not clear the new greeting
        assert!(!rig.arena.on_timer(stale));
        assert_eq!(rig.arena.state().player(Side::Two).message, "Player 2!");
        assert_ne!(rig.arena.greeting_timer(), Some(stale));
    }

    #[test]
    fn test_caps_lock_is_suppressed() {
        let mut rig = Rig::new();
        let before = rig.arena.input().clone();
        assert_eq!(rig.arena.key_down("CapsLock"), KeyDisposition::Suppressed);
        assert_eq!(rig.arena.key_up("CapsLock"), KeyDisposition::Suppressed);
        assert_eq!(rig.arena.key_down("z"), KeyDisposition::Ignored);
        assert_eq!(rig.arena.input(), &before);
    }

    #[test]
    fn test_hit_updates_health_bar() {
        let mut rig = Rig::new();
        rig.land();
        rig.tap(" ");

        rig.frames(46);

        assert_eq!(rig.hud.health, [Some(100), Some(90)]);
        assert_eq!(rig.arena.state().player(Side::Two).health, 90);
    }

    #[test]
    fn test_shield_key_soaks_hit() {
        let mut rig = Rig::new();
        rig.land();
        rig.arena.key_down("m");
        rig.tap(" ");

        rig.frames(46);

        let p2 = rig.arena.state().player(Side::Two);
        assert_eq!((p2.health, p2.shield), (100, 90));
        assert!(p2.shield_active);
    }

    #[test]
    fn test_knockout_ends_loop_and_shows_winner() {
        let mut rig = Rig::new();
        rig.arena.set_name(Side::One, "Ada", &mut rig.hud);
        rig.land();

        // Ten hits, fired far enough apart that each lands separately
        let mut keep_going = true;
        for _ in 0..10 {
            rig.tap(" ");
            keep_going = rig.frames(46);
        }

        assert!(!keep_going);
        assert_eq!(
            rig.arena.state().phase,
            RoundPhase::Ended(Outcome::Winner(Side::One))
        );
        assert_eq!(rig.hud.outcome.as_deref(), Some("🟦 Ada wins!"));
        assert_eq!(rig.hud.health, [Some(100), Some(0)]);
    }

    #[test]
    fn test_restart_from_ended_is_a_clean_slate() {
        let mut rig = Rig::new();
        rig.arena.set_name(Side::Two, "Grace", &mut rig.hud);
        rig.land();
        // Step back: shots now need 51 frames to reach player 1
        rig.arena.key_down("ArrowRight");
        rig.frames(10);
        rig.arena.key_up("ArrowRight");
        for _ in 0..10 {
            rig.tap("Enter");
            rig.frames(60);
        }
        rig.tap("Enter");
        assert!(rig.arena.state().outcome().is_some());
        assert!(!rig.arena.state().bullets.is_empty());

        rig.restart();

        assert_eq!(rig.hud.full_screen_exits, 1);
        assert_eq!(rig.hud.cleared_fields, vec![Side::One, Side::Two]);
        assert_eq!(rig.hud.outcome.as_deref(), Some(""));
        assert_eq!(rig.hud.labels[1], "🟥 Player 2");
        assert_eq!(rig.hud.health, [Some(100), Some(100)]);
        assert!(rig.arena.state().bullets.is_empty());
        assert_eq!(rig.arena.state().phase, RoundPhase::Intro);

        assert!(rig.frame());
        rig.land();
        let state = rig.arena.state();
        assert_eq!(state.player(Side::One).pos, Vec2::new(100.0, 300.0));
        assert_eq!(state.player(Side::Two).pos, Vec2::new(600.0, 300.0));
        for player in &state.players {
            assert_eq!((player.health, player.shield), (100, 100));
        }
    }

    #[test]
    fn test_release_all_rearms_fire() {
        let mut rig = Rig::new();
        rig.land();
        rig.arena.key_down(" ");
        rig.arena.key_down("d");
        rig.arena.release_all();

        assert_eq!(rig.arena.input(), &InputState::new());
        rig.arena.key_down(" ");
        assert_eq!(rig.arena.state().bullets.len(), 2);
    }

    #[test]
    fn test_release_all_drops_shield_and_movement() {
        let mut rig = Rig::new();
        rig.land();
        rig.arena.key_down("m");
        rig.arena.key_down("ArrowUp");
        rig.arena.key_down("Enter");
        rig.frame();
        assert!(rig.arena.state().player(Side::Two).shield_active);

        rig.arena.release_all();
        assert_eq!(rig.arena.input(), &InputState::new());
        let before = rig.arena.state().player(Side::Two).pos;
        rig.frame();

        let p2 = rig.arena.state().player(Side::Two);
        assert!(!p2.shield_active);
        assert_eq!(p2.pos, before);
        assert!(p2.can_shoot);
    }

    #[test]
    fn test_frame_draws_scene() {
        let mut rig = Rig::new();
        rig.frame();
        // clear + two avatars
        assert_eq!(rig.surface.calls.len(), 3);
    }
}
