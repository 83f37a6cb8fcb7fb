//! Shield Duel entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, HtmlInputElement,
        KeyboardEvent,
    };

    use shield_duel::platform::{Hud, Surface, TimerToken, Timers};
    use shield_duel::sim::{KeyDisposition, Rect, Side};
    use shield_duel::{Arena, Settings};

    /// Canvas 2D drawing
    struct CanvasSurface {
        ctx: CanvasRenderingContext2d,
    }

    impl Surface for CanvasSurface {
        fn clear(&mut self, region: Rect) {
            self.ctx.clear_rect(
                region.pos.x as f64,
                region.pos.y as f64,
                region.size.x as f64,
                region.size.y as f64,
            );
        }

        fn fill_rect(&mut self, rect: Rect, color: &str) {
            self.ctx.set_fill_style_str(color);
            self.ctx.fill_rect(
                rect.pos.x as f64,
                rect.pos.y as f64,
                rect.size.x as f64,
                rect.size.y as f64,
            );
        }

        fn stroke_circle(&mut self, center: Vec2, radius: f32, color: &str, line_width: f32) {
            self.ctx.set_stroke_style_str(color);
            self.ctx.set_line_width(line_width as f64);
            self.ctx.begin_path();
            let _ = self.ctx.arc(
                center.x as f64,
                center.y as f64,
                radius as f64,
                0.0,
                std::f64::consts::TAU,
            );
            self.ctx.stroke();
        }

        fn fill_text(&mut self, text: &str, pos: Vec2, color: &str, font: &str) {
            self.ctx.set_fill_style_str(color);
            self.ctx.set_font(font);
            let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
        }
    }

    /// DOM element ids are `p1...` / `p2...`
    fn element_id(side: Side, suffix: &str) -> String {
        format!("p{}{}", side.number(), suffix)
    }

    /// Labels, health bars and outcome banner in the page
    struct DomHud {
        document: Document,
    }

    impl Hud for DomHud {
        fn set_label(&mut self, side: Side, text: &str) {
            let selector = format!(".p{}-label", side.number());
            if let Some(el) = self.document.query_selector(&selector).ok().flatten() {
                el.set_text_content(Some(text));
            }
        }

        fn set_name_display(&mut self, side: Side, text: &str) {
            // Optional element
            if let Some(el) = self.document.get_element_by_id(&element_id(side, "NameDisplay")) {
                el.set_text_content(Some(text));
            }
        }

        fn set_health(&mut self, side: Side, health: u8) {
            let percent = format!("{health}%");
            if let Some(bar) = self
                .document
                .get_element_by_id(&element_id(side, "HealthBar"))
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            {
                let _ = bar.style().set_property("width", &percent);
            }
            if let Some(text) = self.document.get_element_by_id(&element_id(side, "HealthText")) {
                text.set_text_content(Some(&percent));
            }
        }

        fn set_outcome(&mut self, text: &str) {
            match self.document.get_element_by_id("winner") {
                Some(el) => el.set_text_content(Some(text)),
                None => log::warn!("No #winner element for outcome text"),
            }
        }

        fn clear_name_field(&mut self, side: Side) {
            if let Some(input) = self
                .document
                .get_element_by_id(&element_id(side, "Name"))
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            {
                input.set_value("");
            }
        }

        fn exit_full_screen(&mut self) {
            if self.document.fullscreen_element().is_some() {
                let _ = self.document.exit_fullscreen();
            }
        }
    }

    /// `setTimeout` timers that report back to the game by token
    struct WebTimers {
        game: Weak<RefCell<Game>>,
        handles: HashMap<TimerToken, i32>,
    }

    impl Timers for WebTimers {
        fn schedule(&mut self, token: TimerToken, delay_ms: u32) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let game = self.game.clone();
            let closure = Closure::once(move || {
                if let Some(game) = game.upgrade() {
                    let mut g = game.borrow_mut();
                    g.timers.handles.remove(&token);
                    g.arena.on_timer(token);
                }
            });
            match window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms as i32,
            ) {
                Ok(handle) => {
                    self.handles.insert(token, handle);
                }
                Err(e) => log::warn!("setTimeout failed: {:?}", e),
            }
            closure.forget();
        }

        fn cancel(&mut self, token: TimerToken) {
            if let (Some(handle), Some(window)) = (self.handles.remove(&token), web_sys::window()) {
                window.clear_timeout_with_handle(handle);
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        arena: Arena,
        surface: CanvasSurface,
        hud: DomHud,
        timers: WebTimers,
        /// Pending requestAnimationFrame, if the loop is live
        frame_handle: Option<i32>,
    }

    impl Game {
        fn frame(&mut self) -> bool {
            self.frame_handle = None;
            self.arena.frame(&mut self.surface, &mut self.hud, &mut self.timers)
        }

        fn restart(&mut self) {
            if let (Some(handle), Some(window)) = (self.frame_handle.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(handle);
            }
            self.arena.restart(&mut self.hud, &mut self.timers);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialized".into());
        }

        log::info!("Shield Duel starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let mut settings = Settings::load();
        settings.tuning = settings
            .tuning
            .fit_playfield(canvas.width() as f32, canvas.height() as f32);

        let game = Rc::new_cyclic(|weak| {
            RefCell::new(Game {
                arena: Arena::new(settings),
                surface: CanvasSurface { ctx },
                hud: DomHud {
                    document: document.clone(),
                },
                timers: WebTimers {
                    game: weak.clone(),
                    handles: HashMap::new(),
                },
                frame_handle: None,
            })
        });

        {
            let mut g = game.borrow_mut();
            let g = &mut *g;
            g.arena.start(&mut g.hud);
        }

        setup_key_handlers(&document, game.clone());
        setup_name_fields(&document, game.clone());
        setup_buttons(&document, game.clone());
        setup_focus_loss(game.clone());

        // Start with the drop-in
        request_animation_frame(game);

        log::info!("Shield Duel running!");
        Ok(())
    }

    fn setup_key_handlers(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let disposition = game.borrow_mut().arena.key_down(&event.key());
                if disposition == KeyDisposition::Suppressed {
                    event.prevent_default();
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let disposition = game.borrow_mut().arena.key_up(&event.key());
                if disposition == KeyDisposition::Suppressed {
                    event.prevent_default();
                }
            });
            let _ = document
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_name_fields(document: &Document, game: Rc<RefCell<Game>>) {
        for side in Side::BOTH {
            let Some(field) = document
                .get_element_by_id(&element_id(side, "Name"))
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                log::warn!("No name field for player {}", side.number());
                continue;
            };

            let game = game.clone();
            let field_clone = field.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                let g = &mut *g;
                g.arena.set_name(side, &field_clone.value(), &mut g.hud);
            });
            let _ = field
                .add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().restart();
                request_animation_frame(game.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("fullscreen-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                toggle_full_screen();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Key-ups are lost while the page is unfocused, so let go of everything
    fn setup_focus_loss(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().arena.release_all();
            log::info!("Window blurred, released held keys");
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn toggle_full_screen() {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if document.fullscreen_element().is_none() {
            if let Some(root) = document.document_element() {
                if let Err(e) = root.request_fullscreen() {
                    log::warn!("Full-screen request refused: {:?}", e);
                }
            }
        } else {
            let _ = document.exit_fullscreen();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let next = game.clone();
        let closure = Closure::once(move |_time: f64| {
            game_loop(next);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => game.borrow_mut().frame_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let keep_going = game.borrow_mut().frame();
        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Shield Duel (native) starting...");
    log::info!("Native mode is headless - serve the wasm build for the playable version");

    headless::scripted_duel();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Plays a scripted round without a page, logging what the HUD would show
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use shield_duel::platform::{Hud, Surface, TimerToken, Timers};
    use shield_duel::sim::{Rect, Side};
    use shield_duel::{Arena, Settings};

    #[derive(Default)]
    struct CountingSurface {
        draws: u64,
    }

    impl Surface for CountingSurface {
        fn clear(&mut self, _region: Rect) {}
        fn fill_rect(&mut self, _rect: Rect, _color: &str) {
            self.draws += 1;
        }
        fn stroke_circle(&mut self, _center: Vec2, _radius: f32, _color: &str, _line_width: f32) {
            self.draws += 1;
        }
        fn fill_text(&mut self, _text: &str, _pos: Vec2, _color: &str, _font: &str) {
            self.draws += 1;
        }
    }

    struct LogHud;

    impl Hud for LogHud {
        fn set_label(&mut self, side: Side, text: &str) {
            log::info!("label p{}: {}", side.number(), text);
        }
        fn set_name_display(&mut self, _side: Side, _text: &str) {}
        fn set_health(&mut self, side: Side, health: u8) {
            log::info!("health p{}: {}%", side.number(), health);
        }
        fn set_outcome(&mut self, text: &str) {
            if !text.is_empty() {
                log::info!("outcome: {}", text);
            }
        }
        fn clear_name_field(&mut self, _side: Side) {}
    }

    /// Frames stand in for wall time at 60 Hz
    #[derive(Default)]
    struct FrameTimers {
        pending: Vec<(TimerToken, u64)>,
    }

    impl Timers for FrameTimers {
        fn schedule(&mut self, token: TimerToken, delay_ms: u32) {
            self.pending.push((token, u64::from(delay_ms) * 60 / 1000));
        }
        fn cancel(&mut self, token: TimerToken) {
            self.pending.retain(|(t, _)| *t != token);
        }
    }

    impl FrameTimers {
        /// Advance one frame, returning the tokens that came due
        fn advance(&mut self) -> Vec<TimerToken> {
            let mut due = Vec::new();
            self.pending.retain_mut(|(token, frames_left)| {
                if *frames_left == 0 {
                    due.push(*token);
                    false
                } else {
                    *frames_left -= 1;
                    true
                }
            });
            due
        }
    }

    pub fn scripted_duel() {
        let mut arena = Arena::new(Settings::load());
        let mut surface = CountingSurface::default();
        let mut hud = LogHud;
        let mut timers = FrameTimers::default();

        arena.start(&mut hud);
        arena.set_name(Side::One, "Blue Bot", &mut hud);
        arena.set_name(Side::Two, "Red Bot", &mut hud);

        // Player 1 fires every 30 frames; player 2 shields every other volley
        let mut frame: u64 = 0;
        while arena.frame(&mut surface, &mut hud, &mut timers) {
            for token in timers.advance() {
                arena.on_timer(token);
            }
            frame += 1;
            if frame % 30 == 0 && arena.state().is_running() {
                arena.key_down(" ");
                arena.key_up(" ");
                if (frame / 30) % 2 == 0 {
                    arena.key_down("m");
                } else {
                    arena.key_up("m");
                }
            }
            if frame > 100_000 {
                log::warn!("Scripted duel did not finish");
                break;
            }
        }

        log::info!(
            "Scripted duel finished after {} frames, {} draw calls",
            frame,
            surface.draws
        );
    }
}
