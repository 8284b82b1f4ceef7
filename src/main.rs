//! Slice Beats entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent,
    };

    use slice_beats::consts::SIM_DT;
    use slice_beats::highscores::format_date;
    use slice_beats::profile::BUILTIN_PROFILES;
    use slice_beats::render::{DrawCommand, Rect, Rgba, TextAlign};
    use slice_beats::sim::GamePhase;
    use slice_beats::{FrameDriver, HighScores, QualityPreset, Settings};

    /// Game instance holding all state
    struct Game {
        driver: FrameDriver,
        ctx: CanvasRenderingContext2d,
        canvas: HtmlCanvasElement,
        highscores: HighScores,
        /// Rank of the run that just ended, if it made the board
        last_rank: Option<usize>,
        last_time: f64,
        overlay: Vec<DrawCommand>,
    }

    impl Game {
        /// Convert a client-space position to arena coordinates
        fn to_arena(&self, x: f32, y: f32) -> Vec2 {
            let arena = self.driver.profile().arena();
            let w = self.canvas.client_width().max(1) as f32;
            let h = self.canvas.client_height().max(1) as f32;
            Vec2::new(x * arena.x / w, y * arena.y / h)
        }

        /// Click, tap, space or enter: leave whatever screen we are on
        fn advance_phase(&mut self) {
            match self.driver.hud().phase {
                GamePhase::Idle => self.driver.start(),
                GamePhase::GameOver | GamePhase::Won => self.driver.restart(),
                GamePhase::Playing => {}
            }
        }

        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            let Game { driver, ctx, .. } = &mut *self;
            replay(ctx, driver.frame(dt, time));

            if let Some(summary) = self.driver.just_ended() {
                let profile = self.driver.profile().name.clone();
                self.last_rank = self
                    .highscores
                    .add_score(&summary, &profile, js_sys::Date::now());
                if self.last_rank.is_some() {
                    self.highscores.save();
                }
            }

            self.overlay.clear();
            build_overlay(&self.driver, &self.highscores, self.last_rank, &mut self.overlay);
            replay(&self.ctx, &self.overlay);
        }

        fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) {
            let mut settings = self.driver.settings().clone();
            change(&mut settings);
            match self.driver.set_settings(settings) {
                Ok(()) => self.driver.settings().save(),
                Err(e) => log::warn!("Settings rejected: {}", e),
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Slice Beats starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let driver = match FrameDriver::new(Settings::load(), seed) {
            Ok(driver) => driver,
            Err(e) => {
                log::warn!("Stored settings unusable ({}), using defaults", e);
                FrameDriver::new(Settings::default(), seed).map_err(|e| e.to_string())?
            }
        };

        // Backing store in device pixels, drawing in arena units
        let arena = driver.profile().arena();
        let dpr = window.device_pixel_ratio();
        canvas.set_width((arena.x as f64 * dpr) as u32);
        canvas.set_height((arena.y as f64 * dpr) as u32);
        ctx.scale(dpr, dpr)?;
        // The saber replaces the system cursor
        canvas.style().set_property("cursor", "none")?;

        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            driver,
            ctx,
            canvas: canvas.clone(),
            highscores: HighScores::load(),
            last_rank: None,
            last_time: 0.0,
            overlay: Vec::new(),
        }));

        setup_input_handlers(&canvas, game.clone())?;
        request_animation_frame(game);

        log::info!("Slice Beats running!");
        Ok(())
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = g.to_arena(event.offset_x() as f32, event.offset_y() as f32);
                g.driver.pointer_moved(pos.x, pos.y);
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse click (start / restart)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().advance_phase();
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch: first finger is the pointer, a new touch also starts / restarts
        for (kind, advances) in [("touchstart", true), ("touchmove", false)] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if advances {
                    g.advance_phase();
                }
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    let pos = g.to_arena(x, y);
                    g.driver.pointer_moved(pos.x, pos.y);
                }
            });
            canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().ok_or("no window")?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                match key.as_str() {
                    " " | "Enter" => g.advance_phase(),
                    "i" | "I" => g.driver.toggle_demo(),
                    "f" | "F" => g.update_settings(|s| s.show_fps = !s.show_fps),
                    "q" | "Q" => g.update_settings(|s| {
                        let next = match s.quality {
                            QualityPreset::Low => QualityPreset::Medium,
                            QualityPreset::Medium => QualityPreset::High,
                            QualityPreset::High => QualityPreset::Low,
                        };
                        s.apply_preset(next);
                        if next != QualityPreset::Low {
                            s.glow = true;
                        }
                    }),
                    "m" | "M" => g.update_settings(|s| s.reduced_motion = !s.reduced_motion),
                    _ => {
                        // 1-5 pick a built-in profile
                        let picked = key
                            .parse::<usize>()
                            .ok()
                            .and_then(|n| n.checked_sub(1))
                            .and_then(|i| BUILTIN_PROFILES.get(i));
                        if let Some(name) = picked {
                            g.update_settings(|s| s.profile = name.to_string());
                        }
                    }
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().update(time);
        request_animation_frame(game);
    }

    /// Score line and the start / end screens, drawn over the scene
    fn build_overlay(
        driver: &FrameDriver,
        scores: &HighScores,
        rank: Option<usize>,
        out: &mut Vec<DrawCommand>,
    ) {
        let hud = driver.hud();
        let arena = driver.profile().arena();
        let center_x = arena.x / 2.0;
        let text = |out: &mut Vec<DrawCommand>, y: f32, s: String, size: f32, color: Rgba| {
            out.push(DrawCommand::Text {
                pos: Vec2::new(center_x, y),
                text: s,
                size,
                bold: true,
                color,
                align: TextAlign::Center,
            });
        };

        match hud.phase {
            GamePhase::Playing => {
                out.push(DrawCommand::Text {
                    pos: Vec2::new(20.0, arena.y - 30.0),
                    text: format!("Score: {}   Combo: x{}", hud.score, hud.combo),
                    size: 22.0,
                    bold: true,
                    color: Rgba::WHITE,
                    align: TextAlign::Left,
                });
            }
            GamePhase::Idle => {
                out.push(DrawCommand::FillRect {
                    rect: Rect::new(0.0, 0.0, arena.x, arena.y),
                    color: Rgba::BLACK.with_alpha(0.5),
                });
                text(out, arena.y * 0.35, "SLICE BEATS".into(), 64.0, Rgba::SABER_BLUE);
                text(
                    out,
                    arena.y * 0.5,
                    format!("Profile: {}  (keys 1-5 to change)", driver.profile().name),
                    20.0,
                    Rgba::WHITE,
                );
                text(out, arena.y * 0.6, "Click to start".into(), 28.0, Rgba::WHITE);
            }
            GamePhase::GameOver | GamePhase::Won => {
                let Some(summary) = driver.summary() else {
                    return;
                };
                out.push(DrawCommand::FillRect {
                    rect: Rect::new(0.0, 0.0, arena.x, arena.y),
                    color: Rgba::BLACK.with_alpha(0.6),
                });
                let (title, color) = if summary.won {
                    ("YOU WIN!", Rgba::SABER_BLUE)
                } else {
                    ("GAME OVER", Rgba::SABER_RED)
                };
                text(out, arena.y * 0.2, title.into(), 56.0, color);
                text(
                    out,
                    arena.y * 0.3,
                    format!("Score: {}   Max combo: x{}", summary.score, summary.max_combo),
                    26.0,
                    Rgba::WHITE,
                );
                if let Some(rank) = rank {
                    text(out, arena.y * 0.36, format!("New high score! #{}", rank), 22.0, Rgba::WARNING);
                }
                for (i, entry) in scores.entries.iter().take(5).enumerate() {
                    text(
                        out,
                        arena.y * 0.45 + i as f32 * 28.0,
                        format!(
                            "{}. {}  x{}  {}  {}",
                            i + 1,
                            entry.score,
                            entry.max_combo,
                            entry.profile,
                            format_date(entry.timestamp)
                        ),
                        18.0,
                        Rgba::WHITE.with_alpha(0.8),
                    );
                }
                text(out, arena.y * 0.85, "Click to play again".into(), 26.0, Rgba::WHITE);
            }
        }
    }

    /// Execute draw commands on the 2D context
    fn replay(ctx: &CanvasRenderingContext2d, commands: &[DrawCommand]) {
        for cmd in commands {
            match cmd {
                DrawCommand::Save => ctx.save(),
                DrawCommand::Restore => ctx.restore(),
                DrawCommand::Translate(v) => {
                    let _ = ctx.translate(v.x as f64, v.y as f64);
                }
                DrawCommand::Rotate(angle) => {
                    let _ = ctx.rotate(*angle as f64);
                }
                DrawCommand::SetAlpha(alpha) => ctx.set_global_alpha(*alpha as f64),
                DrawCommand::SetShadow { blur, color } => {
                    ctx.set_shadow_blur(*blur as f64);
                    ctx.set_shadow_color(&color.to_css());
                }
                DrawCommand::ClipRect(r) => {
                    ctx.begin_path();
                    ctx.rect(r.x as f64, r.y as f64, r.w as f64, r.h as f64);
                    ctx.clip();
                }
                DrawCommand::FillRect { rect: r, color } => {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.fill_rect(r.x as f64, r.y as f64, r.w as f64, r.h as f64);
                }
                DrawCommand::StrokeRect { rect: r, color, width } => {
                    ctx.set_stroke_style_str(&color.to_css());
                    ctx.set_line_width(*width as f64);
                    ctx.stroke_rect(r.x as f64, r.y as f64, r.w as f64, r.h as f64);
                }
                DrawCommand::FillCircle { center, radius, color } => {
                    ctx.begin_path();
                    let _ = ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU);
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.fill();
                }
                DrawCommand::StrokeCircle {
                    center,
                    radius,
                    color,
                    width,
                } => {
                    ctx.begin_path();
                    let _ = ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU);
                    ctx.set_stroke_style_str(&color.to_css());
                    ctx.set_line_width(*width as f64);
                    ctx.stroke();
                }
                DrawCommand::Line {
                    from,
                    to,
                    color,
                    width,
                } => {
                    ctx.begin_path();
                    ctx.move_to(from.x as f64, from.y as f64);
                    ctx.line_to(to.x as f64, to.y as f64);
                    ctx.set_line_cap("round");
                    ctx.set_stroke_style_str(&color.to_css());
                    ctx.set_line_width(*width as f64);
                    ctx.stroke();
                }
                DrawCommand::Text {
                    pos,
                    text,
                    size,
                    bold,
                    color,
                    align,
                } => {
                    let weight = if *bold { "bold " } else { "" };
                    ctx.set_font(&format!("{}{}px Arial, sans-serif", weight, size));
                    ctx.set_text_align(align.as_str());
                    ctx.set_text_baseline("middle");
                    ctx.set_fill_style_str(&color.to_css());
                    let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
                }
                DrawCommand::GradientRect {
                    rect: r,
                    from,
                    to,
                    stops,
                } => {
                    let gradient =
                        ctx.create_linear_gradient(from.x as f64, from.y as f64, to.x as f64, to.y as f64);
                    for (offset, color) in stops {
                        let _ = gradient.add_color_stop(*offset, &color.to_css());
                    }
                    ctx.set_fill_style_canvas_gradient(&gradient);
                    ctx.fill_rect(r.x as f64, r.y as f64, r.w as f64, r.h as f64);
                }
            }
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
    log::info!("Slice Beats (native) starting...");
    log::info!("Native mode runs a headless demo; use `trunk serve` for the web version");

    run_headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Let the autopilot play one minute of every built-in profile
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo() {
    use slice_beats::consts::SIM_DT;
    use slice_beats::profile::BUILTIN_PROFILES;
    use slice_beats::{FrameDriver, HighScores, Settings};

    let mut scores = HighScores::new();

    for name in BUILTIN_PROFILES {
        let settings = Settings {
            profile: name.to_string(),
            ..Settings::default()
        };
        let mut driver = match FrameDriver::new(settings, 42) {
            Ok(driver) => driver,
            Err(e) => {
                log::error!("Cannot run {}: {}", name, e);
                continue;
            }
        };
        driver.set_demo(true);

        let mut time = 0.0;
        for _ in 0..60 * 60 {
            time += f64::from(SIM_DT) * 1000.0;
            driver.frame(SIM_DT, time);
            if let Some(summary) = driver.just_ended() {
                scores.add_score(&summary, name, time);
            }
        }

        let hud = driver.hud();
        println!(
            "{:<10} score {:>6}  max combo {:>3}  missed {}/{}  phase {:?}",
            name, hud.score, hud.max_combo, hud.missed, hud.max_missed, hud.phase
        );
    }

    if let Some(top) = scores.top_score() {
        println!("Best finished run: {}", top);
    }
}
