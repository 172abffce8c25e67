//! Brick Invaders - Main entry point
//!
//! Browser: a 2D canvas host driven by requestAnimationFrame.
//! Native: a headless autopilot run that tessellates every frame.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use brick_invaders::consts::FRAME_DT;
    use brick_invaders::renderer::{Color, Surface};
    use brick_invaders::sim::{Bounds, TickInput};
    use brick_invaders::{Game, LoopStatus, Settings, Tuning};
    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent};

    /// Max simulation steps per animation frame (avoids a spiral of death)
    const MAX_SUBSTEPS: u32 = 4;

    /// `Surface` over a canvas 2D context
    struct CanvasSurface {
        ctx: CanvasRenderingContext2d,
        width: f64,
        height: f64,
    }

    impl CanvasSurface {
        fn trace(&self, points: &[Vec2]) {
            self.ctx.begin_path();
            if let Some((first, rest)) = points.split_first() {
                self.ctx.move_to(f64::from(first.x), f64::from(first.y));
                for p in rest {
                    self.ctx.line_to(f64::from(p.x), f64::from(p.y));
                }
            }
        }
    }

    impl Surface for CanvasSurface {
        fn clear(&mut self) {
            self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        }

        fn set_fill(&mut self, color: Color) {
            self.ctx.set_fill_style_str(&color.to_css());
        }

        fn set_stroke(&mut self, color: Color) {
            self.ctx.set_stroke_style_str(&color.to_css());
        }

        fn set_shadow(&mut self, blur: f32, color: Color) {
            self.ctx.set_shadow_blur(f64::from(blur));
            self.ctx.set_shadow_color(&color.to_css());
        }

        fn fill_rect(&mut self, pos: Vec2, size: Vec2) {
            self.ctx.fill_rect(
                f64::from(pos.x),
                f64::from(pos.y),
                f64::from(size.x),
                f64::from(size.y),
            );
        }

        fn fill_circle(&mut self, center: Vec2, radius: f32) {
            self.ctx.begin_path();
            let _ = self.ctx.arc(
                f64::from(center.x),
                f64::from(center.y),
                f64::from(radius),
                0.0,
                std::f64::consts::TAU,
            );
            self.ctx.fill();
        }

        fn fill_path(&mut self, points: &[Vec2]) {
            self.trace(points);
            self.ctx.close_path();
            self.ctx.fill();
        }

        fn stroke_path(&mut self, points: &[Vec2]) {
            self.trace(points);
            self.ctx.stroke();
        }

        fn fill_text(&mut self, text: &str, pos: Vec2, font_px: f32) {
            self.ctx.set_font(&format!("{font_px}px Arial"));
            let _ = self.ctx.fill_text(text, f64::from(pos.x), f64::from(pos.y));
        }
    }

    /// Browser-side state shared between event closures and the frame loop
    struct Host {
        game: Game,
        surface: CanvasSurface,
        input: TickInput,
        accumulator: f32,
        last_time: f64,
    }

    impl Host {
        /// Run simulation steps for the elapsed time, then draw once
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
                let status = self.game.step(&self.input, FRAME_DT);
                self.accumulator -= FRAME_DT;
                substeps += 1;

                // One-shot input
                self.input.click = false;
                if status == LoopStatus::GameOver {
                    self.accumulator = 0.0;
                    break;
                }
            }

            self.game.draw(&mut self.surface);
        }
    }

    fn window() -> Result<web_sys::Window, JsValue> {
        web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&format!("logger init failed: {e}")));
        }

        log::info!("Brick Invaders starting...");

        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        // Fill the window
        let width = window.inner_width()?.as_f64().unwrap_or(800.0);
        let height = window.inner_height()?.as_f64().unwrap_or(600.0);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(
            Bounds::new(width as f32, height as f32),
            seed,
            Tuning::default(),
            Settings::default(),
        );

        let host = Rc::new(RefCell::new(Host {
            game,
            surface: CanvasSurface { ctx, width, height },
            input: TickInput::default(),
            accumulator: 0.0,
            last_time: 0.0,
        }));

        setup_input_handlers(&window, &canvas, host.clone())?;
        request_animation_frame(host)?;

        log::info!("Brick Invaders running (seed {seed})");
        Ok(())
    }

    /// Pointer x relative to the canvas
    fn canvas_x(canvas: &HtmlCanvasElement, client_x: i32) -> f32 {
        let rect = canvas.get_bounding_client_rect();
        (f64::from(client_x) - rect.left()) as f32
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        host: Rc<RefCell<Host>>,
    ) -> Result<(), JsValue> {
        // Mouse move anywhere in the window steers the paddle
        {
            let host = host.clone();
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let x = canvas_x(&canvas, event.client_x());
                host.borrow_mut().input.pointer_x = Some(x);
            });
            window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch move
        {
            let host = host.clone();
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let x = canvas_x(&canvas, touch.client_x());
                    host.borrow_mut().input.pointer_x = Some(x);
                }
            });
            window.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Click (restart on the game over screen)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                host.borrow_mut().input.click = true;
            });
            canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) -> Result<(), JsValue> {
        let closure = Closure::once(move |time: f64| {
            game_loop(host, time);
        });
        window()?.request_animation_frame(closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
        {
            let mut h = host.borrow_mut();

            // Calculate delta time
            let dt = if h.last_time > 0.0 {
                ((time - h.last_time) / 1000.0) as f32
            } else {
                FRAME_DT
            };
            h.last_time = time;

            h.update(dt);
        }

        if let Err(e) = request_animation_frame(host) {
            log::error!("Frame loop stopped: {e:?}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use brick_invaders::consts::FRAME_DT;
    use brick_invaders::renderer::VertexBatch;
    use brick_invaders::sim::{Bounds, TickInput};
    use brick_invaders::{Game, LoopStatus, Settings, Tuning};

    const DEFAULT_FRAMES: u64 = 60 * 60 * 5;
    const PLAYFIELD: Bounds = Bounds::new(800.0, 600.0);
    const LOG_EVERY: u64 = 600;

    /// Load a JSON config from the path in `var`, falling back to defaults
    fn load_config<T: Default>(var: &str, parse: fn(&str) -> Result<T, serde_json::Error>) -> T {
        let Ok(path) = std::env::var(var) else {
            return T::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => match parse(&json) {
                Ok(config) => {
                    log::info!("Loaded {var} from {path}");
                    config
                }
                Err(e) => {
                    log::warn!("Invalid {var} file {path}: {e}; using defaults");
                    T::default()
                }
            },
            Err(e) => {
                log::warn!("Can't read {var} file {path}: {e}; using defaults");
                T::default()
            }
        }
    }

    fn parse_arg<T: std::str::FromStr>(arg: Option<String>, name: &str, default: T) -> T {
        match arg {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid {name} '{raw}'");
                default
            }),
            None => default,
        }
    }

    /// `brick-invaders [seed] [frames]`
    pub fn run() {
        let mut args = std::env::args().skip(1);
        let clock_seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let seed = parse_arg(args.next(), "seed", clock_seed);
        let frames = parse_arg(args.next(), "frame count", DEFAULT_FRAMES);

        let tuning = load_config("BRICK_INVADERS_TUNING", Tuning::from_json);
        let settings = load_config("BRICK_INVADERS_SETTINGS", Settings::from_json);

        let mut game = Game::new(PLAYFIELD, seed, tuning, settings);
        let mut batch = VertexBatch::new();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };

        let mut played = 0;
        for frame in 1..=frames {
            played = frame;
            let status = game.frame(&input, FRAME_DT, &mut batch);
            if frame % LOG_EVERY == 0 {
                let state = game.state();
                log::info!(
                    "frame {frame}: round {} ({:?}), score {}, lives {}, {} bricks, {} triangles",
                    state.round,
                    state.round_kind,
                    state.score,
                    state.lives,
                    state.bricks.len(),
                    batch.triangle_count()
                );
            }
            if status == LoopStatus::GameOver {
                break;
            }
        }

        let state = game.state();
        println!(
            "seed {seed}: {played} frames, round {}, score {}, lives {}{}",
            state.round,
            state.score,
            state.lives,
            if state.is_game_over() { " (game over)" } else { "" }
        );

        if let Ok(path) = std::env::var("BRICK_INVADERS_SNAPSHOT") {
            save_snapshot(&game, &path);
        }
    }

    /// Write the final session state as JSON
    fn save_snapshot(game: &Game, path: &str) {
        match serde_json::to_string_pretty(game.state()) {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => log::info!("Saved state snapshot to {path}"),
                Err(e) => log::warn!("Can't write snapshot {path}: {e}"),
            },
            Err(e) => log::warn!("Can't serialize state: {e}"),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brick Invaders (native, headless autopilot) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
