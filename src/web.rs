//! Browser side of the game: canvas rendering, HUD text, keyboard listener and the
//! requestAnimationFrame loop that drives [`Game::step`].
//!
//! The session lives in one `Rc<RefCell<WebGame>>`. The frame closure and the
//! `FarmGame` handle hold clones of it; the keyboard listener only holds the
//! shared [`KeyQueue`], which the frame loop drains at the start of every frame.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, window};

use crate::config::GameConfig;
use crate::farm::crop::CROP_SIZE;
use crate::farm::farmer::{FARMER_SIZE, SCYTHE_RANGE};
use crate::farm::obstacle::{OBSTACLE_H, OBSTACLE_W};
use crate::farm::{Arena, Bounded, Crop, CropKind, Farmer, FrameOutcome, Game, Key, KeyQueue, Obstacle};

const GROUND_TILE: f64 = 32.0;

// --- Session handle ------------------------------------------------------------

struct WebGame {
    ctx: CanvasRenderingContext2d,
    game: Game,
    input: KeyQueue,
    hud: Hud,
    frame_pending: bool, // a requestAnimationFrame is outstanding
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// JS-facing game handle. `start()` / `reset()` (re)initialize the session and
/// make sure exactly one frame loop is running.
#[wasm_bindgen]
#[derive(Clone)]
pub struct FarmGame {
    inner: Rc<RefCell<WebGame>>,
    frame: FrameCallback,
}

#[wasm_bindgen]
impl FarmGame {
    /// `new FarmGame(canvas, { initialTime, spawnInterval })` with `initialTime`
    /// in seconds and `spawnInterval` in milliseconds. The options object and
    /// either field may be omitted; missing or invalid values use the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, options: JsValue) -> Result<FarmGame, JsValue> {
        Self::build(canvas, config_from_options(&options))
    }

    pub fn start(&self) -> Result<(), JsValue> {
        self.inner.borrow_mut().game.start(performance_now());
        self.resume()
    }

    pub fn reset(&self) -> Result<(), JsValue> {
        self.inner.borrow_mut().game.reset(performance_now());
        self.resume()
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.inner.borrow().game.is_running()
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> u32 {
        self.inner.borrow().game.score()
    }

    #[wasm_bindgen(getter)]
    pub fn level(&self) -> u32 {
        self.inner.borrow().game.level()
    }
}

#[cfg(feature = "serde_json")]
#[wasm_bindgen]
impl FarmGame {
    /// Same as the constructor with options given as JSON text.
    #[wasm_bindgen(js_name = withConfigJson)]
    pub fn with_config_json(canvas: HtmlCanvasElement, json: &str) -> Result<FarmGame, JsValue> {
        let config = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::build(canvas, config)
    }
}

/// Read `{ initialTime, spawnInterval }` from a JS options object. Non-numeric
/// fields count as missing.
fn config_from_options(options: &JsValue) -> GameConfig {
    if !options.is_object() {
        return GameConfig::default();
    }
    let field = |name: &str| {
        js_sys::Reflect::get(options, &JsValue::from_str(name))
            .ok()
            .and_then(|v| v.as_f64())
    };
    GameConfig::new(field("initialTime"), field("spawnInterval"))
}

impl FarmGame {
    fn build(canvas: HtmlCanvasElement, config: GameConfig) -> Result<FarmGame, JsValue> {
        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let doc = win
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;
        let arena = Arena::new(canvas.width() as f64, canvas.height() as f64);

        let input = KeyQueue::new();
        input.set_open(false); // until the first start()
        let state = WebGame {
            ctx,
            game: Game::new(arena, config),
            input: input.clone(),
            hud: Hud::attach(&doc)?,
            frame_pending: false,
        };
        let inner = Rc::new(RefCell::new(state));
        let frame = frame_loop(inner.clone());

        // Keyboard: recognized keys go to the queue, everything else is ignored.
        // The queue drops keys while no session is running.
        {
            let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
                if let Some(key) = Key::from_key_name(&evt.key()) {
                    evt.prevent_default(); // arrows / space would scroll the page
                    input.push(key);
                }
            }) as Box<dyn FnMut(_)>);
            doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        info!("farm ready: {}x{} arena, {:?}", arena.width, arena.height, config);
        Ok(FarmGame { inner, frame })
    }

    fn resume(&self) -> Result<(), JsValue> {
        let mut guard = self.inner.borrow_mut();
        let state = &mut *guard;
        state.input.clear();
        state.input.set_open(true);
        state.hud.refresh(&state.game);
        if !state.frame_pending {
            request_frame(&self.frame)?;
            state.frame_pending = true;
        }
        Ok(())
    }
}

// --- Frame loop ------------------------------------------------------------------

fn frame_loop(inner: Rc<RefCell<WebGame>>) -> FrameCallback {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        let outcome = {
            let mut guard = inner.borrow_mut();
            guard.frame_pending = false;
            guard.tick(ts)
        };
        match outcome {
            FrameOutcome::Continue => {
                if request_frame(&f).is_ok() {
                    inner.borrow_mut().frame_pending = true;
                }
            }
            FrameOutcome::Ended { final_score } => {
                // Blocks until acknowledged; the loop is not rescheduled.
                if let Some(w) = window() {
                    if let Err(e) = w.alert_with_message(&end_message(final_score)) {
                        warn!("end-of-session alert failed: {:?}", e);
                    }
                }
            }
            FrameOutcome::Halted => {}
        }
    }) as Box<dyn FnMut(f64)>));
    g
}

fn end_message(final_score: u32) -> String {
    format!("Time's up! Final score: {final_score}")
}

fn request_frame(frame: &FrameCallback) -> Result<i32, JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let cb = frame.borrow();
    let cb = cb
        .as_ref()
        .ok_or_else(|| JsValue::from_str("frame callback missing"))?;
    win.request_animation_frame(cb.as_ref().unchecked_ref())
}

impl WebGame {
    fn tick(&mut self, ts: f64) -> FrameOutcome {
        self.game.drain_input(&mut self.input, ts);
        let outcome = self.game.step(ts);
        match outcome {
            FrameOutcome::Continue => {
                render(&self.ctx, &self.game, ts);
                self.hud.refresh(&self.game);
            }
            FrameOutcome::Ended { .. } => {
                self.input.set_open(false);
                self.input.clear();
                self.hud.refresh(&self.game);
                debug!("frame loop stopped");
            }
            FrameOutcome::Halted => {}
        }
        outcome
    }
}

fn performance_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

// --- HUD -------------------------------------------------------------------------

/// The three text fields under the canvas. Missing elements are created.
struct Hud {
    score: Element,
    timer: Element,
    level: Element,
}

impl Hud {
    fn attach(doc: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            score: text_field(doc, "score", "Score: 0")?,
            timer: text_field(doc, "timer", "Time: 0")?,
            level: text_field(doc, "level", "Level: 1")?,
        })
    }

    fn refresh(&self, game: &Game) {
        self.score.set_text_content(Some(&game.score_label()));
        self.timer.set_text_content(Some(&game.time_label()));
        self.level.set_text_content(Some(&game.level_label()));
    }
}

fn text_field(doc: &Document, id: &str, initial: &str) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
    let span = doc.create_element("span")?;
    span.set_id(id);
    span.set_text_content(Some(initial));
    span.set_attribute("style", "font-family:'Fira Code', monospace; font-size:15px; margin-right:14px; color:#3b2a12;").ok();
    body.append_child(&span)?;
    Ok(span)
}

// --- Rendering -------------------------------------------------------------------

fn render(ctx: &CanvasRenderingContext2d, game: &Game, now: f64) {
    let arena = game.arena();
    ctx.clear_rect(0.0, 0.0, arena.width, arena.height);
    draw_ground(ctx, arena);
    for c in game.crops() {
        draw_crop(ctx, c);
    }
    for o in game.obstacles() {
        draw_obstacle(ctx, o);
    }
    draw_farmer(ctx, game.farmer(), game.farmer().is_scanning(now));
}

fn draw_ground(ctx: &CanvasRenderingContext2d, arena: Arena) {
    let cols = (arena.width / GROUND_TILE).ceil() as u32;
    let rows = (arena.height / GROUND_TILE).ceil() as u32;
    for gx in 0..cols {
        for gy in 0..rows {
            let shade = if (gx + gy) % 2 == 0 { "rgba(255,255,255,0.03)" } else { "rgba(0,0,0,0.03)" };
            ctx.set_fill_style_str(shade);
            ctx.fill_rect(gx as f64 * GROUND_TILE, gy as f64 * GROUND_TILE, GROUND_TILE, GROUND_TILE);
        }
    }
}

fn draw_crop(ctx: &CanvasRenderingContext2d, crop: &Crop) {
    let s = CROP_SIZE;
    ctx.save();
    ctx.translate(crop.x, crop.y).ok();
    match crop.kind {
        CropKind::Wheat => {
            ctx.set_fill_style_str("#efc45a");
            ctx.fill_rect(0.0, 0.0, s, s);
        }
        CropKind::Pumpkin => {
            ctx.set_fill_style_str("#ff7f2a");
            ctx.fill_rect(0.0, 0.0, s, s);
            ctx.set_fill_style_str("#7b3f00"); // stem
            ctx.fill_rect(6.0, 2.0, 6.0, 2.0);
        }
        CropKind::Gold => {
            ctx.set_fill_style_str("#ffd700");
            ctx.begin_path();
            ctx.arc(s / 2.0, s / 2.0, s / 2.0, 0.0, TAU).ok();
            ctx.fill();
        }
    }
    // shadow
    ctx.set_fill_style_str("rgba(0,0,0,0.12)");
    ctx.fill_rect(0.0, s - 3.0, s, 3.0);
    ctx.restore();
}

fn draw_obstacle(ctx: &CanvasRenderingContext2d, o: &Obstacle) {
    let (w, h) = (OBSTACLE_W, OBSTACLE_H);
    ctx.save();
    ctx.translate(o.x, o.y).ok();
    ctx.set_fill_style_str("#111");
    ctx.fill_rect(0.0, 0.0, w, h);
    // beak points along the direction of travel
    let (tip, base) = if o.vx > 0.0 { (w + 8.0, w) } else { (-8.0, 0.0) };
    ctx.set_fill_style_str("#ffcc00");
    ctx.begin_path();
    ctx.move_to(base, h / 2.0);
    ctx.line_to(tip, h / 2.0 - 4.0);
    ctx.line_to(tip, h / 2.0 + 4.0);
    ctx.fill();
    ctx.restore();
}

fn draw_farmer(ctx: &CanvasRenderingContext2d, farmer: &Farmer, scanning: bool) {
    if scanning {
        let (cx, cy) = farmer.bounds().center();
        ctx.set_fill_style_str("rgba(255,210,77,0.18)");
        ctx.set_stroke_style_str("rgba(255,210,77,0.7)");
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.arc(cx, cy, SCYTHE_RANGE, 0.0, TAU).ok();
        ctx.fill();
        ctx.stroke();
    }
    ctx.save();
    ctx.translate(farmer.x, farmer.y).ok();
    ctx.set_fill_style_str("#5c2e00"); // body
    ctx.fill_rect(0.0, 0.0, FARMER_SIZE, FARMER_SIZE);
    ctx.set_fill_style_str("#ffd24d"); // hat
    ctx.fill_rect(4.0, -6.0, FARMER_SIZE - 8.0, 6.0);
    ctx.restore();
}

// --- Page entry --------------------------------------------------------------------

/// Wire the game into the page: `#gameCanvas` (created when absent) and a
/// `#startBtn` that starts the first session and resets afterwards.
#[wasm_bindgen]
pub fn run_app() -> Result<FarmGame, JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("gameCanvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("gameCanvas");
        c.set_width(800);
        c.set_height(600);
        c.set_attribute("style", "display:block; margin:12px auto; background:#7fb069; border:2px solid #3b2a12; border-radius:8px;").ok();
        body.append_child(&c)?;
        c
    };

    let game = FarmGame::build(canvas, GameConfig::new(Some(60.0), Some(1800.0)))?;

    let button = match doc.get_element_by_id("startBtn") {
        Some(el) => el,
        None => {
            let b = doc.create_element("button")?;
            b.set_id("startBtn");
            b.set_text_content(Some("Start / Reset"));
            body.append_child(&b)?;
            b
        }
    };
    {
        let game = game.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            let res = if game.running() { game.reset() } else { game.start() };
            if let Err(e) = res {
                log::error!("could not start session: {:?}", e);
            }
        }) as Box<dyn FnMut(_)>);
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(game)
}
