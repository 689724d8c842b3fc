//! Farm Dash core crate.
//!
//! A farmer roams a canvas field collecting crops for points while crows fly
//! across it; touching a crow costs five seconds. The session ends when the
//! clock runs out, and every ten points the game levels up: crops spawn faster
//! and another crow joins.
//!
//! `farm` holds the simulation and is plain Rust; `web` binds it to a canvas,
//! the keyboard and requestAnimationFrame. JS entry points are [`run_app`] and
//! the [`FarmGame`] handle.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod farm;
pub mod logger;
mod web;

pub use config::GameConfig;
pub use farm::{Arena, Crop, CropKind, Farmer, FrameOutcome, Game, Key, KeyQueue, Obstacle, Phase};
pub use web::{FarmGame, run_app};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);
}
