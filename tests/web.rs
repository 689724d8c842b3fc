// Browser tests for the wasm bindings. Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use farm_dash::FarmGame;
use js_sys::{Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::HtmlCanvasElement;

wasm_bindgen_test_configure!(run_in_browser);

fn canvas() -> HtmlCanvasElement {
    let doc = web_sys::window().unwrap().document().unwrap();
    let c: HtmlCanvasElement = doc.create_element("canvas").unwrap().dyn_into().unwrap();
    c.set_width(320);
    c.set_height(240);
    doc.body().unwrap().append_child(&c).unwrap();
    c
}

fn options(fields: &[(&str, f64)]) -> JsValue {
    let obj = Object::new();
    for (name, value) in fields {
        Reflect::set(&obj, &JsValue::from_str(name), &JsValue::from_f64(*value)).unwrap();
    }
    obj.into()
}

fn text_of(id: &str) -> Option<String> {
    web_sys::window()?.document()?.get_element_by_id(id)?.text_content()
}

#[wasm_bindgen_test]
fn new_game_is_idle_and_creates_hud() {
    let game = FarmGame::new(canvas(), JsValue::UNDEFINED).unwrap();
    assert!(!game.running());
    assert_eq!(game.score(), 0);
    assert!(text_of("score").is_some());
    assert!(text_of("timer").is_some());
    assert!(text_of("level").is_some());
}

#[wasm_bindgen_test]
fn start_runs_and_refreshes_hud() {
    let game = FarmGame::new(canvas(), options(&[("initialTime", 30.0), ("spawnInterval", 1500.0)])).unwrap();
    game.start().unwrap();
    assert!(game.running());
    assert_eq!(text_of("timer").as_deref(), Some("Time: 30"));
    assert_eq!(text_of("level").as_deref(), Some("Level: 1"));
    // reset while running stays running
    game.reset().unwrap();
    assert!(game.running());
    assert_eq!(game.level(), 1);
}

#[wasm_bindgen_test]
fn options_object_fields_are_optional() {
    let game = FarmGame::new(canvas(), options(&[("initialTime", 45.0)])).unwrap();
    game.start().unwrap();
    assert_eq!(text_of("timer").as_deref(), Some("Time: 45"));

    // non-numeric and non-positive values fall back to the defaults
    let obj = Object::new();
    Reflect::set(&obj, &"initialTime".into(), &"soon".into()).unwrap();
    Reflect::set(&obj, &"spawnInterval".into(), &JsValue::from_f64(-5.0)).unwrap();
    let game = FarmGame::new(canvas(), obj.into()).unwrap();
    game.start().unwrap();
    assert_eq!(text_of("timer").as_deref(), Some("Time: 60"));
}
