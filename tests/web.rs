//! Exercises the JS-facing surface in a browser.
#![cfg(target_arch = "wasm32")]

use orbital_hauler::{
    accept_contract, continue_game, delete_save, game_state, has_save_data, init_game,
    start_travel, tick,
};
use serde_json::Value;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn parse(raw: &str) -> Value {
    serde_json::from_str(raw).expect("engine responses are JSON")
}

#[wasm_bindgen_test]
fn new_game_is_playable_and_saved() {
    delete_save();
    let reply = parse(&init_game(2024, ""));
    assert_eq!(reply["ok"], true);
    assert_eq!(reply["data"]["phase"], "docked");
    assert_eq!(reply["data"]["state"]["player"]["credits"], 1000);
    assert!(has_save_data());

    let state = parse(&game_state());
    let planets = state["data"]["state"]["planets"]
        .as_array()
        .expect("planets");
    assert_eq!(planets.len(), 12);
    delete_save();
    assert!(!has_save_data());
}

#[wasm_bindgen_test]
fn errors_come_back_structured() {
    init_game(7, "");
    let reply = parse(&accept_contract(9_999_999));
    assert_eq!(reply["ok"], false);
    assert_eq!(reply["error"]["kind"], "unknown_contract");

    let reply = parse(&start_travel(0, 0.0));
    assert_eq!(reply["error"]["kind"], "already_docked");

    let reply = parse(&tick(0.0));
    assert_eq!(reply["ok"], true);
    assert_eq!(reply["data"]["progress"], Value::Null);
}

#[wasm_bindgen_test]
fn bad_config_is_rejected() {
    let reply = parse(&init_game(1, r#"{"universe": {"orbit_radii": []}}"#));
    assert_eq!(reply["ok"], false);
    assert_eq!(reply["error"]["kind"], "bad_config");
}

#[wasm_bindgen_test]
fn continue_game_validates_its_config() {
    init_game(11, "");
    assert!(has_save_data());
    let reply = parse(&continue_game(11, r#"{"contracts": {"min_count": 9, "max_count": 3}}"#));
    assert_eq!(reply["ok"], false);
    assert_eq!(reply["error"]["kind"], "bad_config");

    let reply = parse(&continue_game(11, ""));
    assert_eq!(reply["ok"], true);
    assert_eq!(reply["data"]["phase"], "docked");

    delete_save();
    let reply = parse(&continue_game(11, ""));
    assert_eq!(reply["error"]["kind"], "no_save");
}
