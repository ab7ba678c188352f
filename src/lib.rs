use serde::Serialize;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

pub mod game;
pub mod geometry;
#[cfg(target_arch = "wasm32")]
mod logging;
pub mod save;

use game::config::EngineConfig;
use game::error::SessionError;
use game::events::SessionEvent;
use game::session::Outcome;
use game::Game;

#[cfg(target_arch = "wasm32")]
type HostSlot = save::BrowserSlot;
#[cfg(not(target_arch = "wasm32"))]
type HostSlot = save::MemorySlot;

thread_local! {
    static GAME: RefCell<Option<Game<HostSlot>>> = RefCell::new(None);
}

fn with_game_mut<R>(f: impl FnOnce(&mut Game<HostSlot>) -> R) -> Result<R, &'static str> {
    GAME.with(|cell| {
        let mut opt = cell.borrow_mut();
        match opt.as_mut() {
            Some(game) => Ok(f(game)),
            None => Err("game not initialized"),
        }
    })
}

#[derive(Serialize)]
#[serde(untagged)]
enum Failure {
    Session(SessionError),
    Message { kind: &'static str, message: String },
}

#[derive(Serialize)]
struct Response<T: Serialize> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<Failure>,
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

fn ok_json<T: Serialize>(data: T) -> String {
    to_json(&Response {
        ok: true,
        data: Some(data),
        error: None,
    })
}

fn fail_json(error: Failure) -> String {
    to_json(&Response::<()> {
        ok: false,
        data: None,
        error: Some(error),
    })
}

fn message(kind: &'static str, message: impl ToString) -> Failure {
    Failure::Message {
        kind,
        message: message.to_string(),
    }
}

fn outcome_json(result: Result<Outcome, &'static str>) -> String {
    match result {
        Ok(Ok(events)) => ok_json::<Vec<SessionEvent>>(events),
        Ok(Err(err)) => fail_json(Failure::Session(err)),
        Err(e) => fail_json(message("not_initialized", e)),
    }
}

/// Millisecond timestamps arrive from JS as doubles.
fn millis(now_ms: f64) -> u64 {
    now_ms.max(0.0) as u64
}

fn install_hooks() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    logging::init(log::LevelFilter::Info);
}

fn parse_config(config_json: &str) -> Result<EngineConfig, Failure> {
    EngineConfig::from_json(config_json).map_err(|err| message("bad_config", err))
}

#[wasm_bindgen]
pub fn init_game(seed: u64, config_json: &str) -> String {
    install_hooks();
    let config = match parse_config(config_json) {
        Ok(config) => config,
        Err(failure) => return fail_json(failure),
    };
    match Game::new(config, seed, HostSlot::default()) {
        Ok(game) => start(game),
        Err(err) => fail_json(message("bad_config", err)),
    }
}

/// Loads the saved game. Fails with `no_save` when there is nothing to
/// continue and with `bad_config` when the config does not validate.
#[wasm_bindgen]
pub fn continue_game(seed: u64, config_json: &str) -> String {
    install_hooks();
    let config = match parse_config(config_json) {
        Ok(config) => config,
        Err(failure) => return fail_json(failure),
    };
    match Game::resume(config, seed, HostSlot::default()) {
        Ok(Some(game)) => start(game),
        Ok(None) => fail_json(message("no_save", "no saved game to continue")),
        Err(err) => fail_json(message("bad_config", err)),
    }
}

fn start(game: Game<HostSlot>) -> String {
    let view = ok_json(game.view());
    GAME.with(|g| *g.borrow_mut() = Some(game));
    view
}

#[wasm_bindgen]
pub fn game_state() -> String {
    match with_game_mut(|game| ok_json(game.view())) {
        Ok(v) => v,
        Err(e) => fail_json(message("not_initialized", e)),
    }
}

#[wasm_bindgen]
pub fn travel_preview(to: u32) -> String {
    match with_game_mut(|game| game.session().preview_travel(to)) {
        Ok(Ok(preview)) => ok_json(preview),
        Ok(Err(err)) => fail_json(Failure::Session(err)),
        Err(e) => fail_json(message("not_initialized", e)),
    }
}

#[wasm_bindgen]
pub fn tick(now_ms: f64) -> String {
    match with_game_mut(|game| game.tick(millis(now_ms))) {
        Ok(report) => ok_json(report),
        Err(e) => fail_json(message("not_initialized", e)),
    }
}

#[wasm_bindgen]
pub fn pause(now_ms: f64) {
    let _ = with_game_mut(|game| game.pause(millis(now_ms)));
}

#[wasm_bindgen]
pub fn resume(now_ms: f64) {
    let _ = with_game_mut(|game| game.unpause(millis(now_ms)));
}

#[wasm_bindgen]
pub fn start_travel(to: u32, now_ms: f64) -> String {
    outcome_json(with_game_mut(|game| {
        game.apply("start_travel", |s| s.start_travel(to, millis(now_ms)))
    }))
}

#[wasm_bindgen]
pub fn accept_contract(contract_id: u64) -> String {
    outcome_json(with_game_mut(|game| {
        game.apply("accept_contract", |s| s.accept_contract(contract_id))
    }))
}

#[wasm_bindgen]
pub fn cancel_contract(contract_id: u64) -> String {
    outcome_json(with_game_mut(|game| {
        game.apply("cancel_contract", |s| s.cancel_contract(contract_id))
    }))
}

#[wasm_bindgen]
pub fn buy_fuel(amount: f64, cost: i64) -> String {
    outcome_json(with_game_mut(|game| {
        game.apply("buy_fuel", |s| s.buy_fuel(amount, cost))
    }))
}

#[wasm_bindgen]
pub fn refuel_full() -> String {
    outcome_json(with_game_mut(|game| game.apply("refuel_full", |s| s.refuel_full())))
}

#[wasm_bindgen]
pub fn buy_ship(ship_id: u32) -> String {
    outcome_json(with_game_mut(|game| {
        game.apply("buy_ship", |s| s.buy_ship(ship_id))
    }))
}

#[wasm_bindgen]
pub fn switch_ship(ship_id: u32) -> String {
    outcome_json(with_game_mut(|game| {
        game.apply("switch_ship", |s| s.switch_ship(ship_id))
    }))
}

#[wasm_bindgen]
pub fn add_route_stop(planet_id: u32) -> String {
    outcome_json(with_game_mut(|game| {
        game.apply("add_route_stop", |s| s.add_route_stop(planet_id))
    }))
}

#[wasm_bindgen]
pub fn remove_route_stop(planet_id: u32) -> String {
    outcome_json(with_game_mut(|game| {
        game.apply("remove_route_stop", |s| s.remove_route_stop(planet_id))
    }))
}

#[wasm_bindgen]
pub fn clear_route() -> String {
    outcome_json(with_game_mut(|game| game.apply("clear_route", |s| s.clear_route())))
}

#[wasm_bindgen]
pub fn launch_route(now_ms: f64) -> String {
    outcome_json(with_game_mut(|game| {
        game.apply("launch_route", |s| s.launch_route(millis(now_ms)))
    }))
}

#[wasm_bindgen]
pub fn save_game() -> String {
    match with_game_mut(|game| game.save()) {
        Ok(Ok(())) => ok_json(()),
        Ok(Err(err)) => fail_json(message("save_failed", err)),
        Err(e) => fail_json(message("not_initialized", e)),
    }
}

#[wasm_bindgen]
pub fn has_save_data() -> bool {
    let stored = with_game_mut(|game| save::has_save(game.slot()));
    match stored {
        Ok(found) => found,
        Err(_) => save::has_save(&HostSlot::default()),
    }
}

#[wasm_bindgen]
pub fn delete_save() {
    if with_game_mut(|game| save::delete_save(game.slot_mut())).is_err() {
        save::delete_save(&mut HostSlot::default());
    }
}
