use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod board;
pub mod error;
pub mod game;
pub mod logging;
pub mod types;

pub use board::{Board, Cell, Piece, PieceId};
pub use error::EngineError;
pub use game::GameInstance;
pub use types::{BoardSnapshot, Color, MoveResult, Position, SelectionResult};

static GAME: Lazy<Mutex<GameInstance>> = Lazy::new(|| Mutex::new(GameInstance::new()));

fn game() -> MutexGuard<'static, GameInstance> {
    GAME.lock().unwrap_or_else(PoisonError::into_inner)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn engine_error(err: EngineError) -> JsValue {
    JsError::new(&err.to_string()).into()
}

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

#[wasm_bindgen]
pub fn init_logging(level: &str) {
    logging::init(logging::parse_level(level));
}

#[wasm_bindgen]
pub fn new_game() -> Result<JsValue, JsValue> {
    let mut guard = game();
    *guard = GameInstance::new();
    log::info!("new game");
    to_js(&guard.query_state())
}

#[wasm_bindgen]
pub fn reset() -> Result<JsValue, JsValue> {
    to_js(&game().reset())
}

#[wasm_bindgen]
pub fn select_piece(x: i32, y: i32) -> Result<JsValue, JsValue> {
    let result = game().select_piece(x, y).map_err(engine_error)?;
    to_js(&result)
}

#[wasm_bindgen]
pub fn move_to(x: i32, y: i32) -> Result<JsValue, JsValue> {
    let result = game().move_to(x, y).map_err(engine_error)?;
    to_js(&result)
}

#[wasm_bindgen]
pub fn query_state() -> Result<JsValue, JsValue> {
    to_js(&game().query_state())
}

#[wasm_bindgen]
pub fn legal_moves() -> Result<JsValue, JsValue> {
    to_js(&game().legal_moves())
}

#[wasm_bindgen]
pub fn turn_banner() -> String {
    game().turn_banner()
}

#[wasm_bindgen]
pub fn victory_message() -> Option<String> {
    game().victory_message()
}
