//! wasm-bindgen surface for the browser presentation layer
//!
//! JS forwards `KeyboardEvent.code` strings and UI button presses, calls
//! `frame` from `requestAnimationFrame`, then reads the pose and HUD back.

use wasm_bindgen::prelude::*;

use crate::game::Game;
use crate::sim::{Command, LevelCatalog, SimEvent};

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) keeps the existing logger
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Parksim starting...");
}

/// Game handle owned by the JS side
#[wasm_bindgen]
pub struct WebGame {
    game: Game,
}

#[wasm_bindgen]
impl WebGame {
    /// Game over the built-in levels
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebGame, JsValue> {
        let game = Game::with_builtin_levels().map_err(js_error)?;
        Ok(WebGame { game })
    }

    /// Game over a JSON level catalog
    pub fn from_json(json: &str) -> Result<WebGame, JsValue> {
        let catalog = LevelCatalog::from_json(json).map_err(js_error)?;
        Ok(WebGame {
            game: Game::new(catalog),
        })
    }

    pub fn key_down(&mut self, code: &str) -> bool {
        self.game.key_code(code, true)
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        self.game.key_code(code, false)
    }

    /// Hook to `blur` / `visibilitychange`; held keys never see their key-up
    pub fn blur(&mut self) {
        self.game.release_keys();
    }

    pub fn start(&mut self) {
        self.game.command(Command::Start);
    }

    pub fn start_level(&mut self, index: usize) {
        self.game.command(Command::StartLevel(index));
    }

    pub fn advance(&mut self) {
        self.game.command(Command::Advance);
    }

    pub fn restart(&mut self) {
        self.game.command(Command::Restart);
    }

    pub fn return_to_menu(&mut self) {
        self.game.command(Command::ReturnToMenu);
    }

    /// Run one frame; `dt_ms` is the time since the previous frame
    pub fn frame(&mut self, dt_ms: f64) -> String {
        let event = self.game.update((dt_ms / 1000.0) as f32);
        match event {
            SimEvent::None => "none",
            SimEvent::Arrived => "arrived",
            SimEvent::Crashed => "crashed",
        }
        .to_string()
    }

    /// Car position as `[x, y, z]`, empty when no level is being driven
    pub fn position(&self) -> Vec<f32> {
        self.game
            .vehicle()
            .map(|v| v.position.to_array().to_vec())
            .unwrap_or_default()
    }

    /// Car heading in radians (0 when no level is being driven)
    pub fn heading(&self) -> f32 {
        self.game.vehicle().map(|v| v.heading).unwrap_or(0.0)
    }

    pub fn pulse(&self) -> f64 {
        self.game.pulse()
    }

    pub fn hud_json(&self) -> Result<String, JsValue> {
        self.game.hud().to_json().map_err(js_error)
    }

    /// Level on screen (layout for meshes), `null` on the menu
    pub fn level_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.level()).map_err(js_error)
    }
}
