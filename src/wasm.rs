use log::debug;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use crate::config::{saturating_millis, GameConfig};
use crate::session::{Session, Ticket};

/// Browser handle on a game session.
///
/// The page owns the timers: it waits `think_delay_ms` between
/// `begin_computer_turn` and `computer_decide`, and `reveal_delay_ms` before
/// `resolve`. Tickets are plain numbers on the JS side.
#[wasm_bindgen]
pub struct WasmGame {
    inner: Session,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmGame, JsValue> {
        let config: GameConfig = if config.is_undefined() || config.is_null() {
            GameConfig::default()
        } else {
            swb::from_value(config)?
        };
        let inner = Session::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmGame { inner })
    }

    pub fn request_score(&mut self, player: usize) -> Option<u32> {
        self.inner.request_score(player).map(Ticket::id)
    }

    pub fn request_steal(&mut self, thief: usize, target: usize) -> Option<u32> {
        self.inner.request_steal(thief, target).map(Ticket::id)
    }

    pub fn begin_computer_turn(&mut self) -> Option<u32> {
        self.inner.begin_computer_turn().map(Ticket::id)
    }

    pub fn computer_decide(&mut self, ticket: u32) -> Option<u32> {
        self.inner.computer_decide(Ticket::from_id(ticket)).map(Ticket::id)
    }

    /// Returns the log line, or `undefined` if the ticket was stale.
    pub fn resolve(&mut self, ticket: u32) -> Option<String> {
        self.inner
            .resolve(Ticket::from_id(ticket))
            .map(|outcome| outcome.to_string())
    }

    pub fn reset(&mut self) {
        self.inner.request_reset();
    }

    pub fn computer_to_move(&self) -> bool {
        self.inner.computer_to_move()
    }

    pub fn is_stalled(&self) -> bool {
        self.inner.state().is_stalled()
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        Ok(swb::to_value(&self.inner.snapshot())?)
    }

    /// Call `callback` with every event as `{ type, data }`.
    pub fn subscribe(&mut self, callback: js_sys::Function) {
        self.inner.subscribe(move |event| {
            match swb::to_value(event) {
                Ok(value) => {
                    if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                        debug!("event callback threw: {:?}", e);
                    }
                }
                Err(e) => debug!("cannot convert event for JS: {}", e),
            }
        });
    }

    pub fn think_delay_ms(&self) -> u32 {
        saturating_millis(self.inner.config().think_delay_ms)
    }

    pub fn reveal_delay_ms(&self) -> u32 {
        saturating_millis(self.inner.config().reveal_delay_ms)
    }
}
