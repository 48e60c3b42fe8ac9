//! WattMarket Dashboard Frontend
//!
//! Pure Rust + WASM single-page dashboard for the peer-to-peer energy
//! marketplace. Modularised per concern: view control, wallet bridge,
//! marketplace actions, listing rendering, forecast chart, metrics poll.

pub mod api;
pub mod chart;
pub mod config;
pub mod dom;
pub mod eth;
pub mod events;
pub mod forecast;
pub mod listings;
pub mod market;
pub mod metrics;
pub mod session;
pub mod state;
pub mod wallet;

use wasm_bindgen::prelude::*;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init().await
}

/// Main initialisation sequence.
async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;

    // Runtime configuration first: contract address, metrics endpoint/key,
    // poll cadence all come from config/dashboard.json.
    let cfg = config::load().await;
    state::with_mut(|s| s.config = cfg);

    // Restore the last selected forecast country
    let saved_country = state::local_get("wm_country").unwrap_or_default();
    if !saved_country.is_empty() && dom::has_option(&els.country_select, &saved_country) {
        dom::set_select_value(&els.country_select, &saved_country);
    }

    // The wallet panel starts disconnected; its button is rendered
    // dynamically so sign-out can restore it the same way.
    wallet::render_disconnected(&els);

    // Bind all static event listeners
    events::bind_events(&els);

    Ok(())
}
