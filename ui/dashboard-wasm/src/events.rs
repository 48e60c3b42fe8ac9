//! Event binding.
//!
//! Wires all static UI event listeners once at startup. Dynamically
//! rendered controls (wallet panel buttons, listing buy buttons) are wired
//! by their renderers. Async handlers are spawned via
//! `wasm_bindgen_futures::spawn_local`.

use ethers_core::types::U256;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::dom::{self, Elements};
use crate::forecast;
use crate::market;
use crate::session;
use crate::wallet;

/// Helper: attach async click handler to an HtmlElement.
macro_rules! on_click_async {
    ($el:expr, $els:expr, $handler:expr) => {{
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let els2 = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&els2).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }};
}

/// Bind all static UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) {
    // ── Mock login form ──
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |e: web_sys::Event| {
            e.prevent_default();
            let email = dom::get_input_value(&els2.email);
            let password = dom::get_input_value(&els2.password);
            if email.is_empty() || password.is_empty() {
                return;
            }
            let els3 = els2.clone();
            wasm_bindgen_futures::spawn_local(async move {
                session::email_login(&els3, email).await;
            });
        }) as Box<dyn FnMut(_)>);
        els.login_form
            .add_event_listener_with_callback("submit", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    // ── Wallet login / sign-out ──
    on_click_async!(els.wallet_login_btn, els, wallet::wallet_login);
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            session::sign_out(&els2);
        }) as Box<dyn FnMut(_)>);
        els.sign_out_btn
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    // ── List-energy form ──
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |e: web_sys::Event| {
            e.prevent_default();
            on_list_energy_submit(&els2);
        }) as Box<dyn FnMut(_)>);
        els.list_energy_form
            .add_event_listener_with_callback("submit", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    // ── Country selector ──
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let els3 = els2.clone();
            wasm_bindgen_futures::spawn_local(async move {
                forecast::update_forecast(&els3).await;
            });
        }) as Box<dyn FnMut(_)>);
        els.country_select
            .add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
}

/// Validate the listing form and kick off the listing transaction.
fn on_list_energy_submit(els: &Elements) {
    let Ok(amount) = U256::from_dec_str(&dom::get_input_value(&els.energy_amount)) else {
        dom::set_text(&els.transaction_status, "Enter a whole-number amount to list.");
        return;
    };
    if amount.is_zero() {
        dom::set_text(&els.transaction_status, "Enter a whole-number amount to list.");
        return;
    }

    let price = dom::get_input_value(&els.price_per_unit);
    if price.is_empty() {
        dom::set_text(&els.transaction_status, "Enter a price per kWh.");
        return;
    }

    // datetime-local value → unix seconds
    let expiry_ms = js_sys::Date::parse(&dom::get_input_value(&els.expiry_date));
    if expiry_ms.is_nan() {
        dom::set_text(&els.transaction_status, "Pick an expiry date.");
        return;
    }
    let expiry = U256::from((expiry_ms / 1000.0) as u64);

    let els2 = els.clone();
    wasm_bindgen_futures::spawn_local(async move {
        market::list_energy(&els2, amount, &price, expiry).await;
    });
}
