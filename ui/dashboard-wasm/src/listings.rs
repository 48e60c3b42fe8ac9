//! Marketplace listing renderer.
//!
//! Queries the listing count, walks ids 1..=count sequentially, skips
//! inactive ids, and rebuilds the item container from scratch on every
//! call — full replace, no diffing. Buy buttons carry their listing id in a
//! `data-listing-id` attribute and are wired after the rebuild.

use ethers_core::types::U256;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::dom::{self, Elements};
use crate::eth;
use crate::market;
use crate::state;

/// Rebuild the marketplace item list from the contract. No-ops when no
/// wallet is connected.
pub async fn load_marketplace_items(els: &Elements) {
    let Some((_, contract)) = state::session_pair() else {
        return;
    };

    dom::set_inner_html(&els.marketplace_items, "");

    let count = match eth::contract_call(&contract, wm_market_abi::declared::listing_count())
        .await
        .and_then(|data| wm_market_abi::decode_uint(&data).map_err(|e| e.to_string()))
    {
        Ok(count) => count.low_u64(),
        Err(e) => {
            gloo_console::error!("listing count query failed:", e);
            return;
        }
    };

    for id in 1..=count {
        let listing_id = U256::from(id);

        let active = match eth::contract_call(&contract, wm_market_abi::extended::is_listing_active(listing_id))
            .await
            .and_then(|data| wm_market_abi::decode_bool(&data).map_err(|e| e.to_string()))
        {
            Ok(active) => active,
            Err(e) => {
                gloo_console::error!(format!("active check failed for listing {id}:"), e);
                continue;
            }
        };
        if !active {
            continue;
        }

        let detail = match eth::contract_call(&contract, wm_market_abi::extended::get_listing(listing_id))
            .await
            .and_then(|data| {
                wm_market_abi::extended::decode_listing_detail(&data).map_err(|e| e.to_string())
            }) {
            Ok(detail) => detail,
            Err(e) => {
                gloo_console::error!(format!("detail fetch failed for listing {id}:"), e);
                continue;
            }
        };

        let item = dom::create_element("div");
        item.set_attribute("class", "marketplace-item").unwrap();
        let html = format!(
            r#"
            <h3>Energy Listing #{id}</h3>
            <p>Amount: {amount} kWh</p>
            <div class="item-price">{price} ETH/kWh</div>
            <div class="item-status status-available">Available</div>
            <input type="number" id="buyAmount{id}" placeholder="Amount to buy" min="1" max="{amount}">
            <button class="btn buy-btn" data-listing-id="{id}">Buy</button>
            "#,
            id = id,
            amount = detail.amount_available,
            price = wm_market_abi::from_base_units(detail.price_per_unit),
        );
        dom::set_inner_html(&item, &html);
        els.marketplace_items.append_child(&item).unwrap();
    }

    wire_buy_buttons(els);
}

/// Wire click events on the rebuilt buy buttons. The quantity input is read
/// at click time, not at render time.
fn wire_buy_buttons(els: &Elements) {
    for btn in dom::query_all_within(&els.marketplace_items, ".buy-btn") {
        let Some(id_attr) = btn.get_attribute("data-listing-id") else {
            continue;
        };
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let els3 = els2.clone();
            let id_attr2 = id_attr.clone();
            wasm_bindgen_futures::spawn_local(async move {
                on_buy_clicked(&els3, &id_attr2).await;
            });
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
}

async fn on_buy_clicked(els: &Elements, id_attr: &str) {
    let Ok(listing_id) = U256::from_dec_str(id_attr) else {
        return;
    };
    let raw = dom::by_id_typed::<web_sys::HtmlInputElement>(&format!("buyAmount{id_attr}"))
        .map(|input| dom::get_input_value(&input))
        .unwrap_or_default();
    let Ok(amount) = U256::from_dec_str(&raw) else {
        dom::set_text(&els.transaction_status, "Enter a quantity to buy.");
        return;
    };
    if amount.is_zero() {
        dom::set_text(&els.transaction_status, "Enter a quantity to buy.");
        return;
    }
    market::buy_energy(els, listing_id, amount).await;
}
