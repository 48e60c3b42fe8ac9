//! Marketplace actions.
//!
//! One contract call per action, no retry, no optimistic update: failures
//! log a diagnostic and update the status line, successes refresh the
//! listing display. Cancel-listing exists on the contract surface
//! (`wm_market_abi::declared::cancel_listing`) but has no UI path here.

use ethers_core::types::{Address, U256};

use crate::dom::{self, Elements};
use crate::eth;
use crate::listings;
use crate::state;
use crate::wallet;

/// List energy for sale. Gated on the contract's verified-seller check;
/// the display-unit price is converted to base units before submission.
pub async fn list_energy(els: &Elements, amount: U256, price_display: &str, expiry: U256) {
    let Some((account, contract)) = state::session_pair() else {
        dom::alert("Please connect your wallet first!");
        return;
    };

    let seller: Address = match account.parse() {
        Ok(a) => a,
        Err(_) => {
            listing_failed(els, format!("unparseable account address: {account}"));
            return;
        }
    };

    let verified = eth::contract_call(&contract, wm_market_abi::extended::is_verified_seller(seller))
        .await
        .and_then(|data| wm_market_abi::decode_bool(&data).map_err(|e| e.to_string()));
    match verified {
        Ok(true) => {}
        Ok(false) => {
            dom::alert("Only verified sellers can list energy.");
            return;
        }
        Err(e) => {
            listing_failed(els, e);
            return;
        }
    }

    let price = match wm_market_abi::to_base_units(price_display) {
        Ok(p) => p,
        Err(e) => {
            listing_failed(els, e.to_string());
            return;
        }
    };

    let calldata = wm_market_abi::extended::list_energy(amount, price, expiry);
    match eth::send_transaction(&account, &contract, calldata, None).await {
        Ok(_) => {
            dom::set_text(&els.transaction_status, "Energy listed successfully!");
            listings::load_marketplace_items(els).await;
        }
        Err(e) => listing_failed(els, e),
    }
}

fn listing_failed(els: &Elements, detail: String) {
    gloo_console::error!("listing failed:", detail);
    dom::set_text(&els.transaction_status, "Listing failed. Check console.");
}

/// Buy from a listing: read its unit price, attach exactly
/// price × amount base units, submit the payable purchase.
pub async fn buy_energy(els: &Elements, listing_id: U256, amount: U256) {
    let Some((account, contract)) = state::session_pair() else {
        dom::alert("Please connect your wallet first!");
        return;
    };

    let result = async {
        let data = eth::contract_call(&contract, wm_market_abi::extended::get_listing(listing_id)).await?;
        let detail = wm_market_abi::extended::decode_listing_detail(&data).map_err(|e| e.to_string())?;
        let total = wm_market_abi::total_cost(detail.price_per_unit, amount).map_err(|e| e.to_string())?;
        let calldata = wm_market_abi::extended::buy_energy(listing_id, amount);
        eth::send_transaction(&account, &contract, calldata, Some(total)).await
    }
    .await;

    match result {
        Ok(_) => {
            dom::set_text(&els.transaction_status, "Purchase successful!");
            listings::load_marketplace_items(els).await;
        }
        Err(e) => {
            gloo_console::error!("purchase failed:", e);
            dom::set_text(&els.transaction_status, "Purchase failed. Check console.");
        }
    }
}

/// Withdraw accumulated proceeds, then re-render the wallet panel so the
/// pending balance reflects the payout.
pub async fn withdraw_funds(els: &Elements) {
    let Some((account, contract)) = state::session_pair() else {
        dom::alert("Please connect your wallet first!");
        return;
    };

    match eth::send_transaction(&account, &contract, wm_market_abi::extended::withdraw(), None).await {
        Ok(_) => {
            dom::alert("Funds withdrawn successfully!");
            wallet::connect_wallet(els).await;
        }
        Err(e) => {
            gloo_console::error!("withdrawal failed:", e);
            dom::alert("Withdrawal failed. Check console for details.");
        }
    }
}
