//! Wallet connection flows.
//!
//! `init_web3` establishes the session from the injected provider;
//! `connect_wallet` renders the connected panel with the caller's pending
//! withdrawal; `wallet_login` is the alternate login path.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use ethers_core::types::Address;

use crate::dom::{self, Elements};
use crate::eth;
use crate::market;
use crate::session;
use crate::state::{self, WalletSession};

/// Detect the injected provider and establish a wallet session. Reports
/// failure with a blocking alert; on success the session (accounts +
/// contract address) is stored as one unit.
pub async fn init_web3(_els: &Elements) -> bool {
    if !eth::detected() {
        dom::alert("Please install a browser wallet to use this feature!");
        return false;
    }

    if let Err(e) = eth::request_accounts().await {
        gloo_console::error!("wallet initialization failed:", e);
        dom::alert("Failed to connect to the wallet. Please try again.");
        return false;
    }

    match eth::accounts().await {
        Ok(accounts) if !accounts.is_empty() => {
            let contract_address = state::with(|s| s.config.contract_address.clone());
            state::set_session(Some(WalletSession { accounts, contract_address }));
            true
        }
        Ok(_) => {
            dom::alert("No wallet account available.");
            false
        }
        Err(e) => {
            gloo_console::error!("wallet initialization failed:", e);
            dom::alert("Failed to connect to the wallet. Please try again.");
            false
        }
    }
}

/// Connect and render the wallet panel: shortened address, pending
/// withdrawal, and the Withdraw button. Re-invoked after a withdrawal to
/// refresh the balance.
pub async fn connect_wallet(els: &Elements) {
    if !init_web3(els).await {
        return;
    }
    let Some((account, contract)) = state::session_pair() else {
        return;
    };

    let owner: Address = match account.parse() {
        Ok(a) => a,
        Err(_) => {
            gloo_console::error!("unparseable account address:", account);
            return;
        }
    };

    let pending = eth::contract_call(&contract, wm_market_abi::extended::get_pending_withdrawal(owner))
        .await
        .and_then(|data| wm_market_abi::decode_uint(&data).map_err(|e| e.to_string()));

    match pending {
        Ok(balance) => {
            let html = format!(
                r#"
                <div class="wallet-connected">🔗 Wallet Connected: {}</div>
                <div class="wallet-pending">Pending Withdrawal: {} ETH</div>
                <button class="btn" id="withdrawBtn">Withdraw Funds</button>
                "#,
                shorten(&account, 6, 4),
                wm_market_abi::from_base_units(balance),
            );
            dom::set_inner_html(&els.wallet_status, &html);
            wire_panel_button(els, "#withdrawBtn", PanelAction::Withdraw);
        }
        Err(e) => {
            gloo_console::error!("pending withdrawal query failed:", e);
            dom::set_text(&els.wallet_status, "Wallet connected, but the balance query failed.");
        }
    }
}

/// Alternate login path: provider connection instead of the mock form.
pub async fn wallet_login(els: &Elements) {
    if init_web3(els).await {
        if let Some((account, _)) = state::session_pair() {
            dom::set_text(&els.user_display, &shorten(&account, 6, 4));
        }
        gloo_timers::future::TimeoutFuture::new(1_500).await;
        session::show_dashboard(els);
    }
}

/// Reset the wallet panel to its disconnected affordance.
pub fn render_disconnected(els: &Elements) {
    dom::set_inner_html(
        &els.wallet_status,
        r#"<button class="btn" id="connectWalletBtn">Connect Wallet</button>"#,
    );
    wire_panel_button(els, "#connectWalletBtn", PanelAction::Connect);
}

#[derive(Clone, Copy)]
enum PanelAction {
    Connect,
    Withdraw,
}

/// Wire a dynamically rendered wallet-panel button to its action.
fn wire_panel_button(els: &Elements, selector: &str, action: PanelAction) {
    let Some(btn) = els.wallet_status.query_selector(selector).ok().flatten() else {
        return;
    };
    let els2 = els.clone();
    let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
        let els3 = els2.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match action {
                PanelAction::Connect => connect_wallet(&els3).await,
                PanelAction::Withdraw => market::withdraw_funds(&els3).await,
            }
        });
    }) as Box<dyn FnMut(_)>);
    btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
        .unwrap();
    cb.forget();
}

/// "0x1234…abcd" style address shortening.
pub fn shorten(s: &str, head: usize, tail: usize) -> String {
    if s.len() <= head + tail + 1 {
        s.to_string()
    } else {
        format!("{}\u{2026}{}", &s[..head], &s[s.len() - tail..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorten_keeps_short_strings() {
        assert_eq!(shorten("0xabc", 6, 4), "0xabc");
    }

    #[test]
    fn shorten_elides_the_middle() {
        let s = shorten("0x1234567890abcdef1234567890abcdef12345678", 6, 4);
        assert_eq!(s, "0x1234\u{2026}5678");
    }
}
