//! Injected wallet provider bridge.
//!
//! Talks EIP-1193 to the provider object a browser wallet extension injects
//! at `window.ethereum`: account access, read-only contract calls, and
//! transaction submission. Calldata comes in and out as the byte vectors
//! `wm-market-abi` produces; hex framing and rpc quantities happen here.

use ethers_core::types::U256;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    /// EIP-1193 provider injected by the wallet extension.
    pub type Ethereum;

    #[wasm_bindgen(method, catch)]
    async fn request(this: &Ethereum, args: &JsValue) -> Result<JsValue, JsValue>;
}

/// The injected provider, if any wallet extension is installed.
pub fn provider() -> Option<Ethereum> {
    let window = web_sys::window()?;
    let eth = js_sys::Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
    if eth.is_undefined() || eth.is_null() {
        return None;
    }
    Some(eth.unchecked_into::<Ethereum>())
}

pub fn detected() -> bool {
    provider().is_some()
}

/// Serialize request params as plain JS objects (not `Map`s — providers
/// reject those).
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, String> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).map_err(|e| e.to_string())
}

async fn rpc(method: &str, params: serde_json::Value) -> Result<JsValue, String> {
    let eth = provider().ok_or_else(|| "no injected wallet provider".to_string())?;
    let args = to_js(&serde_json::json!({ "method": method, "params": params }))?;
    eth.request(&args).await.map_err(|e| format!("{e:?}"))
}

/// Prompt the wallet for account access. May be rejected by the user.
pub async fn request_accounts() -> Result<Vec<String>, String> {
    let v = rpc("eth_requestAccounts", serde_json::json!([])).await?;
    serde_wasm_bindgen::from_value(v).map_err(|e| e.to_string())
}

pub async fn accounts() -> Result<Vec<String>, String> {
    let v = rpc("eth_accounts", serde_json::json!([])).await?;
    serde_wasm_bindgen::from_value(v).map_err(|e| e.to_string())
}

/// Read-only contract call against the latest block. Returns decoded
/// return data.
pub async fn contract_call(to: &str, calldata: Vec<u8>) -> Result<Vec<u8>, String> {
    let params = serde_json::json!([
        { "to": to, "data": wm_market_abi::to_hex(&calldata) },
        "latest",
    ]);
    let v = rpc("eth_call", params).await?;
    let out = v
        .as_string()
        .ok_or_else(|| "eth_call returned a non-string".to_string())?;
    wm_market_abi::from_hex(&out).map_err(|e| e.to_string())
}

/// Submit a transaction from `from`, optionally attaching `value` base
/// units. Resolves to the transaction hash once the wallet approves.
pub async fn send_transaction(
    from: &str,
    to: &str,
    calldata: Vec<u8>,
    value: Option<U256>,
) -> Result<String, String> {
    let mut tx = serde_json::json!({
        "from": from,
        "to": to,
        "data": wm_market_abi::to_hex(&calldata),
    });
    if let Some(value) = value {
        tx["value"] = serde_json::Value::String(wm_market_abi::to_quantity(value));
    }
    let v = rpc("eth_sendTransaction", serde_json::json!([tx])).await?;
    v.as_string()
        .ok_or_else(|| "eth_sendTransaction returned a non-string".to_string())
}
