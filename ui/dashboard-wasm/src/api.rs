//! HTTP fetch helpers.
//!
//! Wraps the browser `fetch` for the static forecast documents, the runtime
//! config, and the public metrics API. All requests are same-pattern GETs;
//! errors come back as strings for the caller's fallback logic.

use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::dom;

/// Fetch a URL and return the body as a plain string.
pub async fn fetch_text(url: &str) -> Result<String, String> {
    let opts = RequestInit::new();
    opts.set_method("GET");

    let request = Request::new_with_str_and_init(url, &opts).map_err(|e| format!("{e:?}"))?;

    let window = dom::window();
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("fetch error: {e:?}"))?;

    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| "response is not a Response".to_string())?;

    let text = JsFuture::from(resp.text().map_err(|e| format!("{e:?}"))?)
        .await
        .map_err(|e| format!("text error: {e:?}"))?;

    let text_str = text.as_string().unwrap_or_default();

    if !resp.ok() {
        return Err(format!("{} {}: {}", resp.status(), resp.status_text(), text_str));
    }

    Ok(text_str)
}

/// Fetch a URL and parse the body as JSON into `T`.
pub async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    let text = fetch_text(url).await?;
    serde_json::from_str(&text).map_err(|e| format!("JSON parse error: {e}"))
}
