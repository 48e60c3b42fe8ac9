//! Global application state.
//!
//! Uses `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).
//! Everything mutable at the top level lives in one [`AppState`] struct:
//! the current view, the wallet session, the chart, the metrics poll handle,
//! and the loaded configuration.

use std::cell::RefCell;

use gloo_timers::callback::Interval;

use crate::chart::DemandChart;
use crate::config::DashboardConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Login,
    Dashboard,
}

/// Connected-wallet handles. The whole session exists or none of it does —
/// a partially connected state is unrepresentable.
#[derive(Clone, Debug)]
pub struct WalletSession {
    pub accounts: Vec<String>,
    pub contract_address: String,
}

impl WalletSession {
    pub fn active_account(&self) -> Option<&str> {
        self.accounts.first().map(String::as_str)
    }
}

/// Central application state.
#[derive(Default)]
pub struct AppState {
    pub view: View,
    pub session: Option<WalletSession>,
    pub chart: Option<DemandChart>,
    pub poll: Option<Interval>,
    pub config: DashboardConfig,
}

// ── Thread-local singleton ──

thread_local! {
    static STATE: RefCell<AppState> = RefCell::new(AppState::default());
}

/// Run a closure with shared read access to the state.
pub fn with<F, R>(f: F) -> R
where
    F: FnOnce(&AppState) -> R,
{
    STATE.with(|s| f(&s.borrow()))
}

/// Run a closure with mutable access to the state.
pub fn with_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut AppState) -> R,
{
    STATE.with(|s| f(&mut s.borrow_mut()))
}

// ── Convenience accessors ──

pub fn view() -> View {
    with(|s| s.view)
}

pub fn set_view(v: View) {
    with_mut(|s| s.view = v);
}

pub fn set_session(session: Option<WalletSession>) {
    with_mut(|s| s.session = session);
}

pub fn has_session() -> bool {
    with(|s| s.session.is_some())
}

/// Active account and contract address, when connected.
pub fn session_pair() -> Option<(String, String)> {
    with(|s| {
        s.session.as_ref().and_then(|w| {
            w.active_account()
                .map(|a| (a.to_string(), w.contract_address.clone()))
        })
    })
}

pub fn config() -> DashboardConfig {
    with(|s| s.config.clone())
}

// ── localStorage helpers ──

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

pub fn local_get(key: &str) -> Option<String> {
    storage()?.get_item(key).ok()?
}

pub fn local_set(key: &str, value: &str) {
    if let Some(s) = storage() {
        let _ = s.set_item(key, value);
    }
}
