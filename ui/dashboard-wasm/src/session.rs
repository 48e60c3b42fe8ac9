//! Session and view controller.
//!
//! Two views: login and dashboard. The transitions own all the attendant
//! side effects — chart lifecycle, metrics poll, wallet teardown — so the
//! rest of the app never flips visibility by hand.

use crate::dom::{self, Elements};
use crate::forecast;
use crate::listings;
use crate::metrics;
use crate::state::{self, View};
use crate::wallet;

/// Enter the dashboard: swap views, bring up the chart, start the metrics
/// poll, load listings.
pub fn show_dashboard(els: &Elements) {
    dom::set_display(&els.login_page, "none");
    dom::set_display(&els.main_app, "block");
    state::set_view(View::Dashboard);

    forecast::init_chart(els);
    metrics::start_real_time_updates(els);

    let els2 = els.clone();
    wasm_bindgen_futures::spawn_local(async move {
        listings::load_marketplace_items(&els2).await;
    });
}

/// Leave the dashboard and clear the session. Idempotent: a second call
/// only repeats the DOM writes.
///
/// The metrics poll is deliberately left running unless
/// `clear_poll_on_signout` is set — it keeps updating fields behind the
/// login view, matching the page's historical behavior.
pub fn sign_out(els: &Elements) {
    dom::set_display(&els.main_app, "none");
    dom::set_display(&els.login_page, "flex");
    state::set_view(View::Login);

    state::with_mut(|s| {
        s.chart = None;
        s.session = None;
        if s.config.clear_poll_on_signout {
            s.poll = None;
        }
    });

    wallet::render_disconnected(els);
    dom::set_text(&els.user_display, "");
}

/// Mock email/password login: any non-empty pair succeeds after a fixed
/// artificial delay. Deliberately not real authentication.
pub async fn email_login(els: &Elements, email: String) {
    gloo_timers::future::TimeoutFuture::new(1_000).await;
    dom::set_text(&els.user_display, &email);
    show_dashboard(els);
}
