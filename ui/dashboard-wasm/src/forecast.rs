//! Forecast panel glue.
//!
//! Fetches the per-country forecast document, falls back to the synthetic
//! series on any failure, pushes the result into the chart, and renders the
//! summary statistics. The actual parsing, generation, and stats live in
//! `wm-forecast`.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use wm_forecast::{ForecastDoc, ForecastSeries, SeriesStats, synthetic_series, time_of_day};

use crate::api;
use crate::chart::DemandChart;
use crate::dom::{self, Elements};
use crate::state;

/// Create the chart bound to the dashboard canvas and load the initial
/// forecast for the selected country.
pub fn init_chart(els: &Elements) {
    match DemandChart::new(els.demand_chart.clone()) {
        Ok(chart) => state::with_mut(|s| s.chart = Some(chart)),
        Err(e) => {
            gloo_console::error!("chart initialization failed:", e);
            return;
        }
    }

    let els2 = els.clone();
    wasm_bindgen_futures::spawn_local(async move {
        update_forecast(&els2).await;
    });
}

/// Fetch the selected country's forecast and refresh chart + statistics.
/// Fetch or parse failure silently substitutes the synthetic series — the
/// panel itself never shows an error.
pub async fn update_forecast(els: &Elements) {
    let country = dom::get_select_value(&els.country_select);
    state::local_set("wm_country", &country);

    let url = state::with(|s| s.config.forecast_url(&country));
    let loaded: Result<ForecastSeries, String> = api::fetch_json::<ForecastDoc>(&url)
        .await
        .and_then(|doc| doc.into_series().map_err(|e| e.to_string()));

    let series = match loaded {
        Ok(series) => series,
        Err(e) => {
            gloo_console::error!(format!("failed to load forecast for {country}:"), e);
            let mut rng = SmallRng::seed_from_u64(js_sys::Date::now() as u64);
            synthetic_series(&mut rng)
        }
    };

    state::with_mut(|s| {
        if let Some(chart) = &mut s.chart {
            chart.set_series(series.labels.clone(), series.values.clone());
            chart.render();
        }
    });

    render_stats(els, &series);
}

fn render_stats(els: &Elements, series: &ForecastSeries) {
    let Some(stats) = SeriesStats::compute(series) else {
        return;
    };
    dom::set_text(&els.peak_demand, &format!("{:.1} MW", stats.max));
    dom::set_text(&els.peak_time, &format!("Expected at {}", time_of_day(&stats.peak_label)));
    dom::set_text(&els.low_demand, &format!("{:.1} MW", stats.min));
    dom::set_text(&els.low_time, &format!("Expected at {}", time_of_day(&stats.low_label)));
    dom::set_text(&els.avg_demand, &format!("{:.1} MW", stats.mean));
}
