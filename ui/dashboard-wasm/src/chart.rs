//! Canvas line chart for the demand forecast.
//!
//! One chart, one canvas: [`DemandChart`] owns the 2d context and the
//! current series, and redraws the whole frame on every update. Dropping it
//! severs the canvas binding; signing back in creates a fresh one.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const LINE_COLOR: &str = "#00f5ff";
const FILL_COLOR: &str = "rgba(0, 245, 255, 0.1)";
const GRID_COLOR: &str = "rgba(255, 255, 255, 0.1)";
const TEXT_COLOR: &str = "#ffffff";
const FONT: &str = "11px sans-serif";

const MARGIN_LEFT: f64 = 48.0;
const MARGIN_RIGHT: f64 = 12.0;
const MARGIN_TOP: f64 = 12.0;
const MARGIN_BOTTOM: f64 = 28.0;
const Y_GRIDLINES: usize = 5;
const MAX_X_TICKS: usize = 8;

pub struct DemandChart {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    labels: Vec<String>,
    values: Vec<f64>,
}

impl DemandChart {
    pub fn new(canvas: HtmlCanvasElement) -> Result<DemandChart, String> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| format!("{e:?}"))?
            .ok_or_else(|| "canvas has no 2d context".to_string())?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "context is not 2d".to_string())?;
        Ok(DemandChart {
            canvas,
            ctx,
            labels: Vec::new(),
            values: Vec::new(),
        })
    }

    pub fn set_series(&mut self, labels: Vec<String>, values: Vec<f64>) {
        self.labels = labels;
        self.values = values;
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Redraw the full frame: grid, axes labels, filled area, series line.
    pub fn render(&self) {
        // Match the backing store to the CSS box so lines stay crisp.
        let width = match self.canvas.client_width() {
            w if w > 0 => w as f64,
            _ => f64::from(self.canvas.width()),
        };
        let height = match self.canvas.client_height() {
            h if h > 0 => h as f64,
            _ => f64::from(self.canvas.height()),
        };
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);

        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, width, height);

        let plot_w = width - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = height - MARGIN_TOP - MARGIN_BOTTOM;
        if plot_w <= 0.0 || plot_h <= 0.0 {
            return;
        }

        let (y_min, y_max) = self.y_range();
        let y_span = y_max - y_min;

        let x_at = |i: usize| -> f64 {
            let n = self.values.len();
            if n <= 1 {
                MARGIN_LEFT + plot_w / 2.0
            } else {
                MARGIN_LEFT + plot_w * i as f64 / (n - 1) as f64
            }
        };
        let y_at = |v: f64| -> f64 { MARGIN_TOP + plot_h * (1.0 - (v - y_min) / y_span) };

        // Horizontal gridlines with value ticks
        ctx.set_font(FONT);
        ctx.set_text_align("right");
        for g in 0..=Y_GRIDLINES {
            let value = y_min + y_span * g as f64 / Y_GRIDLINES as f64;
            let y = y_at(value);
            ctx.set_stroke_style_str(GRID_COLOR);
            ctx.begin_path();
            ctx.move_to(MARGIN_LEFT, y);
            ctx.line_to(width - MARGIN_RIGHT, y);
            ctx.stroke();
            ctx.set_fill_style_str(TEXT_COLOR);
            let _ = ctx.fill_text(&format!("{value:.0}"), MARGIN_LEFT - 6.0, y + 3.0);
        }

        if self.values.is_empty() {
            return;
        }

        // X tick labels, thinned to at most MAX_X_TICKS
        let step = (self.labels.len() / MAX_X_TICKS).max(1);
        ctx.set_text_align("center");
        for (i, label) in self.labels.iter().enumerate().step_by(step) {
            ctx.set_fill_style_str(TEXT_COLOR);
            let _ = ctx.fill_text(label, x_at(i), height - MARGIN_BOTTOM + 16.0);
        }

        // Filled area under the series
        ctx.set_fill_style_str(FILL_COLOR);
        ctx.begin_path();
        ctx.move_to(x_at(0), y_at(self.values[0]));
        for (i, v) in self.values.iter().enumerate().skip(1) {
            ctx.line_to(x_at(i), y_at(*v));
        }
        ctx.line_to(x_at(self.values.len() - 1), MARGIN_TOP + plot_h);
        ctx.line_to(x_at(0), MARGIN_TOP + plot_h);
        ctx.close_path();
        ctx.fill();

        // Series line
        ctx.set_stroke_style_str(LINE_COLOR);
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(x_at(0), y_at(self.values[0]));
        for (i, v) in self.values.iter().enumerate().skip(1) {
            ctx.line_to(x_at(i), y_at(*v));
        }
        ctx.stroke();
    }

    /// Padded value range; degenerate series still get a non-zero span.
    fn y_range(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in &self.values {
            min = min.min(*v);
            max = max.max(*v);
        }
        if !min.is_finite() || !max.is_finite() {
            return (0.0, 1.0);
        }
        let pad = ((max - min) * 0.1).max(1.0);
        ((min - pad).max(0.0), max + pad)
    }
}
