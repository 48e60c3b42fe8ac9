//! DOM element bindings.
//!
//! All page elements are resolved once at startup into an [`Elements`]
//! struct. To add new UI elements, add a field here and bind it in
//! `Elements::bind()`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlCanvasElement, HtmlElement, HtmlInputElement, HtmlOptionElement,
    HtmlSelectElement,
};

// ── Helpers ──

fn doc() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn set_inner_html(el: &Element, html: &str) {
    el.set_inner_html(html);
}

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value().trim().to_string()
}

pub fn get_select_value(el: &HtmlSelectElement) -> String {
    el.value()
}

pub fn set_select_value(el: &HtmlSelectElement, val: &str) {
    el.set_value(val);
}

pub fn has_option(sel: &HtmlSelectElement, value: &str) -> bool {
    let opts = sel.options();
    for i in 0..opts.length() {
        if let Some(opt) = opts.item(i) {
            if let Ok(o) = opt.dyn_into::<HtmlOptionElement>() {
                if o.value() == value {
                    return true;
                }
            }
        }
    }
    false
}

pub fn create_element(tag: &str) -> Element {
    doc().create_element(tag).unwrap()
}

/// Query all matching elements within a parent element.
pub fn query_all_within(parent: &Element, selector: &str) -> Vec<Element> {
    let nl = parent.query_selector_all(selector).unwrap();
    let mut v = Vec::new();
    for i in 0..nl.length() {
        if let Some(e) = nl.item(i) {
            if let Ok(el) = e.dyn_into::<Element>() {
                v.push(el);
            }
        }
    }
    v
}

pub fn set_display(el: &HtmlElement, value: &str) {
    let _ = el.style().set_property("display", value);
}

pub fn alert(msg: &str) {
    let _ = window().alert_with_message(msg);
}

pub fn document() -> Document {
    doc()
}

pub fn window() -> web_sys::Window {
    web_sys::window().unwrap()
}

// ── Elements struct ──

/// All DOM element references used by the dashboard.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Views
    pub login_page: HtmlElement,
    pub main_app: HtmlElement,

    // Login
    pub login_form: HtmlElement,
    pub email: HtmlInputElement,
    pub password: HtmlInputElement,
    pub wallet_login_btn: HtmlElement,

    // Header
    pub user_display: Element,
    pub sign_out_btn: HtmlElement,

    // Wallet panel
    pub wallet_status: Element,

    // Marketplace
    pub transaction_status: Element,
    pub marketplace_items: Element,
    pub list_energy_form: HtmlElement,
    pub energy_amount: HtmlInputElement,
    pub price_per_unit: HtmlInputElement,
    pub expiry_date: HtmlInputElement,

    // Forecast panel
    pub demand_chart: HtmlCanvasElement,
    pub country_select: HtmlSelectElement,
    pub peak_demand: Element,
    pub peak_time: Element,
    pub low_demand: Element,
    pub low_time: Element,
    pub avg_demand: Element,

    // Live metrics
    pub current_price: Element,
    pub total_consumption: Element,
    pub efficiency: Element,
    pub carbon_offset: Element,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_select {
    ($id:expr) => {
        by_id_typed::<HtmlSelectElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing select #{}", $id)))?
    };
}

macro_rules! get_html {
    ($id:expr) => {
        by_id_typed::<HtmlElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing html element #{}", $id)))?
    };
}

macro_rules! get_canvas {
    ($id:expr) => {
        by_id_typed::<HtmlCanvasElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing canvas #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            login_page: get_html!("loginPage"),
            main_app: get_html!("mainApp"),

            login_form: get_html!("loginForm"),
            email: get_input!("email"),
            password: get_input!("password"),
            wallet_login_btn: get_html!("walletLoginBtn"),

            user_display: get_el!("user-display"),
            sign_out_btn: get_html!("signOutBtn"),

            wallet_status: get_el!("walletStatus"),

            transaction_status: get_el!("transactionStatus"),
            marketplace_items: get_el!("marketplaceItems"),
            list_energy_form: get_html!("listEnergyForm"),
            energy_amount: get_input!("energyAmount"),
            price_per_unit: get_input!("pricePerUnit"),
            expiry_date: get_input!("expiryDate"),

            demand_chart: get_canvas!("demandChart"),
            country_select: get_select!("countrySelect"),
            peak_demand: get_el!("peakDemand"),
            peak_time: get_el!("peakTime"),
            low_demand: get_el!("lowDemand"),
            low_time: get_el!("lowTime"),
            avg_demand: get_el!("avgDemand"),

            current_price: get_el!("currentPrice"),
            total_consumption: get_el!("totalConsumption"),
            efficiency: get_el!("efficiency"),
            carbon_offset: get_el!("carbonOffset"),
        })
    }
}
