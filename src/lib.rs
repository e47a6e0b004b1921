/// New Tab Dashboard - Chrome extension new-tab page
/// Built with Rust + WASM + Yew

pub mod dashboard;
pub mod error;
pub mod favorites;
mod notify;
pub mod platform;
mod random;
pub mod settings;
pub mod shortcuts;
pub mod sites;
pub mod storage;
pub mod ui;
pub mod widgets;

use wasm_bindgen::prelude::*;

pub use dashboard::Dashboard;
pub use error::{DashboardError, Result};

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export icon lookup for JavaScript access
#[wasm_bindgen]
pub fn default_icon(url: &str) -> String {
    sites::default_icon(url).to_string()
}

// Start the Yew app for the new-tab page
#[wasm_bindgen]
pub fn start_newtab() {
    yew::Renderer::<ui::newtab::NewTab>::new().render();
}
