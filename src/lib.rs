pub mod app;
pub mod client;
pub mod components;
pub mod config;
pub mod error;
#[cfg(feature = "ssr")]
pub mod handlers;
#[cfg(feature = "ssr")]
pub mod middleware;
pub mod notes;
pub mod protocol;
pub mod server_fn;
#[cfg(feature = "ssr")]
pub mod services;
pub mod state;
pub mod types;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
