//! Medicine OCR Web App (Leptos + WASM)

pub mod api;
mod app;
mod components;
mod config;
mod logger;

use app::App;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logger::init(if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });

    let endpoints = config::endpoints_from_document();
    log::info!("OCR endpoint: {}, RAG endpoint: {}", endpoints.ocr, endpoints.rag);

    leptos::mount::mount_to_body(move || view! { <App endpoints=endpoints /> });
}
