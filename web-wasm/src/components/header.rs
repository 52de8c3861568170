//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"Medicine OCR and Contextual Information System"</h1>
        </header>
    }
}
