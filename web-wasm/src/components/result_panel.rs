//! 結果表示コンポーネント
//!
//! - Extracted Text: OCR結果
//! - From Database: RAG結果（薬品名つき）
//!
//! OCRがエラー（`Error` で始まる応答テキストを含む）の場合はエラー文言のみを表示する。

use leptos::prelude::*;
use medicine_ocr_common::{to_html, SessionState, TextState};

/// 表示欄のHTML（Markdownをレンダリング）
pub fn render_text(state: &TextState) -> String {
    to_html(state.display_text())
}

/// 表示欄のCSSクラス
pub fn body_class(state: &TextState) -> &'static str {
    match state {
        TextState::Processing => "section-body processing",
        state if state.shows_as_error() => "section-body error",
        _ => "section-body",
    }
}

#[component]
pub fn ResultPanel(session: RwSignal<SessionState>) -> impl IntoView {
    let extracted = Signal::derive(move || session.with(|s| s.extracted.clone()));
    let contextual = Signal::derive(move || session.with(|s| s.contextual.clone()));
    let medicine = Signal::derive(move || session.with(|s| s.medicine.clone()));

    view! {
        <Show when=move || !extracted.with(TextState::is_idle)>
            <div class="result-panel">
                <Show
                    when=move || !extracted.with(TextState::shows_as_error)
                    fallback=move || view! {
                        <div class="error-text">
                            {move || extracted.with(|s| s.display_text().to_string())}
                        </div>
                    }
                >
                    <TextSection title="Extracted Text" state=extracted />
                    <Show when=move || !contextual.with(TextState::is_idle)>
                        <Show when=move || medicine.with(Option::is_some)>
                            <p class="medicine-name">
                                "Detected medicine: "
                                {move || medicine.get().unwrap_or_default()}
                            </p>
                        </Show>
                        <TextSection title="From Database" state=contextual />
                    </Show>
                </Show>
            </div>
        </Show>
    }
}

#[component]
fn TextSection(title: &'static str, state: Signal<TextState>) -> impl IntoView {
    view! {
        <section class="section">
            <div class="section-title">{title}</div>
            <div
                class=move || state.with(body_class)
                inner_html=move || state.with(render_text)
            />
        </section>
    }
}
