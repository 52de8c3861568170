//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use leptos::task::spawn_local;
use medicine_ocr_common::{run_pipeline, Endpoints, FileSelection, SessionState};
use web_sys::{File, Url};

use crate::api::FetchTransport;
use crate::components::{
    header::Header,
    image_picker::ImagePicker,
    process_button::ProcessButton,
    result_panel::ResultPanel,
};

/// メインアプリケーションコンポーネント
#[component]
pub fn App(endpoints: Endpoints) -> impl IntoView {
    let endpoints = StoredValue::new(endpoints);
    // web_sys::File は Send ではないためローカル保持
    let selection = RwSignal::new_local(FileSelection::<File>::new());
    let session = RwSignal::new(SessionState::new());

    // ファイル選択ハンドラ
    let on_file_selected = move |file: File| {
        let name = file.name();
        let preview = Url::create_object_url_with_blob(&file).ok();
        let previous = selection
            .try_update(|s| s.select(file, name, preview))
            .flatten();
        if let Some(url) = previous {
            let _ = Url::revoke_object_url(&url);
        }
        // 実行中なら古い応答を捨てる
        session.update(SessionState::invalidate);
    };

    // 処理開始ハンドラ
    let on_process = move |_| {
        let Some(file) = selection.with_untracked(|s| s.handle().cloned()) else {
            return;
        };
        let Some(ticket) = session.try_update(|s| s.begin(true)).flatten() else {
            return;
        };
        log::debug!("upload started (generation {})", ticket.generation());

        let endpoints = endpoints.get_value();
        spawn_local(async move {
            run_pipeline(&FetchTransport, &endpoints, &file, |step| {
                session
                    .try_update(|s| s.apply(ticket, step))
                    .unwrap_or(false)
            })
            .await;
        });
    };

    let can_trigger = move || {
        let has_file = selection.with(|s| s.has_file());
        session.with(|s| s.can_trigger(has_file))
    };
    let trigger_label = move || session.with(|s| s.trigger_label());

    view! {
        <div class="container">
            <Header />

            <div class="workspace">
                <div class="left-pane">
                    <ImagePicker selection=selection on_file_selected=on_file_selected />
                    <ProcessButton
                        enabled=Signal::derive(can_trigger)
                        label=Signal::derive(trigger_label)
                        on_process=on_process
                    />
                </div>

                <div class="right-pane">
                    <ResultPanel session=session />
                </div>
            </div>
        </div>
    }
}
