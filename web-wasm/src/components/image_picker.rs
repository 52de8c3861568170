//! 画像選択・プレビューコンポーネント

use leptos::prelude::*;
use medicine_ocr_common::FileSelection;
use web_sys::{File, HtmlInputElement};

/// 未選択時のプレビュー画像（無地のSVG）
pub const PLACEHOLDER_PREVIEW: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='640' height='480'%3E%3Crect width='100%25' height='100%25' fill='%23171717'/%3E%3C/svg%3E";

/// プレビューに使うURL
pub fn preview_src(preview: Option<&str>) -> String {
    preview.unwrap_or(PLACEHOLDER_PREVIEW).to_string()
}

#[component]
pub fn ImagePicker<F>(
    selection: RwSignal<FileSelection<File>, LocalStorage>,
    on_file_selected: F,
) -> impl IntoView
where
    F: Fn(File) + 'static + Clone,
{
    let on_change = move |ev: web_sys::Event| {
        let input = event_target::<HtmlInputElement>(&ev);
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            on_file_selected(file);
        }
    };

    view! {
        <div class="image-picker">
            <div class="preview">
                <img
                    src=move || selection.with(|s| preview_src(s.preview()))
                    alt="Uploaded"
                />
            </div>
            <div class="file-row">
                // 画像のみに絞るのは入力欄のヒントだけ（検証はしない）
                <input
                    type="file"
                    id="file-upload"
                    accept="image/*"
                    class="hidden"
                    on:change=on_change
                />
                <label for="file-upload" class="btn btn-secondary">
                    "Choose File"
                </label>
                <span class="file-name">
                    {move || selection.with(|s| s.display_name().to_string())}
                </span>
            </div>
        </div>
    }
}
