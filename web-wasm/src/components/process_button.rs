//! 処理開始ボタン

use leptos::prelude::*;

#[component]
pub fn ProcessButton<F>(
    #[prop(into)] enabled: Signal<bool>,
    #[prop(into)] label: Signal<&'static str>,
    on_process: F,
) -> impl IntoView
where
    F: Fn(()) + 'static + Clone,
{
    view! {
        <button
            class=move || if enabled.get() { "btn btn-primary btn-wide" } else { "btn btn-primary btn-wide disabled" }
            disabled=move || !enabled.get()
            on:click={
                let on_process = on_process.clone();
                move |_| on_process(())
            }
        >
            {move || label.get()}
        </button>
    }
}
