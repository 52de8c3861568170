//! fetch APIによるOCR/RAG送信

use medicine_ocr_common::{Reply, Transport};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, RequestMode, Response};

/// ブラウザの `fetch` を使う送信手段
pub struct FetchTransport;

impl Transport for FetchTransport {
    type File = File;
    type Error = String;

    async fn post_image(&self, url: &str, file: &File) -> Result<Reply, String> {
        let form = FormData::new().map_err(js_error)?;
        form.append_with_blob_and_filename("file", file, &file.name())
            .map_err(js_error)?;

        // Content-Typeはブラウザがboundary付きで設定する
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&form);

        let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
        send(request).await
    }

    async fn post_json(&self, url: &str, body: String) -> Result<Reply, String> {
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_error)?;
        send(request).await
    }
}

async fn send(request: Request) -> Result<Reply, String> {
    let window = web_sys::window().ok_or_else(|| "window is not available".to_string())?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let resp: Response = resp_value.dyn_into().map_err(js_error)?;

    // 非成功時も本文はログ用に読む
    let body = JsFuture::from(resp.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;

    Ok(Reply::new(resp.status(), body.as_string().unwrap_or_default()))
}

fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
