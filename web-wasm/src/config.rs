//! ホストページからのエンドポイント設定
//!
//! `<meta name="medicine-ocr:ocr-endpoint" content="...">` のように指定する。
//! 未指定・不正な値はデフォルト（localhost:5000）を使う。

use medicine_ocr_common::Endpoints;
use wasm_bindgen::JsCast;
use web_sys::HtmlMetaElement;

const OCR_ENDPOINT_META: &str = "medicine-ocr:ocr-endpoint";
const RAG_ENDPOINT_META: &str = "medicine-ocr:rag-endpoint";

pub fn endpoints_from_document() -> Endpoints {
    resolve_endpoints(meta_content(OCR_ENDPOINT_META), meta_content(RAG_ENDPOINT_META))
}

fn resolve_endpoints(ocr: Option<String>, rag: Option<String>) -> Endpoints {
    let defaults = Endpoints::default();
    let endpoints = Endpoints::new(
        ocr.unwrap_or(defaults.ocr.clone()),
        rag.unwrap_or(defaults.rag.clone()),
    );

    match endpoints.validate() {
        Ok(()) => endpoints,
        Err(e) => {
            log::warn!("{}; using default endpoints", e);
            defaults
        }
    }
}

fn meta_content(name: &str) -> Option<String> {
    let document = web_sys::window()?.document()?;
    let element = document
        .query_selector(&format!("meta[name=\"{}\"]", name))
        .ok()??;
    let meta: HtmlMetaElement = element.dyn_into().ok()?;
    let content = meta.content();
    let content = content.trim();
    (!content.is_empty()).then(|| content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        assert_eq!(resolve_endpoints(None, None), Endpoints::default());
    }

    #[test]
    fn test_resolve_overrides() {
        let endpoints = resolve_endpoints(
            Some("https://api.example.com/ocr".into()),
            Some("https://api.example.com/rag".into()),
        );
        assert_eq!(endpoints.ocr, "https://api.example.com/ocr");
        assert_eq!(endpoints.rag, "https://api.example.com/rag");
    }

    #[test]
    fn test_resolve_partial_override() {
        let endpoints = resolve_endpoints(None, Some("http://10.0.0.2:8000/rag".into()));
        assert_eq!(endpoints.ocr, "http://localhost:5000/ocr");
        assert_eq!(endpoints.rag, "http://10.0.0.2:8000/rag");
    }

    #[test]
    fn test_resolve_invalid_falls_back() {
        let endpoints = resolve_endpoints(Some("localhost:5000/ocr".into()), None);
        assert_eq!(endpoints, Endpoints::default());
    }
}
