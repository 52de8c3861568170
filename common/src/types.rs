//! OCR/RAGサービスのワイヤ型
//!
//! - OcrResponse: `POST /ocr` の応答
//! - RagRequest: `POST /rag` の要求
//! - RagResponse: `POST /rag` の応答

use serde::{Deserialize, Serialize};

use crate::state::NO_TEXT_FOUND;

/// `POST /ocr` の応答
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrResponse {
    pub ocr_text: Option<String>,
}

impl OcrResponse {
    /// OCRテキスト（欠落・null・空文字は "No text found"）
    pub fn text_or_sentinel(&self) -> String {
        non_empty_or_sentinel(self.ocr_text.as_deref())
    }
}

/// `POST /rag` の要求
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RagRequest {
    pub ocr_text: String,
}

/// `POST /rag` の応答
///
/// 薬品を特定できなかった場合、サービスは `llm_text` の代わりに `error` を返す。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagResponse {
    pub llm_text: Option<String>,
    pub med_name: Option<String>,
    pub error: Option<String>,
}

impl RagResponse {
    pub fn text_or_sentinel(&self) -> String {
        non_empty_or_sentinel(self.llm_text.as_deref())
    }

    /// 検出された薬品名（空文字は無視）
    pub fn medicine(&self) -> Option<String> {
        self.med_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

fn non_empty_or_sentinel(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NO_TEXT_FOUND.to_string(),
    }
}
