//! エンドポイント設定
//!
//! OCR/RAGサービスのURLは固定値ではなく、呼び出し側から注入する。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// デフォルトのサービスベースURL
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// OCR/RAGエンドポイント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// 画像を送信してOCRテキストを受け取る
    pub ocr: String,
    /// OCRテキストを送信して参照情報を受け取る
    pub rag: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::from_base(DEFAULT_BASE_URL)
    }
}

impl Endpoints {
    pub fn new(ocr: impl Into<String>, rag: impl Into<String>) -> Self {
        Self {
            ocr: ocr.into(),
            rag: rag.into(),
        }
    }

    /// ベースURLから `/ocr` と `/rag` を導出
    pub fn from_base(base: &str) -> Self {
        let base = base.trim().trim_end_matches('/');
        Self {
            ocr: format!("{}/ocr", base),
            rag: format!("{}/rag", base),
        }
    }

    /// 両方のURLが http(s) であることを確認
    pub fn validate(&self) -> Result<()> {
        for (label, url) in [("ocr", &self.ocr), ("rag", &self.rag)] {
            if !is_http_url(url) {
                return Err(Error::Config(format!(
                    "{} endpoint must be an http(s) URL: {:?}",
                    label, url
                )));
            }
        }
        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    matches!(rest, Some(host) if !host.is_empty() && !host.starts_with('/'))
}
