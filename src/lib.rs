//! medicine-ocr: 薬品画像のOCR・参照情報取得クライアント
//!
//! パイプライン本体は medicine_ocr_common にあり、ここではCLI用の
//! 送信手段・設定・画像列挙を提供する。

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod picker;
pub mod processor;
pub mod scanner;
