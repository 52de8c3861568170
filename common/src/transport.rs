//! HTTP送信の抽象
//!
//! Webは `fetch`、CLIは `reqwest` で実装する。テストではモックを使う。

use std::fmt::Display;

/// HTTP応答（ステータスと本文）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xxかどうか
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// OCR/RAGサービスへの送信手段
///
/// WASMのFutureは `Send` にならないため、`Send` 境界は課さない。
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// アップロード対象のファイルハンドル
    type File;
    type Error: Display;

    /// `file` フィールドにファイルを載せたmultipartで送信
    async fn post_image(&self, url: &str, file: &Self::File) -> Result<Reply, Self::Error>;

    /// JSON本文を送信
    async fn post_json(&self, url: &str, body: String) -> Result<Reply, Self::Error>;
}
