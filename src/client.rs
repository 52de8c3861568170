//! reqwestによるOCR/RAG送信

use crate::error::{MedicineOcrError, Result};
use medicine_ocr_common::{Reply, Transport};
use reqwest::multipart::{Form, Part};
use std::path::Path;

/// アップロード対象の画像
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// ファイルを読み込み、内容からMIMEタイプを推定
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(MedicineOcrError::FileNotFound(path.display().to_string()));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| MedicineOcrError::ImageLoad(format!("{}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let mime_type = detect_mime_type(&bytes, path).to_string();

        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }
}

/// 画像のMIMEタイプ（内容 → 拡張子 → octet-stream の順で判定）
pub fn detect_mime_type(bytes: &[u8], path: &Path) -> &'static str {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type();
    }

    path.extension()
        .and_then(image::ImageFormat::from_extension)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// reqwestを使う送信手段
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("medicine-ocr/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MedicineOcrError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }

    async fn reply(response: reqwest::Response) -> std::result::Result<Reply, reqwest::Error> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(Reply::new(status, body))
    }
}

impl Transport for HttpTransport {
    type File = ImageFile;
    type Error = reqwest::Error;

    async fn post_image(&self, url: &str, file: &ImageFile) -> std::result::Result<Reply, reqwest::Error> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)?;
        let form = Form::new().part("file", part);

        let response = self.client.post(url).multipart(form).send().await?;
        Self::reply(response).await
    }

    async fn post_json(&self, url: &str, body: String) -> std::result::Result<Reply, reqwest::Error> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        Self::reply(response).await
    }
}
