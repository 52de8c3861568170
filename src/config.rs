use crate::error::{MedicineOcrError, Result};
use medicine_ocr_common::Endpoints;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// OCRエンドポイントの環境変数
pub const OCR_ENDPOINT_ENV: &str = "MEDICINE_OCR_OCR_ENDPOINT";
/// RAGエンドポイントの環境変数
pub const RAG_ENDPOINT_ENV: &str = "MEDICINE_OCR_RAG_ENDPOINT";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub ocr_endpoint: String,
    pub rag_endpoint: String,
}

impl Default for Config {
    fn default() -> Self {
        let endpoints = Endpoints::default();
        Self {
            ocr_endpoint: endpoints.ocr,
            rag_endpoint: endpoints.rag,
        }
    }
}

/// コマンドライン引数による上書き
#[derive(Debug, Clone, Default)]
pub struct EndpointOverrides {
    pub base_url: Option<String>,
    pub ocr: Option<String>,
    pub rag: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.endpoints().validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 設定ファイルを初期値で上書き
    ///
    /// 既存ファイルは読まないため、壊れたファイルも修復できる。
    pub fn reset() -> Result<Self> {
        Self::reset_to(&Self::config_path()?)
    }

    pub fn reset_to(path: &Path) -> Result<Self> {
        let config = Self::default();
        config.save_to(path)?;
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MedicineOcrError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("medicine-ocr").join("config.json"))
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(self.ocr_endpoint.clone(), self.rag_endpoint.clone())
    }

    /// 実際に使うエンドポイントを決定
    ///
    /// 優先順位: 引数 > 環境変数 > 設定ファイル
    pub fn resolve_endpoints(&self, overrides: &EndpointOverrides) -> Result<Endpoints> {
        self.resolve_with_env(overrides, |key| std::env::var(key).ok())
    }

    pub fn resolve_with_env(
        &self,
        overrides: &EndpointOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Endpoints> {
        let mut endpoints = self.endpoints();

        if let Some(ocr) = non_empty(env(OCR_ENDPOINT_ENV)) {
            endpoints.ocr = ocr;
        }
        if let Some(rag) = non_empty(env(RAG_ENDPOINT_ENV)) {
            endpoints.rag = rag;
        }

        if let Some(base) = non_empty(overrides.base_url.clone()) {
            endpoints = Endpoints::from_base(&base);
        }
        if let Some(ocr) = non_empty(overrides.ocr.clone()) {
            endpoints.ocr = ocr;
        }
        if let Some(rag) = non_empty(overrides.rag.clone()) {
            endpoints.rag = rag;
        }

        endpoints.validate()?;
        Ok(endpoints)
    }

    pub fn set_ocr_endpoint(&mut self, url: String) -> Result<()> {
        self.ocr_endpoint = url;
        self.save()
    }

    pub fn set_rag_endpoint(&mut self, url: String) -> Result<()> {
        self.rag_endpoint = url;
        self.save()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
