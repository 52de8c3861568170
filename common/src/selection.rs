//! ファイル選択とプレビュー参照
//!
//! ファイルハンドルの型はプラットフォームごとに異なる（Web: `web_sys::File`、CLI: パス由来の画像）。

/// 未選択時の表示名
pub const NO_FILE_CHOSEN: &str = "No file chosen";

/// 選択中のファイル
#[derive(Debug, Clone)]
pub struct FileSelection<F> {
    handle: Option<F>,
    display_name: String,
    preview: Option<String>,
}

impl<F> Default for FileSelection<F> {
    fn default() -> Self {
        Self {
            handle: None,
            display_name: NO_FILE_CHOSEN.to_string(),
            preview: None,
        }
    }
}

impl<F> FileSelection<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// ファイルを選択（上書き）
    ///
    /// 直前のプレビュー参照を返す。Webではこれを `URL.revokeObjectURL` で解放する。
    pub fn select(
        &mut self,
        handle: F,
        name: impl Into<String>,
        preview: Option<String>,
    ) -> Option<String> {
        self.handle = Some(handle);
        self.display_name = name.into();
        std::mem::replace(&mut self.preview, preview)
    }

    pub fn handle(&self) -> Option<&F> {
        self.handle.as_ref()
    }

    pub fn has_file(&self) -> bool {
        self.handle.is_some()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }
}
