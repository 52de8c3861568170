//! 対話式の画像選択

use crate::error::{MedicineOcrError, Result};
use crate::scanner::ImageInfo;
use dialoguer::Select;

/// 一覧から1枚選ぶ（1枚しかなければそのまま返す）
pub fn pick_image(images: &[ImageInfo]) -> Result<Option<ImageInfo>> {
    match images {
        [] => Ok(None),
        [only] => Ok(Some(only.clone())),
        _ => {
            let items: Vec<&str> = images.iter().map(|i| i.file_name.as_str()).collect();
            let index = Select::new()
                .with_prompt("処理する画像を選択")
                .items(&items)
                .default(0)
                .interact_opt()
                .map_err(|e| MedicineOcrError::Prompt(e.to_string()))?;
            Ok(index.map(|i| images[i].clone()))
        }
    }
}
