//! 1枚の画像に対するOCR → RAG処理と結果表示

use crate::client::ImageFile;
use crate::error::{MedicineOcrError, Result};
use crate::scanner::ImageInfo;
use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};
use medicine_ocr_common::{
    run_pipeline, to_plain_text, Endpoints, FileSelection, SessionState, Step, Transport,
};
use serde::Serialize;
use std::time::Duration;

/// 1枚分の処理結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReport {
    pub file_name: String,
    pub processed_at: DateTime<Local>,
    pub extracted_status: &'static str,
    pub extracted_text: String,
    pub contextual_status: &'static str,
    pub contextual_text: String,
    pub medicine: Option<String>,
    /// 画像の読み込みなど、送信前に失敗した理由
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessReport {
    pub fn from_session(file_name: &str, state: &SessionState) -> Self {
        // サービスがテキストとして返したエラーも失敗扱い
        let extracted_status = if state.extracted.shows_as_error() {
            "failed"
        } else {
            state.extracted.as_str()
        };

        Self {
            file_name: file_name.to_string(),
            processed_at: Local::now(),
            extracted_status,
            extracted_text: state.extracted.display_text().to_string(),
            contextual_status: state.contextual.as_str(),
            contextual_text: state.contextual.display_text().to_string(),
            medicine: state.medicine.clone(),
            error: None,
        }
    }

    /// 送信前に失敗した画像の結果
    pub fn load_failed(file_name: &str, error: &MedicineOcrError) -> Self {
        let message = error.to_string();
        Self {
            file_name: file_name.to_string(),
            processed_at: Local::now(),
            extracted_status: "failed",
            extracted_text: message.clone(),
            contextual_status: "idle",
            contextual_text: String::new(),
            medicine: None,
            error: Some(message),
        }
    }
}

/// 画像を読み込んでパイプラインを実行
pub async fn process_image<T>(
    transport: &T,
    endpoints: &Endpoints,
    image: &ImageInfo,
    show_progress: bool,
) -> Result<ProcessReport>
where
    T: Transport<File = ImageFile>,
{
    let file = ImageFile::load(&image.path)?;
    log::debug!("{} ({}, {} bytes)", file.file_name, file.mime_type, file.bytes.len());

    let mut selection = FileSelection::new();
    selection.select(file, image.file_name.clone(), Some(image.path.display().to_string()));

    let mut state = SessionState::new();
    let (Some(ticket), Some(file)) = (state.begin(selection.has_file()), selection.handle()) else {
        return Ok(ProcessReport::from_session(selection.display_name(), &state));
    };

    let spinner = if show_progress {
        spinner(format!("{}: OCR処理中...", image.file_name))
    } else {
        ProgressBar::hidden()
    };

    run_pipeline(transport, endpoints, file, |step| {
        if step == Step::RagStarted {
            spinner.set_message(format!("{}: 参照情報を取得中...", image.file_name));
        }
        state.apply(ticket, step)
    })
    .await;

    spinner.finish_and_clear();
    Ok(ProcessReport::from_session(selection.display_name(), &state))
}

/// 複数画像を順に処理
///
/// 1枚の失敗で全体を止めず、失敗した画像も結果に含める。
pub async fn process_batch<T, F>(
    transport: &T,
    endpoints: &Endpoints,
    images: &[ImageInfo],
    show_progress: bool,
    mut on_report: F,
) -> Vec<ProcessReport>
where
    T: Transport<File = ImageFile>,
    F: FnMut(&ProcessReport),
{
    let mut reports = Vec::with_capacity(images.len());

    for image in images {
        let report = match process_image(transport, endpoints, image, show_progress).await {
            Ok(report) => report,
            Err(e) => {
                log::error!("{}: {}", image.file_name, e);
                ProcessReport::load_failed(&image.file_name, &e)
            }
        };
        on_report(&report);
        reports.push(report);
    }

    reports
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// 端末向けの表示文字列
///
/// OCRがエラーの場合はエラー文言のみ。参照情報はRAGを実行した場合のみ。
pub fn render_report(report: &ProcessReport) -> String {
    let mut out = format!("📄 {}\n", report.file_name);

    if report.extracted_status == "failed" {
        out.push_str(&format!("✖ {}\n", report.extracted_text));
        return out;
    }

    out.push_str("\n[Extracted Text]\n");
    out.push_str(&to_plain_text(&report.extracted_text));
    out.push('\n');

    if report.contextual_status != "idle" {
        out.push_str("\n[From Database]");
        if let Some(medicine) = &report.medicine {
            out.push_str(&format!(" {}", medicine));
        }
        out.push('\n');
        out.push_str(&to_plain_text(&report.contextual_text));
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use medicine_ocr_common::TextState;

    fn report(extracted: TextState, contextual: TextState, medicine: Option<&str>) -> ProcessReport {
        let mut state = SessionState::new();
        state.extracted = extracted;
        state.contextual = contextual;
        state.medicine = medicine.map(str::to_string);
        ProcessReport::from_session("label.jpg", &state)
    }

    #[test]
    fn test_render_report_full() {
        let r = report(
            TextState::Ready("PARACETAMOL".into()),
            TextState::Ready("## ข้อควรระวัง\n\nห้ามใช้เกินขนาด".into()),
            Some("PARACETAMOL"),
        );
        let text = render_report(&r);
        assert!(text.starts_with("📄 label.jpg\n"));
        assert!(text.contains("[Extracted Text]\nPARACETAMOL\n"));
        assert!(text.contains("[From Database] PARACETAMOL\n■ ข้อควรระวัง\n\nห้ามใช้เกินขนาด\n"));
    }

    #[test]
    fn test_render_report_ocr_error_only() {
        let r = report(
            TextState::Failed("Error uploading file".into()),
            TextState::Failed("Error uploading file".into()),
            None,
        );
        let text = render_report(&r);
        assert_eq!(text, "📄 label.jpg\n✖ Error uploading file\n");
    }

    #[test]
    fn test_render_report_service_error_text() {
        let r = report(
            TextState::Ready("Error: 401, invalid api key".into()),
            TextState::Ready("No text found".into()),
            None,
        );
        assert_eq!(r.extracted_status, "failed");
        let text = render_report(&r);
        assert_eq!(text, "📄 label.jpg\n✖ Error: 401, invalid api key\n");
    }

    #[test]
    fn test_render_report_without_rag() {
        let r = report(TextState::Ready("No text found".into()), TextState::Idle, None);
        let text = render_report(&r);
        assert!(text.contains("No text found"));
        assert!(!text.contains("[From Database]"));
    }

    #[test]
    fn test_load_failed_report() {
        let err = MedicineOcrError::ImageLoad("label.jpg: permission denied".into());
        let r = ProcessReport::load_failed("label.jpg", &err);
        assert_eq!(r.extracted_status, "failed");
        assert_eq!(r.contextual_status, "idle");
        assert_eq!(r.error.as_deref(), Some(err.to_string().as_str()));

        let text = render_report(&r);
        assert!(text.starts_with("📄 label.jpg\n✖ "));
        assert!(text.contains("permission denied"));

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["extractedStatus"], "failed");
        assert!(json["error"].is_string());
    }

    #[test]
    fn test_report_serialize_camel_case() {
        let r = report(TextState::Ready("abc".into()), TextState::Idle, None);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["fileName"], "label.jpg");
        assert_eq!(json["extractedStatus"], "ready");
        assert_eq!(json["extractedText"], "abc");
        assert_eq!(json["contextualStatus"], "idle");
        assert!(json["processedAt"].is_string());
        assert!(json.get("error").is_none());
    }
}
