//! OCR → RAG 2段階パイプライン
//!
//! Step1: 画像をOCRエンドポイントへ送信
//! Step2: OCRテキストがあればRAGエンドポイントへ送信
//!
//! 状態は持たず、進行を `Step` として通知する。通知先が `false` を返した場合
//! （世代が古い）は以降の要求を出さずに終了する。

use crate::config::Endpoints;
use crate::error::{Error, Result};
use crate::state::{Step, NO_TEXT_FOUND};
use crate::transport::{Reply, Transport};
use crate::types::{OcrResponse, RagRequest, RagResponse};
use serde::de::DeserializeOwned;

/// RAG要求を出すべきOCRテキストか
pub fn should_fetch_context(text: &str) -> bool {
    !text.is_empty() && text != NO_TEXT_FOUND
}

/// パイプラインを実行
///
/// 最後に必ず `Step::Finished` を通知する。
pub async fn run_pipeline<T, E>(transport: &T, endpoints: &Endpoints, file: &T::File, mut emit: E)
where
    T: Transport,
    E: FnMut(Step) -> bool,
{
    drive(transport, endpoints, file, &mut emit).await;
    emit(Step::Finished);
}

async fn drive<T, E>(transport: &T, endpoints: &Endpoints, file: &T::File, emit: &mut E)
where
    T: Transport,
    E: FnMut(Step) -> bool,
{
    // Step1: OCR
    let ocr = match request_ocr(transport, &endpoints.ocr, file).await {
        Ok(ocr) => ocr,
        Err(e) => {
            log::error!("OCR failed: {}", e);
            emit(failure_step(&e, Step::OcrFailed));
            return;
        }
    };
    let text = ocr.text_or_sentinel();

    if !emit(Step::OcrResolved(text.clone())) {
        log::debug!("OCR result discarded (stale run)");
        return;
    }

    if !should_fetch_context(&text) {
        return;
    }

    // Step2: RAG
    if !emit(Step::RagStarted) {
        return;
    }

    let rag = match request_context(transport, &endpoints.rag, text).await {
        Ok(rag) => rag,
        Err(e) => {
            log::error!("RAG failed: {}", e);
            emit(failure_step(&e, Step::RagFailed));
            return;
        }
    };

    if rag.llm_text.is_none() {
        if let Some(error) = &rag.error {
            log::warn!("RAG service reported: {}", error);
        }
    }

    emit(Step::RagResolved {
        text: rag.text_or_sentinel(),
        medicine: rag.medicine(),
    });
}

async fn request_ocr<T: Transport>(transport: &T, url: &str, file: &T::File) -> Result<OcrResponse> {
    log::debug!("POST {} (image)", url);
    let reply = transport
        .post_image(url, file)
        .await
        .map_err(|e| Error::Transport(e.to_string()))?;
    decode(url, reply)
}

async fn request_context<T: Transport>(transport: &T, url: &str, text: String) -> Result<RagResponse> {
    let body = serde_json::to_string(&RagRequest { ocr_text: text })?;
    log::debug!("POST {} ({} bytes)", url, body.len());
    let reply = transport
        .post_json(url, body)
        .await
        .map_err(|e| Error::Transport(e.to_string()))?;
    decode(url, reply)
}

/// 非成功ステータスは `Error::Status`、本文がJSONでなければ `Error::Json`
fn decode<R: DeserializeOwned>(endpoint: &str, reply: Reply) -> Result<R> {
    if !reply.is_success() {
        return Err(Error::Status {
            endpoint: endpoint.to_string(),
            status: reply.status,
            body: reply.body,
        });
    }
    serde_json::from_str(&reply.body).map_err(|e| {
        log::debug!("unparseable body from {}: {}", endpoint, reply.body);
        Error::from(e)
    })
}

/// 失敗をステップに対応付ける
///
/// ステータスエラーのみ段階ごとの失敗で、それ以外（通信・JSON）は両欄を失敗にする。
fn failure_step(error: &Error, on_status: Step) -> Step {
    match error {
        Error::Status { .. } => on_status,
        _ => Step::TransportFailed,
    }
}
