//! セッション状態
//!
//! 抽出テキスト・参照テキストの2つの表示欄と、実行中フラグ・世代番号を管理する。
//! 状態遷移（欄ごと）: idle → processing → {ready | failed}

/// 処理中表示
pub const PROCESSING: &str = "Processing...";
/// テキストなし（OCR/RAGの応答フィールド欠落時）
pub const NO_TEXT_FOUND: &str = "No text found";
/// OCR失敗・通信失敗
pub const ERROR_UPLOADING: &str = "Error uploading file";
/// RAG失敗
pub const ERROR_FETCHING_RAG: &str = "Error fetching RAG";
/// エラー表示とみなす接頭辞（OCRサービスは上流の失敗を200で `"Error: ..."` と返す）
pub const ERROR_PREFIX: &str = "Error";

/// 表示欄の状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TextState {
    #[default]
    Idle,
    Processing,
    Ready(String),
    Failed(String),
}

impl TextState {
    /// 画面に出す文字列
    pub fn display_text(&self) -> &str {
        match self {
            TextState::Idle => "",
            TextState::Processing => PROCESSING,
            TextState::Ready(text) => text,
            TextState::Failed(message) => message,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, TextState::Idle)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, TextState::Processing)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TextState::Failed(_))
    }

    /// エラーとして表示すべきか
    ///
    /// 失敗状態に加え、サービスが返したテキスト自体が `"Error"` で始まる場合も含む。
    pub fn shows_as_error(&self) -> bool {
        match self {
            TextState::Failed(_) => true,
            TextState::Ready(text) => text.starts_with(ERROR_PREFIX),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextState::Idle => "idle",
            TextState::Processing => "processing",
            TextState::Ready(_) => "ready",
            TextState::Failed(_) => "failed",
        }
    }
}

/// 1回のトリガーを識別する世代番号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// パイプラインの進行イベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// OCR成功（フォールバック済みテキスト）
    OcrResolved(String),
    /// OCRが非成功ステータスを返した
    OcrFailed,
    /// RAG要求を開始
    RagStarted,
    /// RAG成功
    RagResolved {
        text: String,
        medicine: Option<String>,
    },
    /// RAGが非成功ステータスを返した
    RagFailed,
    /// 通信例外・応答の読み取り失敗
    TransportFailed,
    /// 実行終了
    Finished,
}

/// 1画面分のセッション状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub extracted: TextState,
    pub contextual: TextState,
    /// RAGが返した薬品名
    pub medicine: Option<String>,
    in_flight: bool,
    generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// トリガー可能か（ファイル選択済みかつ実行中でない）
    pub fn can_trigger(&self, has_file: bool) -> bool {
        has_file && !self.in_flight
    }

    /// トリガーボタンのラベル
    pub fn trigger_label(&self) -> &'static str {
        if self.in_flight {
            PROCESSING
        } else {
            "Process"
        }
    }

    /// 新しい実行を開始
    ///
    /// ファイル未選択・実行中の場合は状態を変えずに `None`。
    pub fn begin(&mut self, has_file: bool) -> Option<Ticket> {
        if !self.can_trigger(has_file) {
            return None;
        }
        self.generation += 1;
        self.in_flight = true;
        self.extracted = TextState::Processing;
        self.contextual = TextState::Idle;
        self.medicine = None;
        Some(Ticket(self.generation))
    }

    /// ファイル再選択時に呼ぶ
    ///
    /// 実行中の場合はその実行を破棄し、表示欄を初期化する。
    /// 実行中でなければ前回の結果はそのまま残す。
    ///
    /// 破棄した実行の要求は中断されず送信中のまま残る。トリガーは直ちに再び
    /// 有効になり、古い実行の応答は世代が合わないため `apply` で捨てられる
    /// （古い実行はRAG要求を出さずに終わる）。
    pub fn invalidate(&mut self) {
        if !self.in_flight {
            return;
        }
        self.generation += 1;
        self.in_flight = false;
        self.extracted = TextState::Idle;
        self.contextual = TextState::Idle;
        self.medicine = None;
    }

    /// イベントを適用
    ///
    /// 古い世代のイベントは無視して `false` を返す。
    pub fn apply(&mut self, ticket: Ticket, step: Step) -> bool {
        if ticket.0 != self.generation || !self.in_flight {
            return false;
        }

        match step {
            Step::OcrResolved(text) => self.extracted = TextState::Ready(text),
            Step::OcrFailed => self.extracted = TextState::Failed(ERROR_UPLOADING.to_string()),
            Step::RagStarted => self.contextual = TextState::Processing,
            Step::RagResolved { text, medicine } => {
                self.contextual = TextState::Ready(text);
                self.medicine = medicine;
            }
            Step::RagFailed => {
                self.contextual = TextState::Failed(ERROR_FETCHING_RAG.to_string())
            }
            Step::TransportFailed => {
                self.extracted = TextState::Failed(ERROR_UPLOADING.to_string());
                self.contextual = TextState::Failed(ERROR_UPLOADING.to_string());
            }
            Step::Finished => self.in_flight = false,
        }
        true
    }
}
