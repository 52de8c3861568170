use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "medicine-ocr")]
#[command(about = "薬品画像をOCRし、参照情報を取得するクライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// サービスのベースURL（/ocr と /rag を付けて使う）
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// OCRエンドポイント
    #[arg(long, global = true)]
    pub ocr_endpoint: Option<String>,

    /// RAGエンドポイント
    #[arg(long, global = true)]
    pub rag_endpoint: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像をOCRし、参照情報を取得
    Process {
        /// 画像ファイルまたはフォルダ
        #[arg(required = true)]
        path: PathBuf,

        /// フォルダ内の画像を対話式に1枚選ぶ
        #[arg(short, long)]
        pick: bool,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 設定を管理
    Config {
        /// OCRエンドポイントを保存
        #[arg(long)]
        set_ocr_endpoint: Option<String>,

        /// RAGエンドポイントを保存
        #[arg(long)]
        set_rag_endpoint: Option<String>,

        /// 設定を初期値に戻す
        #[arg(long)]
        reset: bool,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
