//! Medicine OCR Common Library
//!
//! CLIとWeb(WASM)で共有される型とパイプライン

pub mod config;
pub mod error;
pub mod markdown;
pub mod pipeline;
pub mod selection;
pub mod state;
pub mod transport;
pub mod types;

pub use config::Endpoints;
pub use error::{Error, Result};
pub use markdown::{to_html, to_plain_text};
pub use pipeline::{run_pipeline, should_fetch_context};
pub use selection::FileSelection;
pub use state::{SessionState, Step, TextState, Ticket};
pub use transport::{Reply, Transport};
pub use types::{OcrResponse, RagRequest, RagResponse};
