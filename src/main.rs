use clap::Parser;
use medicine_ocr::{cli, client, config, error, picker, processor, scanner};
use cli::{Cli, Commands};
use config::{Config, EndpointOverrides};
use error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match cli.command {
        Commands::Process { path, pick, recursive, json } => {
            let overrides = EndpointOverrides {
                base_url: cli.base_url,
                ocr: cli.ocr_endpoint,
                rag: cli.rag_endpoint,
            };
            let endpoints = Config::load()?.resolve_endpoints(&overrides)?;
            log::info!("OCR: {}, RAG: {}", endpoints.ocr, endpoints.rag);

            let mut images = scanner::collect_images(&path, recursive)?;
            if images.is_empty() {
                return Err(error::MedicineOcrError::NoImagesFound(path.display().to_string()));
            }

            if pick {
                match picker::pick_image(&images)? {
                    Some(image) => images = vec![image],
                    None => {
                        println!("キャンセルしました");
                        return Ok(());
                    }
                }
            }

            let transport = client::HttpTransport::new()?;
            let reports = processor::process_batch(&transport, &endpoints, &images, !json, |report| {
                if !json {
                    println!("{}", processor::render_report(report));
                }
            })
            .await;

            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            }
        }

        Commands::Config { set_ocr_endpoint, set_rag_endpoint, reset, show } => {
            // 壊れた設定ファイルでも --reset で復旧できるよう、リセット時は読み込まない
            let mut config = if reset {
                let config = Config::reset()?;
                println!("✔ 設定を初期値に戻しました");
                config
            } else {
                Config::load()?
            };

            if let Some(url) = set_ocr_endpoint {
                config.set_ocr_endpoint(url)?;
                println!("✔ OCRエンドポイントを設定しました");
            }

            if let Some(url) = set_rag_endpoint {
                config.set_rag_endpoint(url)?;
                println!("✔ RAGエンドポイントを設定しました");
            }

            if show {
                println!("設定:");
                println!("  ファイル: {}", Config::config_path()?.display());
                println!("  OCRエンドポイント: {}", config.ocr_endpoint);
                println!("  RAGエンドポイント: {}", config.rag_endpoint);
            }
        }
    }

    Ok(())
}
