use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lektor::api::{create_router, AppState};
use lektor::chat::ChatClient;
use lektor::config::Config;
use lektor::ocr::TesseractEngine;
use lektor::tts::TtsClient;

#[derive(Parser)]
#[command(name = "lektor")]
#[command(about = "Language-tutor backend: chat, TTS playback and OCR pipelines")]
struct Args {
    /// Probe the OCR engine, print the result, and exit
    #[arg(long)]
    check_tesseract: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lektor=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let ocr = Arc::new(TesseractEngine::new(&config.ocr));

    if args.check_tesseract {
        match ocr.probe().await {
            Ok(version) => {
                println!("{}: {}", ocr.command(), version);
                return Ok(());
            }
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }

    if config.chat.api_key.is_none() {
        tracing::warn!(
            "OPENAI_API_KEY is not set - chat and TTS requests will fail against the upstream."
        );
    }

    tracing::info!("Probing OCR engine: {}...", config.ocr.command);
    if let Err(e) = ocr.probe().await {
        tracing::warn!("OCR unavailable - image endpoints will re-probe on demand: {e}");
    }

    let chat = ChatClient::new(&config.chat)?;

    let tts = match TtsClient::new(&config.tts) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!("TTS unavailable - speech endpoints will report the failure: {e}");
            None
        }
    };

    let state = AppState::new(config.clone(), chat, tts, ocr);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Lektor starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/", addr);
    tracing::info!("  Diagnostics:  http://{}/api/diag", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
