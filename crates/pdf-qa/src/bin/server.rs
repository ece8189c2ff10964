//! PDF Q&A server binary
//!
//! Run with: cargo run -p pdf-qa --bin pdf-qa-server

use pdf_qa::{config::AppConfig, server::PdfQaServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_qa=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                        PDF Q&A                            ║
║         Upload a PDF, ask questions about its text        ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let config = AppConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Upload dir: {}", config.storage.upload_dir.display());
    tracing::info!("  - Text dir: {}", config.storage.text_dir.display());
    tracing::info!("  - Max upload: {} bytes", config.storage.max_upload_size);
    tracing::info!("  - LLM model: {}", config.llm.model);
    tracing::info!("  - Context window: {} chars", config.query.max_context_chars);

    if config.llm.api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY is not set; queries will fail until it is");
    }

    let server = PdfQaServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/upload - Upload a PDF (field 'pdf')");
    println!("  POST /api/query  - Ask a question {{query, filename}}");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
