//! Trailmark: SEO content enrichment for a travel blog.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use trailmark_core::ServerConfig;
use trailmark_server::{build_router, maintenance, AppState};

fn resolve_data_dir() -> PathBuf {
    std::env::var("TRAILMARK_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            if let Some(dir) = exe_dir {
                let parent_data = dir.join("../data");
                if parent_data.exists() {
                    return parent_data;
                }
            }
            PathBuf::from("data")
        })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        let data_dir = || {
            args.get(2)
                .map(PathBuf::from)
                .unwrap_or_else(resolve_data_dir)
        };
        match args[1].as_str() {
            "--reindex" | "reindex" => {
                let report = maintenance::reindex(&data_dir());
                maintenance::print_report(&report);
                std::process::exit(if report.is_ok() { 0 } else { 1 });
            }
            "--validate" | "validate" => {
                let report = maintenance::validate(&data_dir());
                maintenance::print_report(&report);
                std::process::exit(if report.is_ok() { 0 } else { 1 });
            }
            "--help" | "-h" | "help" => {
                println!("Trailmark: SEO content enrichment for a travel blog");
                println!();
                println!("Usage: trailmark [command]");
                println!();
                println!("Commands:");
                println!("  (none)                   Start the server");
                println!("  reindex [data-dir]       Rebuild hashtag and location indexes");
                println!("  validate [data-dir]      Check posts and generated structured data");
                println!("  help                     Show this help message");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'trailmark help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = ServerConfig::from_env(&data_dir)?;
    let port = config.port;

    let state = Arc::new(AppState::load(config)?);
    info!(
        "Loaded {} posts for {} ({})",
        state.store.len(),
        state.site.name,
        state.site.url
    );

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Trailmark server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
