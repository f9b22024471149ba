//! Development preview server
//!
//! Serves the generated demo page with live reload: edits to the scene
//! config regenerate the page, and writes under the output directory push a
//! reload to connected browsers.

use std::path::{Path, PathBuf};

use axum::Router;
use notify::{Event, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tower_http::services::ServeDir;
use tower_livereload::LiveReloadLayer;

use crate::io::FormatRegistry;

/// Read the scene config and rewrite the demo page
fn regenerate(input: &Path, output: &Path) -> anyhow::Result<()> {
    let registry = FormatRegistry::with_defaults();

    let reader = registry.reader_for_path(input)?;
    let mut scene = reader.read(input)?;
    for warning in scene.normalize() {
        tracing::warn!(config = %input.display(), "{}", warning);
    }

    let writer = registry
        .writer_for_format("html")
        .ok_or_else(|| anyhow::anyhow!("HTML writer not found"))?;
    writer.write(&scene, output)?;
    Ok(())
}

/// Start the development server with hot reload
pub async fn serve(input: &Path, output: &Path, port: u16) -> anyhow::Result<()> {
    // Generate the initial page
    regenerate(input, output)?;
    tracing::info!(output = %output.display(), "generated initial demo page");

    // Channel for config change notifications
    let (tx, mut rx) = mpsc::channel::<()>(1);

    let tx_clone = tx.clone();
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
        if let Ok(event) = res {
            if event.kind.is_modify() || event.kind.is_create() {
                let _ = tx_clone.blocking_send(());
            }
        }
    })?;

    // Watch the config file's parent directory
    let watch_path = input
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    watcher.watch(&watch_path, RecursiveMode::NonRecursive)?;

    // Regeneration task
    let input_for_regen = input.to_path_buf();
    let output_for_regen = output.to_path_buf();
    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            // Debounce: wait a bit for rapid changes to settle
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

            // Drain any additional notifications
            while rx.try_recv().is_ok() {}

            match regenerate(&input_for_regen, &output_for_regen) {
                Ok(()) => tracing::info!("regenerated demo page"),
                Err(e) => tracing::error!("error regenerating: {e}"),
            }
        }
    });

    // Live reload when anything under the output directory changes
    let livereload = LiveReloadLayer::new();
    let reloader = livereload.reloader();

    let mut output_watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
        if let Ok(event) = res {
            if event.kind.is_modify() || event.kind.is_create() {
                reloader.reload();
            }
        }
    })?;
    output_watcher.watch(output, RecursiveMode::Recursive)?;

    let app = Router::new()
        .fallback_service(ServeDir::new(output))
        .layer(livereload);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("Preview server running at http://localhost:{port}");
    println!("Watching {} for changes...", input.display());
    println!("Press Ctrl+C to stop");

    // Keep watchers alive
    let _watcher = watcher;
    let _output_watcher = output_watcher;

    axum::serve(listener, app).await?;

    Ok(())
}
