mod action;
mod app;
mod app_state;
mod component;
mod components;
mod focus;
mod theme;
mod widgets;

use anyhow::Context;

use marquee_core::catalog;
use marquee_core::config::Config;
use marquee_core::layout::HallLayout;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = marquee_core::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("marquee.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code.
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("marquee log: {}", log_path.display());

    tracing::info!("marquee starting…");

    // ── Load config + catalog ────────────────────────────────────────────────
    let config = Config::load().unwrap_or_default();
    let hall = HallLayout::new(config.hall.rows, config.hall.seats_per_row);

    let catalog = catalog::load_or_seed(&config.catalog.catalog_toml, &hall).with_context(|| {
        format!(
            "loading catalog from {}",
            config.catalog.catalog_toml.display()
        )
    })?;
    tracing::info!(
        "catalog loaded: {} movies, {} showtimes, {} seats per hall",
        catalog.movies.len(),
        catalog.showtimes.len(),
        hall.total()
    );

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let session = marquee_core::booking::BookingSession::new(catalog, hall)?;
    let app = app::App::new(session, config.ui.show_keys_bar);
    app.run().await?;

    Ok(())
}
