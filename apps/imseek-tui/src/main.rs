//! imseek terminal UI entry point

mod app;
mod events;
mod runtime;
mod ui;

use app::App;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use imseek_core::{ApiClient, SavedCollection, SavedStore, DEFAULT_API_BASE};
use std::io::stdout;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> runtime::Result<()> {
    init_tracing();

    let base = std::env::var("IMSEEK_API").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
    let api = Arc::new(ApiClient::new(&base));

    let saved = match SavedStore::default_path() {
        Some(path) => SavedCollection::load(SavedStore::new(path)),
        None => SavedCollection::in_memory(),
    };
    let app = App::new(saved);

    setup_terminal()?;
    let result = runtime::run(api, app).await;
    restore_terminal()?;
    result
}

/// Log to a file under the data directory; the terminal owns stdout.
/// Logging is best-effort: failure to open the file just disables it.
fn init_tracing() {
    let Some(dir) = dirs::data_dir().map(|d| d.join("imseek")) else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("imseek.log"))
    else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn setup_terminal() -> std::io::Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    Ok(())
}

fn restore_terminal() -> std::io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}
