mod app;
mod config;
mod domain;
mod infra;
mod platform;
mod ui;
mod usecase;

#[cfg(test)]
mod tests;

use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::default_webview_data_dir;

const DEFAULT_LOG_FILTER: &str = "viewgrid=info,warn";

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let webview_data_dir = match default_webview_data_dir() {
        Ok(dir) => dir,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "failed to prepare webview data directory");
            return;
        }
    };
    tracing::info!(data_dir = %webview_data_dir.display(), "starting viewgrid");

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("ViewGrid"))
                .with_data_directory(webview_data_dir),
        )
        .launch(App);
}
