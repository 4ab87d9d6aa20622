use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use tracing::warn;

pub const PAGE_SIZE: i64 = 200;
pub const MAX_PAGE_SIZE: i64 = 1_000;
/// Rows left below the viewport before the next page is requested.
pub const PREFETCH_ROWS: usize = 60;
pub const ROW_HEIGHT_PX: f64 = 32.0;
pub const OVERSCAN_ROWS: usize = 10;

const DB_PATH_ENV: &str = "VIEWGRID_DB_PATH";
const PAGE_SIZE_ENV: &str = "VIEWGRID_PAGE_SIZE";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub page_size: i64,
    pub prefetch_rows: usize,
    pub row_height: f64,
    pub overscan_rows: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let db_path = match std::env::var_os(DB_PATH_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => default_db_path()?,
        };
        let page_size = std::env::var(PAGE_SIZE_ENV)
            .ok()
            .map(|raw| parse_page_size(&raw))
            .unwrap_or(PAGE_SIZE);

        Ok(Self {
            db_path,
            page_size,
            prefetch_rows: PREFETCH_ROWS,
            row_height: ROW_HEIGHT_PX,
            overscan_rows: OVERSCAN_ROWS,
        })
    }
}

fn parse_page_size(raw: &str) -> i64 {
    match raw.trim().parse::<i64>() {
        Ok(size) if size > 0 => size.min(MAX_PAGE_SIZE),
        _ => {
            warn!(value = %raw, "invalid {PAGE_SIZE_ENV}, using {PAGE_SIZE}");
            PAGE_SIZE
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "viewgrid", "viewgrid")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

pub fn default_db_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().join("viewgrid.sqlite"))
}

pub fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

pub fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_webview_data_dir(project_dirs()?.data_local_dir())
}
