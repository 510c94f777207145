use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use xdg::BaseDirectories;

/// ログレベル指定用の環境変数（EnvFilter 形式）
pub const LOG_ENV: &str = "DESCVAL_LOG";

/// ログファイル: ~/.local/state/descval/descval.log
pub fn log_file_path() -> PathBuf {
    BaseDirectories::with_prefix("descval")
        .map(|dirs| dirs.get_state_home())
        .unwrap_or_else(|_| PathBuf::from(".local/state/descval"))
        .join("descval.log")
}

fn open_log_file(path: &PathBuf) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Logs go to a file because the TUI owns the
/// terminal; if the file cannot be opened, logging is disabled.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let path = log_file_path();

    let result = match open_log_file(&path) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init(),
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("off"))
            .with_writer(std::io::sink)
            .try_init(),
    };
    // 二重初期化（テストなど）は無視
    let _ = result;
}
