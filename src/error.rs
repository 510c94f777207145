use std::path::PathBuf;
use thiserror::Error;

/// データセット読み込みエラー
///
/// いずれの場合もセッション状態は変更されない。
#[derive(Debug, Error)]
pub enum LoadError {
    /// 必須カラムが不足している
    #[error("CSV file must contain columns: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    /// CSV として解釈できない
    #[error("Error reading the CSV file: {0}")]
    Parse(#[from] csv::Error),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 結果ファイルの書き込みに失敗した
#[derive(Debug, Error)]
#[error("Failed to write results to {}: {source}", .path.display())]
pub struct SinkWriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Errors from the session driver's file-upload and persist paths.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Sink(#[from] SinkWriteError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("keybinding '{key}' is assigned to both {first} and {second}")]
    DuplicateKey {
        key: char,
        first: &'static str,
        second: &'static str,
    },
}
