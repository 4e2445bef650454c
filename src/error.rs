use std::path::PathBuf;

use thiserror::Error;

/// 設定ファイルおよびtime entryファイルの読み込みに関するエラー。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Clockifyのduration文字列が`PT<h>H<m>M<s>S`の形式ではない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed duration: {token:?}")]
pub struct MalformedDurationError {
    pub token: String,
}

/// invoice生成APIとの通信に関するエラー。
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Failed to send request to invoice generator at {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invoice generator responded with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl GeneratorError {
    /// リトライする価値のあるエラーかどうか。
    ///
    /// 通信エラーと5xxのみを対象とし、4xxはリクエスト内容の問題なので対象外とする。
    pub fn is_retryable(&self) -> bool {
        match self {
            GeneratorError::Transport { .. } => true,
            GeneratorError::Rejected { status, .. } => *status >= 500,
        }
    }
}
