use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Clockifyからエクスポートしたtime entry。
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeEntry {
    pub description: String,
    pub project_name: String,
    pub client_name: String,
    /// 実行中のtimerは`null`になる。
    pub duration: Option<String>,
}

/// time entryのJSONファイルを読み込む。ファイル内の順序を保持する。
pub fn read_time_entries(path: &Path) -> Result<Vec<TimeEntry>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}
