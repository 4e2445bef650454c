use chrono::{DateTime, Local, Utc};

/// 請求期間のデフォルト値に利用するフォーマット。例: `March 2024`
const PERIOD_FORMAT: &str = "%B %Y";

#[cfg(not(test))]
/// 現在のUTC時間を取得する。
pub fn now() -> DateTime<Utc> {
    Utc::now()
}


#[cfg(test)]
pub use mock_datetime::now;

/// Localタイムゾーンでの今月を請求期間の文字列として返す。
pub fn current_period() -> String {
    now().with_timezone(&Local).format(PERIOD_FORMAT).to_string()
}
