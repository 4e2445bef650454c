use std::str::FromStr;

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::MalformedDurationError;

/// Clockifyのduration文字列(`PT1H30M15S`)にマッチする正規表現。
static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").unwrap());

/// 請求時間の小数点以下の桁数。
const BILLABLE_PRECISION: i32 = 2;

/// この秒数以上であれば1分に切り上げる。
const ROUND_UP_SECONDS: u64 = 30;

/// 時間、分、秒に分解した経過時間。
///
/// 分と秒は文字列に書かれた値をそのまま保持し、正規化はしない。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeSpan {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeSpan {
    pub fn new(hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// 請求に利用する時間数を返す。
    ///
    /// 30秒以上は1分に切り上げ、30秒未満は切り捨てる。
    /// 結果は小数点以下2桁に四捨五入する(0.5は0から遠い方へ丸める)。
    ///
    /// 切り上げで分が60になっても時間へ繰り上げない。`hours + minutes / 60`で同じ値になるため。
    ///
    /// # Examples
    ///
    /// ```
    /// let span = TimeSpan::new(1, 30, 0);
    /// assert_eq!(span.billable_hours(), 1.5);
    /// ```
    pub fn billable_hours(&self) -> f64 {
        let round_up = if self.seconds >= ROUND_UP_SECONDS {
            1.0
        } else {
            0.0
        };
        let minutes = self.minutes as f64 + round_up;
        let hours = self.hours as f64 + minutes / 60.0;

        round_half_away(hours, BILLABLE_PRECISION)
    }
}

impl FromStr for TimeSpan {
    type Err = MalformedDurationError;

    /// `PT<h>H<m>M<s>S`形式の文字列をパースする。各セグメントは省略可能で、省略時は0とする。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedDurationError {
            token: s.to_string(),
        };
        let captures = DURATION_RE.captures(s).ok_or_else(malformed)?;

        let segment = |index: usize| -> Result<u64, MalformedDurationError> {
            captures
                .get(index)
                .map(|m| m.as_str().parse::<u64>().map_err(|_| malformed()))
                .unwrap_or(Ok(0))
        };

        Ok(Self {
            hours: segment(1)?,
            minutes: segment(2)?,
            seconds: segment(3)?,
        })
    }
}

/// duration文字列をパースする。
///
/// 形式が不正な場合は警告を出して0時間として扱う。
pub fn parse_duration(token: &str) -> TimeSpan {
    token.parse().unwrap_or_else(|err: MalformedDurationError| {
        warn!("{}, billing it as 0 hours", err);
        TimeSpan::default()
    })
}

/// `span`を請求時間に変換する。
pub fn round_to_billable_hours(span: TimeSpan) -> f64 {
    span.billable_hours()
}

/// `value`を小数点以下`precision`桁に丸める。0.5は符号に合わせて0から遠い方へ丸める。
pub fn round_half_away(value: f64, precision: i32) -> f64 {
    let scale = 10f64.powi(precision);
    (value * scale + 0.5f64.copysign(value)).trunc() / scale
}
