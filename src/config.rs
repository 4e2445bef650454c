use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{de, Deserialize, Deserializer};

use crate::datetime;
use crate::error::ConfigError;
use crate::invoice::InvoiceMetadata;

const APP_NAME: &str = "clockify-invoice";
const CONFIG_JSON: &str = "config.json";
const DEFAULT_INPUT: &str = "invoice_data.json";
const DEFAULT_OUTPUT: &str = "invoice.pdf";
const DEFAULT_INVOICE_NUMBER: u64 = 1;
pub const DEFAULT_GENERATOR_URL: &str = "https://invoice-generator.com";

/// 設定ファイルの内容。CLIの引数も同じ構造体で表し、後から重ねる。
///
/// 全ての項目は省略可能で、省略された項目は`Config`でデフォルト値になる。
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigFile {
    pub sender: Option<String>,
    pub receiver: Option<String>,
    #[serde(deserialize_with = "deserialize_invoice_number")]
    pub invoice_number: Option<u64>,
    pub rate_per_hour: Option<f64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub invoice_period: Option<String>,
    pub notes: Option<String>,
    pub invoice_data_file_path: Option<PathBuf>,
    pub output_file_path: Option<PathBuf>,
    pub invoice_generator_url: Option<String>,
    pub retries: Option<u32>,
}

impl ConfigFile {
    /// JSONの設定ファイルを読み込む。
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `path`が指定されていればそれを読み込む。
    ///
    /// 指定されていない場合は、カレントディレクトリ、ユーザーの設定ディレクトリの順に探し、
    /// どちらにもなければ空の設定を返す。
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            info!("Loading config from {}", path.display());
            return Self::load(path);
        }

        let candidates = std::iter::once(PathBuf::from(CONFIG_JSON))
            .chain(dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_JSON)));
        for candidate in candidates {
            if candidate.is_file() {
                info!("Loading config from {}", candidate.display());
                return Self::load(&candidate);
            }
            debug!("No config file at {}", candidate.display());
        }

        info!("No config file found, using command line arguments and defaults");
        Ok(Self::default())
    }

    /// `other`で設定されている項目で上書きする。
    pub fn merge(self, other: ConfigFile) -> Self {
        Self {
            sender: other.sender.or(self.sender),
            receiver: other.receiver.or(self.receiver),
            invoice_number: other.invoice_number.or(self.invoice_number),
            rate_per_hour: other.rate_per_hour.or(self.rate_per_hour),
            name: other.name.or(self.name),
            email: other.email.or(self.email),
            address: other.address.or(self.address),
            invoice_period: other.invoice_period.or(self.invoice_period),
            notes: other.notes.or(self.notes),
            invoice_data_file_path: other.invoice_data_file_path.or(self.invoice_data_file_path),
            output_file_path: other.output_file_path.or(self.output_file_path),
            invoice_generator_url: other.invoice_generator_url.or(self.invoice_generator_url),
            retries: other.retries.or(self.retries),
        }
    }
}

/// 設定ファイルの数値表現。`1.0`のような小数表記も許す。
#[derive(Deserialize)]
#[serde(untagged)]
enum InvoiceNumber {
    Integer(u64),
    Float(f64),
}

/// 請求番号を読み込む。整数値の小数(`12.0`)は整数として扱い、それ以外はエラーにする。
fn deserialize_invoice_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<InvoiceNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(InvoiceNumber::Integer(number)) => Ok(Some(number)),
        Some(InvoiceNumber::Float(number))
            if number >= 0.0 && number.fract() == 0.0 && number < u64::MAX as f64 =>
        {
            Ok(Some(number as u64))
        }
        Some(InvoiceNumber::Float(number)) => Err(de::Error::custom(format!(
            "invoiceNumber must be a non-negative integer, got {}",
            number
        ))),
    }
}

/// 1回の実行で利用する設定。起動時に1度だけ作成し、以降は変更しない。
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub metadata: InvoiceMetadata,
    pub rate_per_hour: f64,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub generator_url: String,
    pub retries: u32,
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        Self {
            metadata: InvoiceMetadata {
                sender: file.sender.unwrap_or_default(),
                receiver: file.receiver.unwrap_or_default(),
                number: file.invoice_number.unwrap_or(DEFAULT_INVOICE_NUMBER),
                name: file.name.unwrap_or_default(),
                email: file.email.unwrap_or_default(),
                address: file.address.unwrap_or_default(),
                period: file.invoice_period.unwrap_or_else(datetime::current_period),
                notes: file.notes.unwrap_or_default(),
            },
            rate_per_hour: file.rate_per_hour.unwrap_or_default(),
            input_path: file
                .invoice_data_file_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT)),
            output_path: file
                .output_file_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            generator_url: file
                .invoice_generator_url
                .unwrap_or_else(|| DEFAULT_GENERATOR_URL.to_string()),
            retries: file.retries.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use chrono::{Local, TimeZone};
    use rstest::rstest;
    use tempfile::NamedTempFile;

    use super::{Config, ConfigFile, DEFAULT_GENERATOR_URL};
    use crate::datetime::mock_datetime;
    use crate::error::ConfigError;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load() {
        let file = config_file(
            r#"{
                "sender": "Jane Doe",
                "receiver": "Acme Inc.",
                "invoiceNumber": 12,
                "ratePerHour": 85.5,
                "name": "Jane",
                "email": "jane@example.com",
                "address": "1 Main St",
                "invoicePeriod": "May 2024",
                "notes": "Net 30",
                "invoiceDataFilePath": "data.json",
                "outputFilePath": "out.pdf"
            }"#,
        );

        let config = Config::from(ConfigFile::load(file.path()).unwrap());

        assert_eq!(config.metadata.sender, "Jane Doe");
        assert_eq!(config.metadata.receiver, "Acme Inc.");
        assert_eq!(config.metadata.number, 12);
        assert_eq!(config.metadata.period, "May 2024");
        assert_eq!(config.metadata.notes, "Net 30");
        assert_eq!(config.rate_per_hour, 85.5);
        assert_eq!(config.input_path, PathBuf::from("data.json"));
        assert_eq!(config.output_path, PathBuf::from("out.pdf"));
        assert_eq!(config.generator_url, DEFAULT_GENERATOR_URL);
        assert_eq!(config.retries, 0);
    }

    #[test]
    fn test_defaults() {
        let date = Local.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        mock_datetime::set_mock_time(date.to_utc());

        let config = Config::from(ConfigFile::default());

        assert_eq!(config.metadata.number, 1);
        assert_eq!(config.metadata.sender, "");
        assert_eq!(config.metadata.period, "March 2024");
        assert_eq!(config.rate_per_hour, 0.0);
        assert_eq!(config.input_path, PathBuf::from("invoice_data.json"));
        assert_eq!(config.output_path, PathBuf::from("invoice.pdf"));

        mock_datetime::clear_mock_time();
    }

    #[test]
    fn test_merge_prefers_other() {
        let file = ConfigFile {
            sender: Some("from file".to_string()),
            receiver: Some("receiver from file".to_string()),
            rate_per_hour: Some(50.0),
            ..Default::default()
        };
        let args = ConfigFile {
            sender: Some("from args".to_string()),
            rate_per_hour: Some(75.0),
            ..Default::default()
        };

        let config = Config::from(file.merge(args));

        assert_eq!(config.metadata.sender, "from args");
        assert_eq!(config.metadata.receiver, "receiver from file");
        assert_eq!(config.rate_per_hour, 75.0);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let err = ConfigFile::discover(Some(&path)).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_malformed_json() {
        let file = config_file(r#"{"sender": "Jane", "#);

        let err = ConfigFile::load(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[rstest]
    #[case::integer("12", Some(12))]
    #[case::integral_float("12.0", Some(12))]
    #[case::null("null", None)]
    fn test_load_invoice_number(#[case] number: &str, #[case] expected: Option<u64>) {
        let file = config_file(&format!(r#"{{"invoiceNumber": {}}}"#, number));

        let loaded = ConfigFile::load(file.path()).unwrap();

        assert_eq!(loaded.invoice_number, expected);
    }

    #[rstest]
    #[case::fraction("1.5")]
    #[case::negative("-1")]
    #[case::negative_float("-3.0")]
    fn test_load_invalid_invoice_number(#[case] number: &str) {
        let file = config_file(&format!(r#"{{"invoiceNumber": {}}}"#, number));

        let err = ConfigFile::load(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn test_load_wrong_type() {
        let file = config_file(r#"{"invoiceNumber": "twelve"}"#);

        let err = ConfigFile::load(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Json { .. }));
    }
}
