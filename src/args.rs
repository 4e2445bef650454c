use std::path::PathBuf;

use anyhow::{Context, Result};
use log::debug;

use crate::config::{Config, ConfigFile};

/// `generate`と`preview`で共通の引数。指定された項目は設定ファイルの値より優先する。
#[derive(Debug, Default, clap::Args)]
pub struct InvoiceArgs {
    #[clap(
        short = 'c',
        long = "config",
        help = "Config file [default: ./config.json, then <config dir>/clockify-invoice/config.json]",
        parse(from_os_str)
    )]
    pub config: Option<PathBuf>,

    #[clap(
        short = 'i',
        long = "input",
        help = "Clockify time entries JSON file [default: invoice_data.json]",
        parse(from_os_str)
    )]
    pub input: Option<PathBuf>,

    #[clap(
        short = 'o',
        long = "output",
        help = "Where to write the generated invoice [default: invoice.pdf]",
        parse(from_os_str)
    )]
    pub output: Option<PathBuf>,

    #[clap(
        short = 'r',
        long = "rate",
        allow_hyphen_values = true,
        help = "Rate per hour, may be zero or negative [default: 0]"
    )]
    pub rate: Option<f64>,

    #[clap(long = "sender", help = "Who the invoice is from")]
    pub sender: Option<String>,

    #[clap(long = "receiver", help = "Who the invoice is to")]
    pub receiver: Option<String>,

    #[clap(
        short = 'n',
        long = "number",
        help = "Invoice number, a non-negative integer [default: 1]"
    )]
    pub number: Option<u64>,

    #[clap(long = "name", help = "Name shown in the notes")]
    pub name: Option<String>,

    #[clap(long = "email", help = "Email shown in the notes")]
    pub email: Option<String>,

    #[clap(long = "address", help = "Address shown in the notes")]
    pub address: Option<String>,

    #[clap(
        long = "period",
        help = "Invoice period shown in the notes [default: current month, e.g. \"March 2024\"]"
    )]
    pub period: Option<String>,

    #[clap(long = "notes", help = "Free text appended to the notes")]
    pub notes: Option<String>,

    #[clap(
        long = "api-url",
        help = "Invoice generator endpoint [default: https://invoice-generator.com]"
    )]
    pub api_url: Option<String>,

    #[clap(
        long = "retries",
        help = "Extra attempts on network errors and 5xx responses [default: 0]"
    )]
    pub retries: Option<u32>,
}

impl InvoiceArgs {
    /// 設定ファイルを読み込み、引数で上書きした設定を返す。
    pub fn load_config(&self) -> Result<Config> {
        let file = ConfigFile::discover(self.config.as_deref()).context("Failed to load config")?;
        let config = Config::from(file.merge(self.to_config_file()));
        debug!("Config: {:?}", config);

        Ok(config)
    }

    fn to_config_file(&self) -> ConfigFile {
        ConfigFile {
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
            invoice_number: self.number,
            rate_per_hour: self.rate,
            name: self.name.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            invoice_period: self.period.clone(),
            notes: self.notes.clone(),
            invoice_data_file_path: self.input.clone(),
            output_file_path: self.output.clone(),
            invoice_generator_url: self.api_url.clone(),
            retries: self.retries,
        }
    }
}
