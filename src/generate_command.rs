use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{error, info};

use crate::args::InvoiceArgs;
use crate::config::Config;
use crate::error::GeneratorError;
use crate::generator::InvoiceGenerator;
use crate::invoice::{build_line_items, InvoicePayload};
use crate::time_entry::read_time_entries;

/// invoiceを生成するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct GenerateArgs {
    #[clap(flatten)]
    pub invoice: InvoiceArgs,
}

/// `generate`サブコマンドの結果。
#[derive(Debug, PartialEq)]
pub enum GenerateOutcome {
    /// 生成されたinvoiceを書き込んだ。
    Written { path: PathBuf, size: usize },
    /// 生成APIが失敗を返したため、何も書き込んでいない。
    Rejected { status: u16, body: String },
}

pub struct GenerateCommand<'a, T: InvoiceGenerator> {
    generator: &'a T,
}

impl<'a, T: InvoiceGenerator> GenerateCommand<'a, T> {
    /// 新しい`GenerateCommand`を返す。
    ///
    /// # Arguments
    /// * `generator` - invoiceのドキュメントを生成するサービス
    pub fn new(generator: &'a T) -> Self {
        Self { generator }
    }

    /// `generate`サブコマンドの処理を行う。
    ///
    /// time entryを読み込んでinvoiceを組み立て、生成APIへ送信し、結果をファイルに書き込む。
    /// 生成APIが失敗を返した場合はエラーを表示し、ファイルは書き込まない。
    ///
    /// # Arguments
    ///
    /// * `config` - 起動時に読み込んだ設定
    pub async fn run(&self, config: &Config) -> Result<GenerateOutcome> {
        let time_entries = read_time_entries(&config.input_path)
            .context("Failed to read time entries")?;
        info!(
            "Read {} time entries from {}",
            time_entries.len(),
            config.input_path.display()
        );

        let items = build_line_items(&time_entries, config.rate_per_hour);
        let payload = InvoicePayload::assemble(items, &config.metadata);

        let document = match self.generator.generate(&payload).await {
            Ok(document) => document,
            Err(GeneratorError::Rejected { status, body }) => {
                error!(
                    "Invoice generator rejected invoice #{} with status {}: {}",
                    payload.number, status, body
                );
                return Ok(GenerateOutcome::Rejected { status, body });
            }
            Err(err) => return Err(anyhow::Error::new(err).context("Failed to generate invoice")),
        };

        tokio::fs::write(&config.output_path, &document)
            .await
            .with_context(|| format!("Failed to write {}", config.output_path.display()))?;

        Ok(GenerateOutcome::Written {
            path: config.output_path.clone(),
            size: document.len(),
        })
    }
}
