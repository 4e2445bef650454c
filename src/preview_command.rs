use anyhow::{Context, Result};
use log::info;

use crate::args::InvoiceArgs;
use crate::config::Config;
use crate::console::ConsolePresenter;
use crate::invoice::build_line_items;
use crate::time_entry::read_time_entries;

/// invoiceを送信せずに内容を確認するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct PreviewArgs {
    #[clap(flatten)]
    pub invoice: InvoiceArgs,
}

/// `preview`サブコマンドの処理を行う。
///
/// `generate`と同じ手順でinvoiceの行を作成し、生成APIへは送信せずに表示する。
///
/// # Arguments
///
/// * `config` - 起動時に読み込んだ設定
/// * `presenter` - invoiceの行を表示する先
pub fn preview_command<P: ConsolePresenter>(config: &Config, presenter: &mut P) -> Result<()> {
    let time_entries =
        read_time_entries(&config.input_path).context("Failed to read time entries")?;
    info!(
        "Read {} time entries from {}",
        time_entries.len(),
        config.input_path.display()
    );

    let items = build_line_items(&time_entries, config.rate_per_hour);
    presenter
        .show_line_items(&items)
        .context("Failed to show line items")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::preview_command;
    use crate::config::{Config, ConfigFile};
    use crate::console::ConsoleMarkdownList;

    #[test]
    fn test_preview_command() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("invoice_data.json");
        fs::write(
            &input,
            r#"[{"description": "Fix bug", "projectName": "Site", "clientName": "Acme", "duration": "PT1H30M"}]"#,
        )
        .unwrap();
        let config = Config::from(ConfigFile {
            rate_per_hour: Some(100.0),
            invoice_period: Some("March 2024".to_string()),
            invoice_data_file_path: Some(input),
            ..Default::default()
        });
        let mut writer = Vec::new();
        let mut presenter = ConsoleMarkdownList::new(&mut writer);

        preview_command(&config, &mut presenter).unwrap();

        assert_eq!(
            String::from_utf8(writer).unwrap(),
            "- Client Name: Acme | Project Name: Site | Description: Fix bug: 1.50h x 100.00 = 150.00\n\nTotal: 1.50h, 150.00\n"
        );
    }

    #[test]
    fn test_preview_command_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from(ConfigFile {
            invoice_period: Some("March 2024".to_string()),
            invoice_data_file_path: Some(dir.path().join("missing.json")),
            ..Default::default()
        });
        let mut writer = Vec::new();
        let mut presenter = ConsoleMarkdownList::new(&mut writer);

        assert!(preview_command(&config, &mut presenter).is_err());
    }
}
