use serde::Serialize;

use crate::duration::{parse_duration, round_to_billable_hours};
use crate::time_entry::TimeEntry;

/// invoiceの1行。
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: f64,
    pub unit_cost: f64,
}

impl LineItem {
    /// time entryからinvoiceの1行を作成する。
    ///
    /// # Arguments
    ///
    /// * `entry` - 変換するtime entry
    /// * `unit_cost` - 時間単価。検証せずにそのまま設定する
    pub fn from_time_entry(entry: &TimeEntry, unit_cost: f64) -> Self {
        let span = parse_duration(entry.duration.as_deref().unwrap_or_default());

        Self {
            name: line_item_label(entry),
            quantity: round_to_billable_hours(span),
            unit_cost,
        }
    }
}

/// 作業内容を表すラベルを作成する。各フィールドはエスケープしない。
pub fn line_item_label(entry: &TimeEntry) -> String {
    format!(
        "Client Name: {} | Project Name: {} | Description: {}",
        entry.client_name, entry.project_name, entry.description
    )
}

/// time entryの順序を保ったままinvoiceの行に変換する。
pub fn build_line_items(entries: &[TimeEntry], unit_cost: f64) -> Vec<LineItem> {
    entries
        .iter()
        .map(|entry| LineItem::from_time_entry(entry, unit_cost))
        .collect()
}

/// invoiceの送信者、受信者、notes欄の情報。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvoiceMetadata {
    pub sender: String,
    pub receiver: String,
    pub number: u64,
    pub name: String,
    pub email: String,
    pub address: String,
    pub period: String,
    pub notes: String,
}

impl InvoiceMetadata {
    /// notes欄の文字列を作成する。
    ///
    /// 空のフィールドも1行として出力する。
    pub fn notes_block(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}\n",
            self.name, self.email, self.address, self.period, self.notes
        )
    }
}

/// invoice生成APIへ送信するリクエストボディ。
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InvoicePayload {
    pub from: String,
    pub to: String,
    pub number: u64,
    pub items: Vec<LineItem>,
    pub notes: String,
}

impl InvoicePayload {
    /// 行とメタデータからリクエストボディを組み立てる。
    ///
    /// 合計金額は生成API側で計算するため、ここでは計算しない。
    pub fn assemble(items: Vec<LineItem>, metadata: &InvoiceMetadata) -> Self {
        Self {
            from: metadata.sender.clone(),
            to: metadata.receiver.clone(),
            number: metadata.number,
            items,
            notes: metadata.notes_block(),
        }
    }
}
