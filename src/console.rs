use std::io::Write;

use anyhow::{Context, Result};

use crate::invoice::LineItem;

/// Consoleにinvoiceの行を表示するためのtrait。
pub trait ConsolePresenter {
    /// invoiceの行を表示する。
    ///
    /// # Arguments
    ///
    /// * `items` - 表示する行
    fn show_line_items(&mut self, items: &[LineItem]) -> Result<()>;
}

/// invoiceの行をMarkdownのlist形式で表示する。
pub struct ConsoleMarkdownList<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleMarkdownList<'a, W> {
    /// 新しい`ConsoleMarkdownList`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleMarkdownList<'a, W> {
    // 入力順のまま表示し、最後に合計時間と合計金額を表示する。
    fn show_line_items(&mut self, items: &[LineItem]) -> Result<()> {
        for item in items {
            writeln!(
                self.writer,
                "- {}: {:.2}h x {:.2} = {:.2}",
                item.name,
                item.quantity,
                item.unit_cost,
                item.quantity * item.unit_cost
            )
            .with_context(|| format!("Failed to write line item: {:?}", item))?;
        }

        let (total_hours, total_amount) = items.iter().fold((0.0, 0.0), |(hours, amount), item| {
            (hours + item.quantity, amount + item.quantity * item.unit_cost)
        });
        writeln!(
            self.writer,
            "\nTotal: {:.2}h, {:.2}",
            total_hours, total_amount
        )
        .context("Failed to write total")?;

        Ok(())
    }
}
