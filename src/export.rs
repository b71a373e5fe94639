// 📤 Workbook Export - Four-sheet financial package
// Income Statement, Balance Sheet, Statement of Equity, General Ledger.

use crate::balances::balances;
use crate::error::Result;
use crate::statements::{BalanceSheet, IncomeStatement, Period, StatementOfEquity, StatementRow};
use crate::transaction::Transaction;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, XlsxError};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    fn text(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn new(name: &str, columns: &[&str]) -> Self {
        Sheet {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn statement(name: &str, columns: &[&str], rows: Vec<StatementRow>, account_first: bool) -> Self {
        let mut sheet = Sheet::new(name, columns);
        for row in rows {
            let account = Cell::text(row.account.as_deref().unwrap_or(""));
            let category = Cell::text(&row.category);
            let cells = match (columns.len(), account_first) {
                (2, _) => vec![category, Cell::Number(row.amount)],
                (_, true) => vec![account, category, Cell::Number(row.amount)],
                (_, false) => vec![category, account, Cell::Number(row.amount)],
            };
            sheet.rows.push(cells);
        }
        sheet
    }

    /// Header row in bold, then one row per entry. Numbers stay numeric.
    fn write_worksheet(&self, xlsx: &mut XlsxWorkbook) -> std::result::Result<(), XlsxError> {
        let header = Format::new().set_bold();
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(self.name.as_str())?;

        for (col, title) in self.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, title.as_str(), &header)?;
        }

        for (i, row) in self.rows.iter().enumerate() {
            let r = i as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Text(s) => worksheet.write_string(r, col as u16, s.as_str())?,
                    Cell::Number(n) => worksheet.write_number(r, col as u16, *n)?,
                };
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn build(transactions: &[Transaction]) -> Self {
        let balances = balances(transactions);
        let period = Period::default();

        let income = Sheet::statement(
            "Income Statement",
            &["Category", "Amount"],
            IncomeStatement::from_balances(&balances, period).to_rows(),
            false,
        );
        let balance_sheet = Sheet::statement(
            "Balance Sheet",
            &["Category", "Account", "Amount"],
            BalanceSheet::from_balances(&balances).to_rows(),
            false,
        );
        let equity = Sheet::statement(
            "Statement of Equity",
            &["Account", "Category", "Amount"],
            StatementOfEquity::from_balances(&balances, period).to_rows(),
            true,
        );

        let mut ledger = Sheet::new("General Ledger", &["Date", "Account", "Debit", "Credit", "Description"]);
        for tx in transactions {
            ledger.rows.push(vec![
                Cell::text(tx.date()),
                Cell::text(tx.account()),
                Cell::Number(tx.debit()),
                Cell::Number(tx.credit()),
                Cell::text(tx.description()),
            ]);
        }

        Workbook {
            sheets: vec![income, balance_sheet, equity, ledger],
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Render the whole workbook as `.xlsx` bytes, one worksheet per sheet.
    pub fn to_xlsx(&self) -> Result<Vec<u8>> {
        let mut xlsx = XlsxWorkbook::new();
        for sheet in &self.sheets {
            sheet.write_worksheet(&mut xlsx)?;
        }
        Ok(xlsx.save_to_buffer()?)
    }

    /// Write the workbook to a single `.xlsx` file.
    pub fn write_xlsx(&self, path: &Path) -> Result<()> {
        let bytes = self.to_xlsx()?;
        fs::write(path, bytes)?;

        tracing::info!(path = %path.display(), sheets = self.sheets.len(), "workbook exported");
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
