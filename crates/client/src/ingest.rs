use std::{io::Cursor, path::Path};

use api_types::transaction::{NewTransaction, TransactionKind};
use calamine::{Data, DataType, Range, Reader};
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{ClientError, Result};

/// Fixed output name for the downloadable example workbook.
pub const TEMPLATE_FILE_NAME: &str = "шаблон_транзакций.xlsx";

/// Days between the spreadsheet epoch (1899-12-30) and 1970-01-01.
const SERIAL_UNIX_OFFSET: f64 = 25_569.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Localized column labels and classification rules for one sheet layout.
///
/// The defaults match the Russian workbook layout the tool ships templates
/// for. Date, Type, Category and Amount are required columns; Subcategory
/// and Description are optional. Unknown extra columns are ignored.
#[derive(Clone, Debug)]
pub struct SheetSchema {
    pub date_label: String,
    pub kind_label: String,
    pub category_label: String,
    pub subcategory_label: String,
    pub amount_label: String,
    pub description_label: String,
    /// Case-insensitive substring that classifies a Type cell as income;
    /// any non-match (including an empty cell) is an expense.
    pub income_keyword: String,
    /// Category substituted when the cell is blank.
    pub placeholder_category: String,
    /// Sheet name used by the exported template.
    pub sheet_name: String,
}

impl Default for SheetSchema {
    fn default() -> Self {
        Self {
            date_label: "Дата".to_string(),
            kind_label: "Тип".to_string(),
            category_label: "Категория".to_string(),
            subcategory_label: "Подкатегория".to_string(),
            amount_label: "Сумма".to_string(),
            description_label: "Описание".to_string(),
            income_keyword: "доход".to_string(),
            placeholder_category: "Не указана".to_string(),
            sheet_name: "Транзакции".to_string(),
        }
    }
}

/// A row-level anomaly that was normalized instead of rejected.
///
/// Rows is 1-based as shown in a spreadsheet UI (the header is row 1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseWarning {
    /// The date cell was unreadable; the row was stamped with the current
    /// wall-clock time.
    BadDate { row: usize },
    /// The amount cell was non-numeric; the row imported with amount 0.
    BadAmount { row: usize },
}

/// Result of one eager pass over the first worksheet.
#[derive(Clone, Debug, Default)]
pub struct ParsedSheet {
    /// Normalized records in row order.
    pub records: Vec<NewTransaction>,
    pub warnings: Vec<ParseWarning>,
}

struct Columns {
    date: usize,
    kind: usize,
    category: usize,
    amount: usize,
    subcategory: Option<usize>,
    description: Option<usize>,
}

impl SheetSchema {
    /// Reads `path` and parses it; unreadable files fail with `FileRead`
    /// before any parsing is attempted.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedSheet> {
        let bytes = std::fs::read(path).map_err(ClientError::FileRead)?;
        self.parse_bytes(&bytes)
    }

    /// Parses a spreadsheet document (`.xlsx` or `.xls`) into normalized
    /// records, reading only the first worksheet.
    ///
    /// Structural problems (not a workbook, no sheets, missing required
    /// header labels) fail with `Parse` and produce nothing. Row-level
    /// anomalies are normalized, never rejected: an unreadable date
    /// defaults to the current time and a non-numeric amount to zero, each
    /// recorded on the warning channel.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ParsedSheet> {
        let cursor = Cursor::new(bytes.to_vec());
        let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
            .map_err(|err| ClientError::Parse(err.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ClientError::Parse("workbook has no sheets".to_string()))?
            .map_err(|err| ClientError::Parse(err.to_string()))?;
        self.parse_range(&range)
    }

    fn parse_range(&self, range: &Range<Data>) -> Result<ParsedSheet> {
        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| ClientError::Parse("sheet has no header row".to_string()))?;
        let columns = self.map_columns(header)?;

        let mut sheet = ParsedSheet::default();
        for (offset, row) in rows.enumerate() {
            let row_number = offset + 2;
            let record = self.map_row(&columns, row, row_number, &mut sheet.warnings);
            sheet.records.push(record);
        }
        Ok(sheet)
    }

    fn map_columns(&self, header: &[Data]) -> Result<Columns> {
        let mut date = None;
        let mut kind = None;
        let mut category = None;
        let mut amount = None;
        let mut subcategory = None;
        let mut description = None;

        for (idx, cell) in header.iter().enumerate() {
            let Some(label) = cell.as_string() else {
                continue;
            };
            let label = label.trim().to_string();
            if label == self.date_label {
                date = Some(idx);
            } else if label == self.kind_label {
                kind = Some(idx);
            } else if label == self.category_label {
                category = Some(idx);
            } else if label == self.amount_label {
                amount = Some(idx);
            } else if label == self.subcategory_label {
                subcategory = Some(idx);
            } else if label == self.description_label {
                description = Some(idx);
            }
        }

        let mut missing = Vec::new();
        if date.is_none() {
            missing.push(self.date_label.as_str());
        }
        if kind.is_none() {
            missing.push(self.kind_label.as_str());
        }
        if category.is_none() {
            missing.push(self.category_label.as_str());
        }
        if amount.is_none() {
            missing.push(self.amount_label.as_str());
        }
        if !missing.is_empty() {
            return Err(ClientError::Parse(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }

        Ok(Columns {
            date: date.unwrap_or(0),
            kind: kind.unwrap_or(0),
            category: category.unwrap_or(0),
            amount: amount.unwrap_or(0),
            subcategory,
            description,
        })
    }

    fn map_row(
        &self,
        columns: &Columns,
        row: &[Data],
        row_number: usize,
        warnings: &mut Vec<ParseWarning>,
    ) -> NewTransaction {
        let kind_cell = cell_text(row, columns.kind).unwrap_or_default();
        let kind = self.classify_kind(&kind_cell);

        let date = match parse_date_cell(row.get(columns.date)) {
            Some(date) => date,
            None => {
                warnings.push(ParseWarning::BadDate { row: row_number });
                Utc::now()
            }
        };

        // The stored amount is always the magnitude; direction lives in `kind`.
        let amount_minor = match parse_amount_cell(row.get(columns.amount)) {
            Some(value) => value.abs(),
            None => {
                warnings.push(ParseWarning::BadAmount { row: row_number });
                0
            }
        };

        let category = cell_text(row, columns.category)
            .unwrap_or_else(|| self.placeholder_category.clone());
        let subcategory = columns.subcategory.and_then(|idx| cell_text(row, idx));
        let description = columns.description.and_then(|idx| cell_text(row, idx));

        NewTransaction {
            kind,
            amount_minor,
            date,
            category,
            subcategory,
            description,
        }
    }

    fn classify_kind(&self, cell: &str) -> TransactionKind {
        if cell
            .to_lowercase()
            .contains(&self.income_keyword.to_lowercase())
        {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        }
    }
}

fn cell_text(row: &[Data], idx: usize) -> Option<String> {
    let text = match row.get(idx)? {
        Data::String(raw) => raw.trim().to_string(),
        Data::Float(value) => value.to_string(),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn parse_date_cell(cell: Option<&Data>) -> Option<DateTime<Utc>> {
    match cell? {
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|naive| naive.and_utc())
            .or_else(|| serial_to_datetime(dt.as_f64())),
        Data::Float(serial) => serial_to_datetime(*serial),
        Data::Int(serial) => serial_to_datetime(*serial as f64),
        Data::String(raw) => parse_date_text(raw),
        Data::DateTimeIso(raw) => parse_date_text(raw),
        _ => None,
    }
}

/// Converts a spreadsheet serial day count to a timestamp. The fractional
/// part of the serial is the time of day.
fn serial_to_datetime(serial: f64) -> Option<DateTime<Utc>> {
    if !serial.is_finite() {
        return None;
    }
    let seconds = (serial - SERIAL_UNIX_OFFSET) * SECONDS_PER_DAY;
    DateTime::from_timestamp(seconds.round() as i64, 0)
}

fn parse_date_text(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}

/// Coerces an amount cell to signed minor units. Empty cells coerce to
/// zero; `None` means the cell was non-numeric.
fn parse_amount_cell(cell: Option<&Data>) -> Option<i64> {
    match cell? {
        Data::Float(value) => major_to_minor(*value),
        Data::Int(value) => value.checked_mul(100),
        Data::Empty => Some(0),
        Data::String(raw) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Some(0);
            }
            let normalized = raw
                .replace([' ', '\u{a0}'], "")
                .replace(',', ".");
            normalized
                .parse::<f64>()
                .ok()
                .and_then(major_to_minor)
        }
        _ => None,
    }
}

fn major_to_minor(value: f64) -> Option<i64> {
    let minor = (value * 100.0).round();
    (minor.is_finite() && minor.abs() < i64::MAX as f64).then_some(minor as i64)
}

struct TemplateRow {
    date: &'static str,
    kind: &'static str,
    category: &'static str,
    subcategory: &'static str,
    amount: f64,
    description: &'static str,
}

// The expense amount is negative on purpose: the template demonstrates
// that a sign in the source cell does not survive into the stored record.
const TEMPLATE_ROWS: [TemplateRow; 2] = [
    TemplateRow {
        date: "2024-01-15",
        kind: "Доход",
        category: "Зарплата",
        subcategory: "Основная",
        amount: 100_000.0,
        description: "Зарплата за январь",
    },
    TemplateRow {
        date: "2024-01-16",
        kind: "Расход",
        category: "Еда",
        subcategory: "Продукты",
        amount: -5_000.0,
        description: "Покупка продуктов",
    },
];

impl SheetSchema {
    /// Builds the two-row example workbook users download before their
    /// first import. Pure: same schema, same bytes' content; carries no
    /// runtime state and is not consumed by parsing.
    pub fn template_workbook(&self) -> Result<Vec<u8>> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(self.sheet_name.as_str())
            .map_err(workbook_error)?;

        let labels = [
            &self.date_label,
            &self.kind_label,
            &self.category_label,
            &self.subcategory_label,
            &self.amount_label,
            &self.description_label,
        ];
        for (col, label) in labels.into_iter().enumerate() {
            sheet
                .write_string(0, col as u16, label.as_str())
                .map_err(workbook_error)?;
        }

        for (idx, row) in TEMPLATE_ROWS.iter().enumerate() {
            let r = idx as u32 + 1;
            sheet.write_string(r, 0, row.date).map_err(workbook_error)?;
            sheet.write_string(r, 1, row.kind).map_err(workbook_error)?;
            sheet
                .write_string(r, 2, row.category)
                .map_err(workbook_error)?;
            sheet
                .write_string(r, 3, row.subcategory)
                .map_err(workbook_error)?;
            sheet
                .write_number(r, 4, row.amount)
                .map_err(workbook_error)?;
            sheet
                .write_string(r, 5, row.description)
                .map_err(workbook_error)?;
        }

        workbook.save_to_buffer().map_err(workbook_error)
    }
}

fn workbook_error(err: rust_xlsxwriter::XlsxError) -> ClientError {
    ClientError::Workbook(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn income_keyword_matches_substring_case_insensitive() {
        let schema = SheetSchema::default();
        assert_eq!(schema.classify_kind("Доход"), TransactionKind::Income);
        assert_eq!(schema.classify_kind("ДОХОДЫ"), TransactionKind::Income);
        assert_eq!(schema.classify_kind("прочий доход"), TransactionKind::Income);
    }

    #[test]
    fn everything_else_is_expense() {
        let schema = SheetSchema::default();
        assert_eq!(schema.classify_kind("Расход"), TransactionKind::Expense);
        assert_eq!(schema.classify_kind("перевод"), TransactionKind::Expense);
        assert_eq!(schema.classify_kind(""), TransactionKind::Expense);
    }

    #[test]
    fn serial_45306_is_mid_january_2024() {
        let dt = serial_to_datetime(45_306.0).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn serial_fraction_is_time_of_day() {
        let dt = serial_to_datetime(45_306.5).unwrap();
        assert_eq!(dt.time(), chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    }

    #[test]
    fn date_text_accepts_iso_and_dotted_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(parse_date_text("2024-02-01").unwrap().date_naive(), expected);
        assert_eq!(parse_date_text("01.02.2024").unwrap().date_naive(), expected);
        assert_eq!(
            parse_date_text("2024-02-01T10:30:00+03:00").unwrap().date_naive(),
            expected
        );
    }

    #[test]
    fn garbage_date_text_is_none() {
        assert!(parse_date_text("not-a-date").is_none());
        assert!(parse_date_text("").is_none());
    }

    #[test]
    fn amount_strings_accept_comma_and_spaces() {
        let cell = Data::String("1 234,56".to_string());
        assert_eq!(parse_amount_cell(Some(&cell)), Some(123_456));
    }

    #[test]
    fn empty_amount_coerces_to_zero() {
        assert_eq!(parse_amount_cell(Some(&Data::Empty)), Some(0));
        let blank = Data::String("   ".to_string());
        assert_eq!(parse_amount_cell(Some(&blank)), Some(0));
    }

    #[test]
    fn non_numeric_amount_is_none() {
        let cell = Data::String("сто рублей".to_string());
        assert_eq!(parse_amount_cell(Some(&cell)), None);
    }

    #[test]
    fn float_amounts_round_to_minor_units() {
        assert_eq!(parse_amount_cell(Some(&Data::Float(99.99))), Some(9_999));
        assert_eq!(parse_amount_cell(Some(&Data::Int(-5_000))), Some(-500_000));
    }
}
