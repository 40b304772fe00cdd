//! Workbook construction helpers shared by the integration tests.

pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Blank,
}

/// Builds a single-sheet workbook with the given header row and data rows.
pub fn workbook(headers: &[&str], rows: &[&[Cell<'_>]]) -> Vec<u8> {
    let mut wb = rust_xlsxwriter::Workbook::new();
    let sheet = wb.add_worksheet();
    write_rows(sheet, headers, rows);
    wb.save_to_buffer().unwrap()
}

/// Builds a two-sheet workbook; only the first sheet should ever be read.
#[allow(dead_code)]
pub fn two_sheet_workbook(
    first_headers: &[&str],
    first_rows: &[&[Cell<'_>]],
    second_headers: &[&str],
    second_rows: &[&[Cell<'_>]],
) -> Vec<u8> {
    let mut wb = rust_xlsxwriter::Workbook::new();
    write_rows(wb.add_worksheet(), first_headers, first_rows);
    write_rows(wb.add_worksheet(), second_headers, second_rows);
    wb.save_to_buffer().unwrap()
}

fn write_rows(sheet: &mut rust_xlsxwriter::Worksheet, headers: &[&str], rows: &[&[Cell<'_>]]) {
    for (col, label) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *label).unwrap();
    }
    for (idx, row) in rows.iter().enumerate() {
        let r = idx as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(text) => {
                    sheet.write_string(r, col as u16, *text).unwrap();
                }
                Cell::Number(value) => {
                    sheet.write_number(r, col as u16, *value).unwrap();
                }
                Cell::Blank => {}
            }
        }
    }
}

/// The canonical Russian header row.
pub const HEADERS: [&str; 6] = [
    "Дата",
    "Тип",
    "Категория",
    "Подкатегория",
    "Сумма",
    "Описание",
];
