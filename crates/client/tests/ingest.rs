use api_types::transaction::TransactionKind;
use chrono::{NaiveDate, Utc};
use client::{ClientError, ParseWarning, SheetSchema};

use crate::common::{Cell, HEADERS, workbook};

mod common;

#[test]
fn template_round_trip_yields_the_two_example_rows() {
    let schema = SheetSchema::default();
    let bytes = schema.template_workbook().unwrap();
    let sheet = schema.parse_bytes(&bytes).unwrap();

    assert!(sheet.warnings.is_empty());
    assert_eq!(sheet.records.len(), 2);

    let income = &sheet.records[0];
    assert_eq!(income.kind, TransactionKind::Income);
    assert_eq!(income.category, "Зарплата");
    assert_eq!(income.subcategory.as_deref(), Some("Основная"));
    assert_eq!(income.amount_minor, 100_000_00);
    assert_eq!(
        income.date.date_naive(),
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    );

    let expense = &sheet.records[1];
    assert_eq!(expense.kind, TransactionKind::Expense);
    assert_eq!(expense.category, "Еда");
    assert_eq!(expense.description.as_deref(), Some("Покупка продуктов"));
    assert_eq!(expense.amount_minor, 5_000_00);
    assert_eq!(
        expense.date.date_naive(),
        NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()
    );
}

#[test]
fn unreadable_date_defaults_to_today_and_warns() {
    let bytes = workbook(
        &HEADERS,
        &[
            &[
                Cell::Text("2024-02-01"),
                Cell::Text("Расход"),
                Cell::Text("Еда"),
                Cell::Blank,
                Cell::Number(100.0),
                Cell::Blank,
            ],
            &[
                Cell::Text("not-a-date"),
                Cell::Text("Расход"),
                Cell::Text("Еда"),
                Cell::Blank,
                Cell::Number(200.0),
                Cell::Blank,
            ],
        ],
    );

    let sheet = SheetSchema::default().parse_bytes(&bytes).unwrap();
    assert_eq!(sheet.records.len(), 2);
    assert_eq!(
        sheet.records[0].date.date_naive(),
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    );
    assert_eq!(sheet.records[1].date.date_naive(), Utc::now().date_naive());
    assert_eq!(sheet.warnings, vec![ParseWarning::BadDate { row: 3 }]);
}

#[test]
fn serial_date_cells_are_converted() {
    let bytes = workbook(
        &HEADERS,
        &[&[
            Cell::Number(45_306.0),
            Cell::Text("Доход"),
            Cell::Text("Зарплата"),
            Cell::Blank,
            Cell::Number(1_000.0),
            Cell::Blank,
        ]],
    );

    let sheet = SheetSchema::default().parse_bytes(&bytes).unwrap();
    assert_eq!(
        sheet.records[0].date.date_naive(),
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    );
}

#[test]
fn amounts_are_always_magnitudes() {
    let bytes = workbook(
        &HEADERS,
        &[
            &[
                Cell::Text("2024-03-01"),
                Cell::Text("Расход"),
                Cell::Text("Еда"),
                Cell::Blank,
                Cell::Number(-750.25),
                Cell::Blank,
            ],
            &[
                Cell::Text("2024-03-02"),
                Cell::Text("Доход"),
                Cell::Text("Зарплата"),
                Cell::Blank,
                Cell::Number(500.0),
                Cell::Blank,
            ],
        ],
    );

    let sheet = SheetSchema::default().parse_bytes(&bytes).unwrap();
    assert!(sheet.records.iter().all(|r| r.amount_minor >= 0));
    assert_eq!(sheet.records[0].amount_minor, 750_25);
    assert_eq!(sheet.records[1].amount_minor, 500_00);
}

#[test]
fn non_numeric_amount_becomes_zero_with_warning() {
    let bytes = workbook(
        &HEADERS,
        &[&[
            Cell::Text("2024-03-01"),
            Cell::Text("Расход"),
            Cell::Text("Еда"),
            Cell::Blank,
            Cell::Text("много"),
            Cell::Blank,
        ]],
    );

    let sheet = SheetSchema::default().parse_bytes(&bytes).unwrap();
    assert_eq!(sheet.records[0].amount_minor, 0);
    assert_eq!(sheet.warnings, vec![ParseWarning::BadAmount { row: 2 }]);
}

#[test]
fn blank_category_gets_the_placeholder() {
    let bytes = workbook(
        &HEADERS,
        &[&[
            Cell::Text("2024-03-01"),
            Cell::Text("Расход"),
            Cell::Blank,
            Cell::Blank,
            Cell::Number(10.0),
            Cell::Blank,
        ]],
    );

    let sheet = SheetSchema::default().parse_bytes(&bytes).unwrap();
    assert_eq!(sheet.records[0].category, "Не указана");
    assert_eq!(sheet.records[0].subcategory, None);
}

#[test]
fn missing_required_column_is_a_parse_error() {
    let bytes = workbook(
        &["Дата", "Тип", "Категория", "Подкатегория", "Описание"],
        &[],
    );

    let err = SheetSchema::default().parse_bytes(&bytes).unwrap_err();
    match err {
        ClientError::Parse(message) => assert!(message.contains("Сумма")),
        other => panic!("expected Parse, got {other:?}"),
    }
}

#[test]
fn unknown_extra_columns_are_ignored() {
    let bytes = workbook(
        &[
            "Комментарий",
            "Дата",
            "Тип",
            "Категория",
            "Подкатегория",
            "Сумма",
            "Описание",
        ],
        &[&[
            Cell::Text("черновик"),
            Cell::Text("2024-03-01"),
            Cell::Text("Доход"),
            Cell::Text("Зарплата"),
            Cell::Blank,
            Cell::Number(42.0),
            Cell::Blank,
        ]],
    );

    let sheet = SheetSchema::default().parse_bytes(&bytes).unwrap();
    assert_eq!(sheet.records.len(), 1);
    assert_eq!(sheet.records[0].kind, TransactionKind::Income);
    assert_eq!(sheet.records[0].amount_minor, 42_00);
}

#[test]
fn only_the_first_sheet_is_read() {
    let bytes = common::two_sheet_workbook(
        &HEADERS,
        &[&[
            Cell::Text("2024-03-01"),
            Cell::Text("Доход"),
            Cell::Text("Зарплата"),
            Cell::Blank,
            Cell::Number(1.0),
            Cell::Blank,
        ]],
        &HEADERS,
        &[
            &[
                Cell::Text("2024-03-02"),
                Cell::Text("Расход"),
                Cell::Text("Еда"),
                Cell::Blank,
                Cell::Number(2.0),
                Cell::Blank,
            ],
            &[
                Cell::Text("2024-03-03"),
                Cell::Text("Расход"),
                Cell::Text("Еда"),
                Cell::Blank,
                Cell::Number(3.0),
                Cell::Blank,
            ],
        ],
    );

    let sheet = SheetSchema::default().parse_bytes(&bytes).unwrap();
    assert_eq!(sheet.records.len(), 1);
    assert_eq!(sheet.records[0].amount_minor, 1_00);
}

#[test]
fn garbage_bytes_are_a_parse_error() {
    let err = SheetSchema::default()
        .parse_bytes(b"definitely not a workbook")
        .unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)));
}
