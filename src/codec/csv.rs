//! CSV encoding of the expense list
//!
//! Decoding is header driven: columns are found by case-insensitive
//! substring match on the header names, so reordered or renamed columns
//! still import. Rows with an unusable amount are skipped and reported,
//! never fatal. Defaults fill in only for columns the header lacks; an empty
//! cell stays empty.

use chrono::{Local, NaiveDate};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::warn;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{Expense, ExpenseId, Money, Person, DEFAULT_CATEGORY, DEFAULT_PAYMENT_MODE};

/// Header row written by [`encode`]
pub const CSV_HEADER: &str = "Date,Person,Category,Amount,Payment Mode,Description";

/// Records decoded from CSV text plus the rows that were skipped
#[derive(Debug, Default)]
pub struct CsvImport {
    pub expenses: Vec<Expense>,
    /// One `ValidationSkip` per rejected row
    pub skipped: Vec<TrackerError>,
}

/// Serialize records as CSV text
pub fn encode(records: &[Expense]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + records.len() * 48);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for expense in records {
        let date = expense.date_text().unwrap_or_default();
        let person = expense
            .person
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_default();

        let row = [
            escape_csv(&date),
            escape_csv(&person),
            escape_csv(&expense.category),
            expense.amount.to_string(),
            escape_csv(expense.payment_mode.as_deref().unwrap_or_default()),
            escape_csv(expense.memo()),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Column positions resolved from a header record
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    date: Option<usize>,
    person: Option<usize>,
    amount: Option<usize>,
    category: Option<usize>,
    mode: Option<usize>,
    note: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &StringRecord) -> Self {
        let names: Vec<String> = header.iter().map(|h| h.to_lowercase()).collect();
        let find = |needles: &[&str]| {
            names
                .iter()
                .position(|name| needles.iter().any(|n| name.contains(n)))
        };

        Self {
            date: find(&["date"]),
            person: find(&["person"]),
            amount: find(&["amount"]),
            category: find(&["category"]),
            mode: find(&["mode", "payment"]),
            note: find(&["description", "note"]),
        }
    }
}

/// Parse CSV text into expense records
///
/// The first non-blank record is the header. Fewer than two non-blank
/// records is a `Parse` error.
pub fn decode(text: &str) -> TrackerResult<CsvImport> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| TrackerError::Parse(format!("Invalid CSV: {}", e)))?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        records.push(record);
    }

    if records.len() < 2 {
        return Err(TrackerError::Parse(
            "CSV file is empty or has no data rows".into()
        ));
    }

    let columns = ColumnMap::from_header(&records[0]);
    let today = Local::now().date_naive();
    let mut import = CsvImport::default();

    for (index, record) in records.iter().enumerate().skip(1) {
        // Header is row 1
        let row = index + 1;
        match parse_row(record, &columns, today) {
            Ok(expense) => import.expenses.push(expense),
            Err(reason) => {
                warn!(row, reason = %reason, "Skipping CSV row");
                import.skipped.push(TrackerError::ValidationSkip { row, reason });
            }
        }
    }

    Ok(import)
}

fn parse_row(
    record: &StringRecord,
    columns: &ColumnMap,
    today: NaiveDate,
) -> Result<Expense, String> {
    // None when the header has no such column; short rows read as empty
    let cell = |column: Option<usize>| column.map(|index| record.get(index).unwrap_or_default());

    let amount = match cell(columns.amount) {
        None => Money::zero(),
        Some(raw) => Money::parse(raw).map_err(|_| format!("invalid amount '{}'", raw))?,
    };

    let category = cell(columns.category).unwrap_or(DEFAULT_CATEGORY);
    let mut expense = Expense::new(amount, category, today);

    if let Some(raw) = cell(columns.date) {
        expense = expense.with_date_text(raw);
    }
    expense.person = match cell(columns.person) {
        None => Some(Person::Person1),
        Some("") => None,
        Some(raw) => Some(Person::from(raw.to_string())),
    };
    expense.payment_mode = match cell(columns.mode) {
        None => Some(DEFAULT_PAYMENT_MODE.to_string()),
        Some("") => None,
        Some(raw) => Some(raw.to_string()),
    };
    expense.note = Some(cell(columns.note).unwrap_or_default().to_string());

    Ok(expense.with_id(ExpenseId::generate()))
}

/// Combine imported records with the current ones
///
/// `replace` discards `existing`; otherwise the new records are appended
/// without de-duplication.
pub fn merge(new: Vec<Expense>, existing: Vec<Expense>, replace: bool) -> Vec<Expense> {
    if replace {
        return new;
    }
    let mut merged = existing;
    merged.extend(new);
    merged
}

/// Escape a CSV field
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn shared(cents: i64, category: &str, person: Person, note: &str) -> Expense {
        Expense::shared(
            Money::from_cents(cents),
            category,
            date(2024, 4, 2),
            person,
            "Card",
            note,
        )
    }

    #[test]
    fn test_encode_header_and_rows() {
        let csv = encode(&[shared(1250, "Food", Person::Person2, "lunch")]);
        assert_eq!(
            csv,
            "Date,Person,Category,Amount,Payment Mode,Description\n\
             2024-04-02,Person2,Food,12.50,Card,lunch\n"
        );
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&[]), format!("{}\n", CSV_HEADER));
    }

    #[test]
    fn test_encode_escapes_quotes_and_commas() {
        let csv = encode(&[shared(100, "Food", Person::Both, r#"Coffee, "large""#)]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.ends_with(r#","Coffee, ""large""""#));
    }

    #[test]
    fn test_round_trip_preserves_values() {
        let records = vec![
            shared(1250, "Food", Person::Person1, r#"Coffee, "large""#),
            shared(99900, "Utilities", Person::Other("Sam".into()), "power\nbill"),
            shared(5, "Other", Person::Both, ""),
            Expense::new(Money::from_cents(3000), "Transport", date(2024, 1, 5))
                .with_description("Bus pass"),
        ];

        let decoded = decode(&encode(&records)).unwrap();
        assert!(decoded.skipped.is_empty());
        assert_eq!(decoded.expenses.len(), records.len());

        for (got, want) in decoded.expenses.iter().zip(&records) {
            assert_eq!(got.amount, want.amount);
            assert_eq!(got.category, want.category);
            assert_eq!(got.date, want.date);
            assert_eq!(got.person, want.person);
            assert_eq!(got.payment_mode, want.payment_mode);
            assert_eq!(got.memo(), want.memo());
            assert!(got.id.is_some());
        }
    }

    #[test]
    fn test_non_numeric_amount_is_skipped() {
        let text = "Date,Person,Category,Amount,Payment Mode,Description\n\
                    2024-01-01,Person1,Food,abc,Cash,x\n";
        let decoded = decode(text).unwrap();

        assert!(decoded.expenses.is_empty());
        assert_eq!(decoded.skipped.len(), 1);
        assert!(matches!(
            decoded.skipped[0],
            TrackerError::ValidationSkip { row: 2, .. }
        ));
    }

    #[test]
    fn test_bad_rows_do_not_abort_decode() {
        let text = "Date,Amount\n2024-01-01,10\nnot-a-date,5\n2024-01-03,\n2024-01-04,7.25\n";
        let decoded = decode(text).unwrap();

        let amounts: Vec<i64> = decoded.expenses.iter().map(|e| e.amount.cents()).collect();
        assert_eq!(amounts, vec![1000, 500, 725]);
        assert_eq!(decoded.skipped.len(), 1);
        assert!(matches!(
            decoded.skipped[0],
            TrackerError::ValidationSkip { row: 4, .. }
        ));
    }

    #[test]
    fn test_unreadable_date_keeps_the_row() {
        let text = "Date,Person,Category,Amount,Payment Mode,Description\n\
                    15-03-2024,Person1,Food,10,Cash,x\n";
        let decoded = decode(text).unwrap();

        assert!(decoded.skipped.is_empty());
        let expense = &decoded.expenses[0];
        assert!(expense.date.is_none());
        assert_eq!(expense.date_text().as_deref(), Some("15-03-2024"));
        assert_eq!(expense.amount.cents(), 1000);

        // And it is written back out as it came in
        let row = encode(&decoded.expenses);
        assert!(row.lines().nth(1).unwrap().starts_with("15-03-2024,"));
    }

    #[test]
    fn test_empty_cells_stay_empty() {
        let text = "Date,Person,Category,Amount,Payment Mode,Description\n,,,4,,\n";
        let decoded = decode(text).unwrap();
        let expense = &decoded.expenses[0];

        assert!(expense.date.is_none());
        assert!(expense.person.is_none());
        assert!(expense.payment_mode.is_none());
        assert_eq!(expense.category, "");
        assert_eq!(expense.memo(), "");
    }

    #[test]
    fn test_header_resolution_is_order_independent() {
        let text = "notes,AMOUNT (INR),Paid By Person,Spend Category,Payment,Txn Date\n\
                    \"taxi, airport\",450,Person2,Transport,UPI,03/15/2024\n";
        let decoded = decode(text).unwrap();
        let expense = &decoded.expenses[0];

        assert_eq!(expense.memo(), "taxi, airport");
        assert_eq!(expense.amount.cents(), 45000);
        assert_eq!(expense.person, Some(Person::Person2));
        assert_eq!(expense.category, "Transport");
        assert_eq!(expense.payment_mode.as_deref(), Some("UPI"));
        assert_eq!(expense.date, Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_missing_columns_use_defaults() {
        let decoded = decode("Amount\n12\n").unwrap();
        let expense = &decoded.expenses[0];

        assert_eq!(expense.date, Some(Local::now().date_naive()));
        assert_eq!(expense.person, Some(Person::Person1));
        assert_eq!(expense.category, DEFAULT_CATEGORY);
        assert_eq!(expense.payment_mode.as_deref(), Some(DEFAULT_PAYMENT_MODE));
        assert_eq!(expense.memo(), "");

        let decoded = decode("Date,Category\n2024-01-01,Food\n").unwrap();
        assert!(decoded.expenses[0].amount.is_zero());
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let text = "\n\nDate,Amount\n\n2024-01-01,1\n   \n";
        let decoded = decode(text).unwrap();
        assert_eq!(decoded.expenses.len(), 1);
    }

    #[test]
    fn test_too_few_lines_is_parse_error() {
        assert!(decode("").unwrap_err().is_parse());
        assert!(decode("Date,Amount\n").unwrap_err().is_parse());
    }

    #[test]
    fn test_ids_are_fresh() {
        let decoded = decode("Amount\n1\n2\n").unwrap();
        assert_ne!(decoded.expenses[0].id, decoded.expenses[1].id);
    }

    #[test]
    fn test_merge() {
        let existing = vec![shared(1, "A", Person::Person1, "")];
        let new = vec![shared(2, "B", Person::Person1, "")];

        let appended = merge(new.clone(), existing.clone(), false);
        let cents: Vec<i64> = appended.iter().map(|e| e.amount.cents()).collect();
        assert_eq!(cents, vec![1, 2]);

        let replaced = merge(new, existing, true);
        assert_eq!(replaced.len(), 1);
        assert_eq!(replaced[0].category, "B");
    }
}
