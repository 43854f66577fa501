//! CSV bank-export importer.
//!
//! Targets semicolon-delimited exports as produced by French retail banks:
//! a header row naming date, label, and amount columns, comma decimals.
//! Rows missing a date or a parsable amount are dropped, not errors.

use crate::domain::Decimal;
use serde::Serialize;

/// One transaction recovered from a CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvTransaction {
    pub date: String,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
}

const DEFAULT_CATEGORY: &str = "Imported";
const DEFAULT_DESCRIPTION: &str = "Imported transaction";

/// Parse CSV content into candidate transactions.
///
/// # Errors
/// Returns an error only when the content has no readable header row;
/// individual malformed rows are skipped.
pub fn parse_bank_csv(content: &str) -> Result<Vec<CsvTransaction>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_lowercase())
        .collect();

    let date_col = headers.iter().position(|h| h.contains("date"));
    let description_col = headers.iter().position(|h| {
        h.contains("libelle") || h.contains("description") || h.contains("motif")
    });
    let amount_col = headers
        .iter()
        .position(|h| h.contains("montant") || h.contains("debit") || h.contains("credit"));

    let mut transactions = Vec::new();
    for record in reader.records().flatten() {
        let date = date_col.and_then(|i| record.get(i)).unwrap_or("");
        let amount_raw = amount_col.and_then(|i| record.get(i)).unwrap_or("");
        if date.is_empty() || amount_raw.is_empty() {
            continue;
        }

        let Some(amount) = parse_amount(amount_raw) else {
            continue;
        };

        let description = description_col
            .and_then(|i| record.get(i))
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION);

        transactions.push(CsvTransaction {
            date: date.to_string(),
            description: description.to_string(),
            amount,
            category: DEFAULT_CATEGORY.to_string(),
        });
    }

    Ok(transactions)
}

/// Parse a bank-formatted amount: comma decimals, currency symbols and
/// thousands separators stripped.
fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    Decimal::from_str_canonical(&cleaned).ok()
}
