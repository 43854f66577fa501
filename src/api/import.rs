use axum::extract::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::ingest::{parse_bank_csv, parse_statement, CsvTransaction, ParsedTransaction};

#[derive(Debug, Deserialize)]
pub struct StatementImportRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementImportResponse {
    pub transactions: Vec<ParsedTransaction>,
    pub count: usize,
}

/// Extract candidate transactions from raw statement text (OCR output,
/// pasted PDFs). Parsing is best-effort; lines that yield nothing are
/// silently dropped.
pub async fn import_statement(
    Json(req): Json<StatementImportRequest>,
) -> Result<Json<StatementImportResponse>, AppError> {
    let transactions = parse_statement(&req.text);
    let count = transactions.len();
    Ok(Json(StatementImportResponse {
        transactions,
        count,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CsvImportRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvImportResponse {
    pub transactions: Vec<CsvTransaction>,
    pub count: usize,
}

pub async fn import_csv(
    Json(req): Json<CsvImportRequest>,
) -> Result<Json<CsvImportResponse>, AppError> {
    let transactions = parse_bank_csv(&req.content)
        .map_err(|e| AppError::BadRequest(format!("Unreadable CSV: {}", e)))?;
    let count = transactions.len();
    Ok(Json(CsvImportResponse {
        transactions,
        count,
    }))
}
