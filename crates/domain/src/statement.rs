use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementRequest {
    pub card_code: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub include_closed_invoices: bool,
}

/// Customer account statement as produced by the inventory backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementDocument {
    pub card_code: String,
    pub card_name: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub opening_balance: f64,
    pub closing_balance: f64,
    #[serde(default)]
    pub lines: Vec<StatementLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementLine {
    pub date: NaiveDate,
    pub reference: String,
    #[serde(default)]
    pub description: String,
    pub debit: f64,
    pub credit: f64,
    pub balance: f64,
}
