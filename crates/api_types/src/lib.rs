use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod stock {
    use super::*;

    /// Direction of a movement, as exposed on the wire.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum StockEntryType {
        Debit,
        Credit,
    }

    /// Source document types, mirrored from the ledger.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DocumentKind {
        PurchaseDeal,
        SaleDeal,
        RiceSale,
        PaddyInward,
        GunnyInward,
        FrkInward,
        LabourInward,
        RiceOutward,
        GunnyOutward,
        KhandaOutward,
        NakkhiOutward,
        MillingProduction,
    }

    /// Query string for the stock report endpoints.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockReportQuery {
        /// Comma-separated OR-set of action labels ("Inward,Purchase").
        ///
        /// Absent matches every action.
        pub actions: Option<String>,
        /// Inclusive start day (ISO date). Must be paired with `to`.
        pub from: Option<NaiveDate>,
        /// Inclusive end day (ISO date). Must be paired with `from`.
        pub to: Option<NaiveDate>,
        /// Row cap for the transactions listing. Ignored by the summary.
        pub limit: Option<u64>,
    }

    /// One (commodity, variety) group of gross movement.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockSummaryRow {
        pub commodity: String,
        pub variety: Option<String>,
        pub total_quantity: Decimal,
        pub total_bags: i64,
        pub count: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockSummaryResponse {
        pub summaries: Vec<StockSummaryRow>,
    }

    /// One raw ledger row.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockTransactionView {
        pub id: Uuid,
        /// RFC3339 timestamp, including timezone offset.
        pub date: DateTime<FixedOffset>,
        pub commodity: String,
        pub variety: Option<String>,
        pub entry_type: StockEntryType,
        pub action: String,
        pub quantity: Decimal,
        pub bags: i32,
        pub document_kind: DocumentKind,
        pub document_id: String,
        pub remarks: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockTransactionsResponse {
        pub transactions: Vec<StockTransactionView>,
    }
}
