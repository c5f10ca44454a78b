//! Stock report API endpoints
//!
//! Read-only consumers of the ledger aggregation engine. All writes happen
//! in the document services that own the source records.

use api_types::stock::{
    DocumentKind as ApiDocumentKind, StockEntryType as ApiEntryType, StockReportQuery,
    StockSummaryResponse, StockSummaryRow, StockTransactionView, StockTransactionsResponse,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::FixedOffset;

use crate::{ServerError, server::ServerState};
use ledger::DateRange;

fn map_entry_type(entry_type: ledger::StockEntryType) -> ApiEntryType {
    match entry_type {
        ledger::StockEntryType::Debit => ApiEntryType::Debit,
        ledger::StockEntryType::Credit => ApiEntryType::Credit,
    }
}

fn map_document_kind(kind: ledger::DocumentKind) -> ApiDocumentKind {
    match kind {
        ledger::DocumentKind::PurchaseDeal => ApiDocumentKind::PurchaseDeal,
        ledger::DocumentKind::SaleDeal => ApiDocumentKind::SaleDeal,
        ledger::DocumentKind::RiceSale => ApiDocumentKind::RiceSale,
        ledger::DocumentKind::PaddyInward => ApiDocumentKind::PaddyInward,
        ledger::DocumentKind::GunnyInward => ApiDocumentKind::GunnyInward,
        ledger::DocumentKind::FrkInward => ApiDocumentKind::FrkInward,
        ledger::DocumentKind::LabourInward => ApiDocumentKind::LabourInward,
        ledger::DocumentKind::RiceOutward => ApiDocumentKind::RiceOutward,
        ledger::DocumentKind::GunnyOutward => ApiDocumentKind::GunnyOutward,
        ledger::DocumentKind::KhandaOutward => ApiDocumentKind::KhandaOutward,
        ledger::DocumentKind::NakkhiOutward => ApiDocumentKind::NakkhiOutward,
        ledger::DocumentKind::MillingProduction => ApiDocumentKind::MillingProduction,
    }
}

fn parse_actions(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_range(query: &StockReportQuery) -> Result<Option<DateRange>, ServerError> {
    match (query.from, query.to) {
        (Some(from), Some(to)) => Ok(Some(DateRange::new(from, to)?)),
        (None, None) => Ok(None),
        _ => Err(ServerError::Generic(
            "from and to must be provided together".to_string(),
        )),
    }
}

pub async fn summary(
    Path(mill_id): Path<String>,
    State(state): State<ServerState>,
    Query(query): Query<StockReportQuery>,
) -> Result<Json<StockSummaryResponse>, ServerError> {
    let actions = parse_actions(query.actions.as_deref());
    let range = parse_range(&query)?;

    let action_refs: Vec<&str> = actions.iter().map(String::as_str).collect();
    let summaries = state
        .ledger
        .summarize_by_action(&mill_id, &action_refs, range)
        .await?;

    let summaries = summaries
        .into_iter()
        .map(|summary| StockSummaryRow {
            commodity: summary.commodity,
            variety: summary.variety,
            total_quantity: summary.total_quantity,
            total_bags: summary.total_bags,
            count: summary.count,
        })
        .collect();

    Ok(Json(StockSummaryResponse { summaries }))
}

pub async fn transactions(
    Path(mill_id): Path<String>,
    State(state): State<ServerState>,
    Query(query): Query<StockReportQuery>,
) -> Result<Json<StockTransactionsResponse>, ServerError> {
    let actions = parse_actions(query.actions.as_deref());
    let range = parse_range(&query)?;
    let limit = query.limit.unwrap_or(100);

    let action_refs: Vec<&str> = actions.iter().map(String::as_str).collect();
    let rows = state
        .ledger
        .list_transactions(&mill_id, &action_refs, range, limit)
        .await?;

    let utc = FixedOffset::east_opt(0)
        .ok_or_else(|| ServerError::Generic("invalid UTC offset".to_string()))?;
    let transactions = rows
        .into_iter()
        .map(|tx| StockTransactionView {
            id: tx.id,
            date: tx.date.with_timezone(&utc),
            commodity: tx.commodity,
            variety: tx.variety,
            entry_type: map_entry_type(tx.entry_type),
            action: tx.action,
            quantity: tx.quantity,
            bags: tx.bags,
            document_kind: map_document_kind(tx.document_kind),
            document_id: tx.document_id,
            remarks: tx.remarks,
        })
        .collect();

    Ok(Json(StockTransactionsResponse { transactions }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{ServerState, router};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{DateTime, Utc};
    use http_body_util::BodyExt;
    use ledger::{DocumentKind, Ledger, MovementDescriptor, StockEntryType};
    use migration::MigratorTrait;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn descriptor(
        date: &str,
        commodity: &str,
        variety: Option<&str>,
        entry_type: StockEntryType,
        action: &str,
        quantity: &str,
        bags: i32,
        document_kind: DocumentKind,
        document_id: &str,
    ) -> MovementDescriptor {
        MovementDescriptor {
            date: date.parse::<DateTime<Utc>>().unwrap(),
            commodity: commodity.to_string(),
            variety: variety.map(str::to_string),
            entry_type,
            action: action.to_string(),
            quantity: quantity.parse::<Decimal>().unwrap(),
            bags,
            document_kind,
            document_id: document_id.to_string(),
            remarks: None,
        }
    }

    async fn seeded_state() -> ServerState {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let ledger = Ledger::builder().database(db).build();

        ledger
            .record_transaction(
                "mill-1",
                &descriptor(
                    "2025-01-10T08:30:00Z",
                    "Paddy",
                    None,
                    StockEntryType::Credit,
                    "Inward",
                    "12.5",
                    25,
                    DocumentKind::GunnyInward,
                    "gi-1",
                ),
            )
            .await
            .unwrap();
        ledger
            .record_transaction(
                "mill-1",
                &descriptor(
                    "2025-01-12T10:00:00Z",
                    "Rice",
                    Some("Basmati"),
                    StockEntryType::Credit,
                    "Inward",
                    "4.0",
                    8,
                    DocumentKind::MillingProduction,
                    "mp-1",
                ),
            )
            .await
            .unwrap();
        ledger
            .record_transaction(
                "mill-1",
                &descriptor(
                    "2025-01-15T09:00:00Z",
                    "Rice",
                    Some("Basmati"),
                    StockEntryType::Debit,
                    "Sale",
                    "2.0",
                    4,
                    DocumentKind::RiceSale,
                    "rs-1",
                ),
            )
            .await
            .unwrap();

        ServerState {
            ledger: Arc::new(ledger),
        }
    }

    async fn get_json(state: ServerState, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn summary_groups_by_commodity_and_variety() {
        let state = seeded_state().await;
        let (status, body) = get_json(
            state,
            "/mills/mill-1/stock/summary?actions=Inward&from=2025-01-01&to=2025-01-31",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let summaries = body["summaries"].as_array().unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0]["commodity"], "Paddy");
        assert!(summaries[0]["variety"].is_null());
        assert_eq!(summaries[0]["total_quantity"], "12.5");
        assert_eq!(summaries[0]["total_bags"], 25);
        assert_eq!(summaries[0]["count"], 1);
        assert_eq!(summaries[1]["commodity"], "Rice");
        assert_eq!(summaries[1]["variety"], "Basmati");
    }

    #[tokio::test]
    async fn transactions_listing_is_newest_first() {
        let state = seeded_state().await;
        let (status, body) = get_json(
            state,
            "/mills/mill-1/stock/transactions?from=2025-01-01&to=2025-01-31&limit=2",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let transactions = body["transactions"].as_array().unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0]["document_id"], "rs-1");
        assert_eq!(transactions[0]["entry_type"], "debit");
        assert_eq!(transactions[1]["document_id"], "mp-1");
    }

    #[tokio::test]
    async fn other_mills_are_not_visible() {
        let state = seeded_state().await;
        let (status, body) = get_json(state, "/mills/mill-2/stock/summary").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["summaries"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn half_open_range_is_rejected() {
        let state = seeded_state().await;
        let (status, body) = get_json(
            state,
            "/mills/mill-1/stock/summary?from=2025-01-01",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "from and to must be provided together");
    }

    #[tokio::test]
    async fn inverted_range_is_unprocessable() {
        let state = seeded_state().await;
        let (status, _body) = get_json(
            state,
            "/mills/mill-1/stock/summary?from=2025-02-01&to=2025-01-01",
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
