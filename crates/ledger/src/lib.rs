//! Commodity stock ledger.
//!
//! The ledger is a derived record of on-hand inventory movement. Each source
//! document (a sale, a gate entry, a production run) projects at most one
//! row into it, keyed by (mill, document kind, document id); the row always
//! reflects the current net effect of that document. Summaries are computed
//! on read and never maintained as running totals, so concurrent writes for
//! different documents need no shared state.

use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait, prelude::*,
};
use uuid::Uuid;

pub use error::LedgerError;
pub use reports::{DateRange, StockSummary};
pub use stock_transactions::{
    DocumentKind, MovementDescriptor, StockEntryType, StockTransaction,
};

mod error;
mod reports;
mod stock_transactions;

type ResultLedger<T> = Result<T, LedgerError>;

/// Handle to the ledger store.
///
/// Each document service receives its own clone as an explicit capability;
/// nothing imports a shared global. All write operations exist in two
/// shapes: a connection-owning method, and a `_with` variant running on a
/// caller-supplied connection so a service can span its own record write
/// and the ledger write with one storage transaction.
#[derive(Clone, Debug)]
pub struct Ledger {
    database: DatabaseConnection,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    /// Insert the ledger row for a freshly created source document.
    ///
    /// Callers invoke this exactly once per create, and skip the call when
    /// the document carries no movement. The writer itself does not guard
    /// against a duplicate call for the same document.
    pub async fn record_transaction(
        &self,
        mill_id: &str,
        descriptor: &MovementDescriptor,
    ) -> ResultLedger<Uuid> {
        self.record_transaction_with(&self.database, mill_id, descriptor)
            .await
    }

    /// [`record_transaction`] on a caller-supplied connection.
    ///
    /// [`record_transaction`]: Self::record_transaction
    pub async fn record_transaction_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        mill_id: &str,
        descriptor: &MovementDescriptor,
    ) -> ResultLedger<Uuid> {
        let tx = StockTransaction::new(mill_id.to_string(), descriptor.clone())?;
        let id = tx.id;
        stock_transactions::ActiveModel::from(&tx).insert(conn).await?;
        Ok(id)
    }

    /// Make the ledger row for a source document match `descriptor` exactly.
    ///
    /// Locates the row by (mill, document kind, document id) and overwrites
    /// every movement field; no stale field survives. If no row exists yet
    /// (the original creation had nothing to record), one is inserted.
    /// Calling twice with the same descriptor leaves the same single row.
    pub async fn update_transaction(
        &self,
        mill_id: &str,
        descriptor: &MovementDescriptor,
    ) -> ResultLedger<Uuid> {
        let db_tx = self.database.begin().await?;
        let id = self
            .update_transaction_with(&db_tx, mill_id, descriptor)
            .await?;
        db_tx.commit().await?;
        Ok(id)
    }

    /// [`update_transaction`] on a caller-supplied connection.
    ///
    /// [`update_transaction`]: Self::update_transaction
    pub async fn update_transaction_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        mill_id: &str,
        descriptor: &MovementDescriptor,
    ) -> ResultLedger<Uuid> {
        descriptor.validate()?;

        let existing = stock_transactions::Entity::find()
            .filter(stock_transactions::Column::MillId.eq(mill_id))
            .filter(
                stock_transactions::Column::DocumentKind.eq(descriptor.document_kind.as_str()),
            )
            .filter(stock_transactions::Column::DocumentId.eq(descriptor.document_id.as_str()))
            .one(conn)
            .await?;

        let Some(model) = existing else {
            return self
                .record_transaction_with(conn, mill_id, descriptor)
                .await;
        };

        let id = Uuid::parse_str(&model.id)
            .map_err(|_| LedgerError::Validation("invalid transaction id".to_string()))?;
        let row = stock_transactions::ActiveModel {
            id: ActiveValue::Set(model.id),
            date: ActiveValue::Set(descriptor.date),
            commodity: ActiveValue::Set(descriptor.commodity.clone()),
            variety: ActiveValue::Set(descriptor.variety.clone()),
            entry_type: ActiveValue::Set(descriptor.entry_type.as_str().to_string()),
            action: ActiveValue::Set(descriptor.action.clone()),
            quantity: ActiveValue::Set(descriptor.quantity),
            bags: ActiveValue::Set(descriptor.bags),
            remarks: ActiveValue::Set(descriptor.remarks.clone()),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };
        row.update(conn).await?;
        Ok(id)
    }

    /// Remove every ledger row tied to a source document.
    ///
    /// Idempotent: deleting a non-existent reference removes zero rows and
    /// is not an error. Returns the number of rows removed.
    pub async fn delete_transactions_by_ref(
        &self,
        mill_id: &str,
        document_kind: DocumentKind,
        document_id: &str,
    ) -> ResultLedger<u64> {
        self.delete_transactions_by_ref_with(&self.database, mill_id, document_kind, document_id)
            .await
    }

    /// [`delete_transactions_by_ref`] on a caller-supplied connection.
    ///
    /// [`delete_transactions_by_ref`]: Self::delete_transactions_by_ref
    pub async fn delete_transactions_by_ref_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        mill_id: &str,
        document_kind: DocumentKind,
        document_id: &str,
    ) -> ResultLedger<u64> {
        let res = stock_transactions::Entity::delete_many()
            .filter(stock_transactions::Column::MillId.eq(mill_id))
            .filter(stock_transactions::Column::DocumentKind.eq(document_kind.as_str()))
            .filter(stock_transactions::Column::DocumentId.eq(document_id))
            .exec(conn)
            .await?;
        Ok(res.rows_affected)
    }

    /// Return the current ledger row for a source document, if any.
    pub async fn transaction_by_ref(
        &self,
        mill_id: &str,
        document_kind: DocumentKind,
        document_id: &str,
    ) -> ResultLedger<Option<StockTransaction>> {
        let model = stock_transactions::Entity::find()
            .filter(stock_transactions::Column::MillId.eq(mill_id))
            .filter(stock_transactions::Column::DocumentKind.eq(document_kind.as_str()))
            .filter(stock_transactions::Column::DocumentId.eq(document_id))
            .one(&self.database)
            .await?;
        model.map(StockTransaction::try_from).transpose()
    }

    /// Gross movement summed per (commodity, variety).
    ///
    /// `actions` is an OR-set of business-event labels; empty matches all.
    /// A missing variety forms its own group. Output is ordered by
    /// commodity, then variety. There is no DEBIT/CREDIT netting: an
    /// on-hand balance is composed by summarizing CREDIT- and
    /// DEBIT-classified actions separately and subtracting.
    pub async fn summarize_by_action(
        &self,
        mill_id: &str,
        actions: &[&str],
        date_range: Option<DateRange>,
    ) -> ResultLedger<Vec<StockSummary>> {
        let rows = movement_query(mill_id, actions, date_range)
            .all(&self.database)
            .await?;

        let mut groups: BTreeMap<(String, Option<String>), StockSummary> = BTreeMap::new();
        for row in rows {
            let entry = groups
                .entry((row.commodity.clone(), row.variety.clone()))
                .or_insert_with(|| StockSummary {
                    commodity: row.commodity,
                    variety: row.variety,
                    total_quantity: Decimal::ZERO,
                    total_bags: 0,
                    count: 0,
                });
            entry.total_quantity += row.quantity;
            entry.total_bags += i64::from(row.bags);
            entry.count += 1;
        }

        Ok(groups.into_values().collect())
    }

    /// Raw chronological listing, newest first, capped at `limit` rows.
    ///
    /// Grouping rows by calendar day for display is the caller's concern.
    pub async fn list_transactions(
        &self,
        mill_id: &str,
        actions: &[&str],
        date_range: Option<DateRange>,
        limit: u64,
    ) -> ResultLedger<Vec<StockTransaction>> {
        let models = movement_query(mill_id, actions, date_range)
            .order_by_desc(stock_transactions::Column::Date)
            .limit(limit)
            .all(&self.database)
            .await?;

        models
            .into_iter()
            .map(StockTransaction::try_from)
            .collect()
    }
}

fn movement_query(
    mill_id: &str,
    actions: &[&str],
    date_range: Option<DateRange>,
) -> Select<stock_transactions::Entity> {
    let mut query =
        stock_transactions::Entity::find().filter(stock_transactions::Column::MillId.eq(mill_id));

    if !actions.is_empty() {
        query = query.filter(stock_transactions::Column::Action.is_in(actions.iter().copied()));
    }
    if let Some(range) = date_range {
        let (lower, upper) = range.bounds_utc();
        query = query
            .filter(stock_transactions::Column::Date.gte(lower))
            .filter(stock_transactions::Column::Date.lt(upper));
    }

    query
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    database: DatabaseConnection,
}

impl LedgerBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> LedgerBuilder {
        self.database = db;
        self
    }

    /// Construct `Ledger`
    pub fn build(self) -> Ledger {
        Ledger {
            database: self.database,
        }
    }
}
