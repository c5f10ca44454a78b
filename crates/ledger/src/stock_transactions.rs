//! Stock ledger primitives.
//!
//! A `StockTransaction` is the materialized movement record a source
//! document projects into the ledger: at most one row per
//! (mill, document kind, document id), carrying the current net effect of
//! that document rather than a history of its edits.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

/// Direction of a movement.
///
/// Quantity is always stored non-negative; direction lives here alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockEntryType {
    /// Decreases on-hand stock.
    Debit,
    /// Increases on-hand stock.
    Credit,
}

impl StockEntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl TryFrom<&str> for StockEntryType {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            other => Err(LedgerError::Validation(format!(
                "invalid entry type: {other}"
            ))),
        }
    }
}

/// Source document types that may project a movement into the ledger.
///
/// Storage keeps the tag as a string, but the boundary only accepts these
/// variants, so a typo in a document service cannot orphan a ledger row.
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

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PurchaseDeal => "purchase_deal",
            Self::SaleDeal => "sale_deal",
            Self::RiceSale => "rice_sale",
            Self::PaddyInward => "paddy_inward",
            Self::GunnyInward => "gunny_inward",
            Self::FrkInward => "frk_inward",
            Self::LabourInward => "labour_inward",
            Self::RiceOutward => "rice_outward",
            Self::GunnyOutward => "gunny_outward",
            Self::KhandaOutward => "khanda_outward",
            Self::NakkhiOutward => "nakkhi_outward",
            Self::MillingProduction => "milling_production",
        }
    }
}

impl TryFrom<&str> for DocumentKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "purchase_deal" => Ok(Self::PurchaseDeal),
            "sale_deal" => Ok(Self::SaleDeal),
            "rice_sale" => Ok(Self::RiceSale),
            "paddy_inward" => Ok(Self::PaddyInward),
            "gunny_inward" => Ok(Self::GunnyInward),
            "frk_inward" => Ok(Self::FrkInward),
            "labour_inward" => Ok(Self::LabourInward),
            "rice_outward" => Ok(Self::RiceOutward),
            "gunny_outward" => Ok(Self::GunnyOutward),
            "khanda_outward" => Ok(Self::KhandaOutward),
            "nakkhi_outward" => Ok(Self::NakkhiOutward),
            "milling_production" => Ok(Self::MillingProduction),
            other => Err(LedgerError::Validation(format!(
                "unknown document kind: {other}"
            ))),
        }
    }
}

/// Write-side input emitted by a source document service at its own
/// create/update time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovementDescriptor {
    pub date: DateTime<Utc>,
    pub commodity: String,
    pub variety: Option<String>,
    pub entry_type: StockEntryType,
    pub action: String,
    /// Quintals. Must be > 0; services skip the ledger call entirely when a
    /// document carries no movement.
    pub quantity: Decimal,
    pub bags: i32,
    pub document_kind: DocumentKind,
    pub document_id: String,
    pub remarks: Option<String>,
}

impl MovementDescriptor {
    pub(crate) fn validate(&self) -> ResultLedger<()> {
        if self.commodity.trim().is_empty() {
            return Err(LedgerError::Validation("commodity is required".to_string()));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(LedgerError::Validation(
                "quantity must be > 0".to_string(),
            ));
        }
        if self.bags < 0 {
            return Err(LedgerError::Validation("bags must be >= 0".to_string()));
        }
        if self.document_id.trim().is_empty() {
            return Err(LedgerError::Validation(
                "document_id is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// One materialized movement record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockTransaction {
    pub id: Uuid,
    pub mill_id: String,
    pub date: DateTime<Utc>,
    pub commodity: String,
    pub variety: Option<String>,
    pub entry_type: StockEntryType,
    pub action: String,
    pub quantity: Decimal,
    pub bags: i32,
    pub document_kind: DocumentKind,
    pub document_id: String,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StockTransaction {
    pub fn new(mill_id: String, descriptor: MovementDescriptor) -> ResultLedger<Self> {
        descriptor.validate()?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            mill_id,
            date: descriptor.date,
            commodity: descriptor.commodity,
            variety: descriptor.variety,
            entry_type: descriptor.entry_type,
            action: descriptor.action,
            quantity: descriptor.quantity,
            bags: descriptor.bags,
            document_kind: descriptor.document_kind,
            document_id: descriptor.document_id,
            remarks: descriptor.remarks,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stock_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub mill_id: String,
    pub date: DateTimeUtc,
    pub commodity: String,
    pub variety: Option<String>,
    pub entry_type: String,
    pub action: String,
    #[sea_orm(column_type = "Decimal(Some((16, 3)))")]
    pub quantity: Decimal,
    pub bags: i32,
    pub document_kind: String,
    pub document_id: String,
    pub remarks: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&StockTransaction> for ActiveModel {
    fn from(tx: &StockTransaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            mill_id: ActiveValue::Set(tx.mill_id.clone()),
            date: ActiveValue::Set(tx.date),
            commodity: ActiveValue::Set(tx.commodity.clone()),
            variety: ActiveValue::Set(tx.variety.clone()),
            entry_type: ActiveValue::Set(tx.entry_type.as_str().to_string()),
            action: ActiveValue::Set(tx.action.clone()),
            quantity: ActiveValue::Set(tx.quantity),
            bags: ActiveValue::Set(tx.bags),
            document_kind: ActiveValue::Set(tx.document_kind.as_str().to_string()),
            document_id: ActiveValue::Set(tx.document_id.clone()),
            remarks: ActiveValue::Set(tx.remarks.clone()),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
        }
    }
}

impl TryFrom<Model> for StockTransaction {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::Validation("invalid transaction id".to_string()))?,
            mill_id: model.mill_id,
            date: model.date,
            commodity: model.commodity,
            variety: model.variety,
            entry_type: StockEntryType::try_from(model.entry_type.as_str())?,
            action: model.action,
            quantity: model.quantity,
            bags: model.bags,
            document_kind: DocumentKind::try_from(model.document_kind.as_str())?,
            document_id: model.document_id,
            remarks: model.remarks,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_document_kind_is_rejected() {
        let err = DocumentKind::try_from("grn").unwrap_err();
        assert_eq!(
            err,
            LedgerError::Validation("unknown document kind: grn".to_string())
        );
    }

    #[test]
    fn unknown_entry_type_is_rejected() {
        let err = StockEntryType::try_from("transfer").unwrap_err();
        assert_eq!(
            err,
            LedgerError::Validation("invalid entry type: transfer".to_string())
        );
    }
}
