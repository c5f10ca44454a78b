use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum StockTransactions {
    Table,
    Id,
    MillId,
    Date,
    Commodity,
    Variety,
    EntryType,
    Action,
    Quantity,
    Bags,
    DocumentKind,
    DocumentId,
    Remarks,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StockTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StockTransactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StockTransactions::MillId).string().not_null())
                    .col(
                        ColumnDef::new(StockTransactions::Date)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StockTransactions::Commodity)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StockTransactions::Variety).string())
                    .col(
                        ColumnDef::new(StockTransactions::EntryType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StockTransactions::Action).string().not_null())
                    .col(
                        ColumnDef::new(StockTransactions::Quantity)
                            .decimal_len(16, 3)
                            .not_null(),
                    )
                    .col(ColumnDef::new(StockTransactions::Bags).integer().not_null())
                    .col(
                        ColumnDef::new(StockTransactions::DocumentKind)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StockTransactions::DocumentId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StockTransactions::Remarks).string())
                    .col(
                        ColumnDef::new(StockTransactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StockTransactions::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-stock_transactions-mill_id-date")
                    .table(StockTransactions::Table)
                    .col(StockTransactions::MillId)
                    .col(StockTransactions::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-stock_transactions-mill_id-document")
                    .table(StockTransactions::Table)
                    .col(StockTransactions::MillId)
                    .col(StockTransactions::DocumentKind)
                    .col(StockTransactions::DocumentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-stock_transactions-mill_id-commodity-variety")
                    .table(StockTransactions::Table)
                    .col(StockTransactions::MillId)
                    .col(StockTransactions::Commodity)
                    .col(StockTransactions::Variety)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StockTransactions::Table).to_owned())
            .await?;
        Ok(())
    }
}
