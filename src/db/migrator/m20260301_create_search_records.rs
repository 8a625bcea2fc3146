use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SearchRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SearchRecords::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SearchRecords::Kind).string().not_null())
                    .col(
                        ColumnDef::new(SearchRecords::ArtistName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SearchRecords::CollectionName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SearchRecords::CollectionViewUrl)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SearchRecords::Image).text().not_null())
                    .col(
                        ColumnDef::new(SearchRecords::SearchDate)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_search_records_kind")
                    .table(SearchRecords::Table)
                    .col(SearchRecords::Kind)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SearchRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SearchRecords {
    Table,
    Id,
    Kind,
    ArtistName,
    CollectionName,
    CollectionViewUrl,
    Image,
    SearchDate,
}
