use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub enum CacheEntries {
	Table,
	Id,
	Key,
	Value,
	Expires,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
	async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.create_table(
				Table::create()
					.table(CacheEntries::Table)
					.comment("namespaced key-value cache, json values")
					.col(
						ColumnDef::new(CacheEntries::Id)
							.big_integer()
							.not_null()
							.auto_increment()
							.primary_key()
					)
					.col(ColumnDef::new(CacheEntries::Key).string().not_null().unique_key())
					.col(ColumnDef::new(CacheEntries::Value).text().not_null())
					.col(ColumnDef::new(CacheEntries::Expires).timestamp_with_time_zone().null())
					.to_owned()
			)
			.await?;

		manager
			.create_index(Index::create().unique().name("index-cache-entries-key").table(CacheEntries::Table).col(CacheEntries::Key).to_owned())
			.await?;

		Ok(())
	}

	async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.drop_table(Table::drop().table(CacheEntries::Table).to_owned())
			.await?;

		Ok(())
	}
}
