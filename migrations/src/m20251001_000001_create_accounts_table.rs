use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub enum Accounts {
	Table,
	Id,
	Name,
	Phone,
	ApiId,
	ApiHash,
	PathSession,
	IsConnected,
	IsStarted,
	BatchSize,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
	async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.create_table(
				Table::create()
					.table(Accounts::Table)
					.comment("chat platform identities, one per session file")
					.col(
						ColumnDef::new(Accounts::Id)
							.big_integer()
							.not_null()
							.auto_increment()
							.primary_key()
					)
					.col(ColumnDef::new(Accounts::Name).string_len(50).null())
					.col(ColumnDef::new(Accounts::Phone).string_len(50).not_null())
					.col(ColumnDef::new(Accounts::ApiId).big_integer().not_null())
					.col(ColumnDef::new(Accounts::ApiHash).string_len(100).not_null())
					.col(ColumnDef::new(Accounts::PathSession).string_len(100).not_null().unique_key())
					.col(ColumnDef::new(Accounts::IsConnected).boolean().not_null().default(false))
					.col(ColumnDef::new(Accounts::IsStarted).boolean().not_null().default(false))
					.col(ColumnDef::new(Accounts::BatchSize).integer().not_null().default(5))
					.to_owned()
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.unique()
					.name("index-accounts-path-session")
					.table(Accounts::Table)
					.col(Accounts::PathSession)
					.to_owned()
			)
			.await?;

		Ok(())
	}

	async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.drop_table(Table::drop().table(Accounts::Table).to_owned())
			.await?;

		Ok(())
	}
}
