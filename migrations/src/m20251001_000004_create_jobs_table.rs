use sea_orm_migration::prelude::*;

use crate::m20251001_000001_create_accounts_table::Accounts;

#[derive(DeriveIden)]
pub enum Jobs {
	Table,
	Id,
	AccountId,
	Name,
	Mdata,
	Answer,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
	async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.create_table(
				Table::create()
					.table(Jobs::Table)
					.comment("out of band requests and notifications, answered asynchronously")
					.col(
						ColumnDef::new(Jobs::Id)
							.big_integer()
							.not_null()
							.auto_increment()
							.primary_key()
					)
					.col(ColumnDef::new(Jobs::AccountId).big_integer().not_null())
					.foreign_key(
						ForeignKey::create()
							.name("fkey-jobs-account")
							.from(Jobs::Table, Jobs::AccountId)
							.to(Accounts::Table, Accounts::Id)
							.on_update(ForeignKeyAction::Cascade)
							.on_delete(ForeignKeyAction::Cascade)
					)
					.col(ColumnDef::new(Jobs::Name).string_len(50).not_null())
					.col(ColumnDef::new(Jobs::Mdata).binary().null())
					.col(ColumnDef::new(Jobs::Answer).binary().null())
					.to_owned()
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("index-jobs-account-name")
					.table(Jobs::Table)
					.col(Jobs::AccountId)
					.col(Jobs::Name)
					.to_owned()
			)
			.await?;

		Ok(())
	}

	async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.drop_table(Table::drop().table(Jobs::Table).to_owned())
			.await?;

		Ok(())
	}
}
