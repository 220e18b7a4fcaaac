use sea_orm_migration::prelude::*;

use crate::m20251001_000001_create_accounts_table::Accounts;

#[derive(DeriveIden)]
pub enum Usernames {
	Table,
	Id,
	AccountId,
	Username,
	ItemName,
	Sended,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
	async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.create_table(
				Table::create()
					.table(Usernames::Table)
					.comment("mailing recipients, pending until sent or dropped")
					.col(
						ColumnDef::new(Usernames::Id)
							.big_integer()
							.not_null()
							.auto_increment()
							.primary_key()
					)
					.col(ColumnDef::new(Usernames::AccountId).big_integer().not_null())
					.foreign_key(
						ForeignKey::create()
							.name("fkey-usernames-account")
							.from(Usernames::Table, Usernames::AccountId)
							.to(Accounts::Table, Accounts::Id)
							.on_update(ForeignKeyAction::Cascade)
							.on_delete(ForeignKeyAction::Cascade)
					)
					.col(ColumnDef::new(Usernames::Username).string_len(100).not_null())
					.col(ColumnDef::new(Usernames::ItemName).string_len(100).not_null())
					.col(ColumnDef::new(Usernames::Sended).boolean().not_null().default(false))
					.to_owned()
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("index-usernames-account-sended")
					.table(Usernames::Table)
					.col(Usernames::AccountId)
					.col(Usernames::Sended)
					.to_owned()
			)
			.await?;

		Ok(())
	}

	async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.drop_table(Table::drop().table(Usernames::Table).to_owned())
			.await?;

		Ok(())
	}
}
