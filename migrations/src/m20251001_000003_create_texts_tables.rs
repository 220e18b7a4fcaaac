use sea_orm_migration::prelude::*;

use crate::m20251001_000001_create_accounts_table::Accounts;

#[derive(DeriveIden)]
pub enum AccountTexts {
	Table,
	Id,
	AccountId,
}

#[derive(DeriveIden)]
pub enum Texts {
	Table,
	Id,
	AccountTextsId,
	Kind,
	Text,
	Weight,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
	async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.create_table(
				Table::create()
					.table(AccountTexts::Table)
					.comment("template sets, at most one per account")
					.col(
						ColumnDef::new(AccountTexts::Id)
							.big_integer()
							.not_null()
							.auto_increment()
							.primary_key()
					)
					.col(ColumnDef::new(AccountTexts::AccountId).big_integer().not_null().unique_key())
					.foreign_key(
						ForeignKey::create()
							.name("fkey-account-texts-account")
							.from(AccountTexts::Table, AccountTexts::AccountId)
							.to(Accounts::Table, Accounts::Id)
							.on_update(ForeignKeyAction::Cascade)
							.on_delete(ForeignKeyAction::Cascade)
					)
					.to_owned()
			)
			.await?;

		manager
			.create_table(
				Table::create()
					.table(Texts::Table)
					.comment("template fragments, grouped in pools by kind")
					.col(
						ColumnDef::new(Texts::Id)
							.big_integer()
							.not_null()
							.auto_increment()
							.primary_key()
					)
					.col(ColumnDef::new(Texts::AccountTextsId).big_integer().not_null())
					.foreign_key(
						ForeignKey::create()
							.name("fkey-texts-account-texts")
							.from(Texts::Table, Texts::AccountTextsId)
							.to(AccountTexts::Table, AccountTexts::Id)
							.on_update(ForeignKeyAction::Cascade)
							.on_delete(ForeignKeyAction::Cascade)
					)
					.col(ColumnDef::new(Texts::Kind).integer().not_null())
					.col(ColumnDef::new(Texts::Text).text().not_null())
					.to_owned()
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("index-texts-account-texts-kind")
					.table(Texts::Table)
					.col(Texts::AccountTextsId)
					.col(Texts::Kind)
					.to_owned()
			)
			.await?;

		Ok(())
	}

	async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.drop_table(Table::drop().table(Texts::Table).to_owned())
			.await?;

		manager
			.drop_table(Table::drop().table(AccountTexts::Table).to_owned())
			.await?;

		Ok(())
	}
}
