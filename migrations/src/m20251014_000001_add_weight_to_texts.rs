use sea_orm_migration::prelude::*;

use crate::m20251001_000003_create_texts_tables::Texts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
	async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.alter_table(
				Table::alter()
					.table(Texts::Table)
					.add_column(ColumnDef::new(Texts::Weight).integer().not_null().default(1))
					.to_owned()
			)
			.await?;

		Ok(())
	}

	async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.alter_table(
				Table::alter()
					.table(Texts::Table)
					.drop_column(Texts::Weight)
					.to_owned()
			)
			.await?;

		Ok(())
	}
}
