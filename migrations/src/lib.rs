use sea_orm_migration::prelude::*;

mod m20251001_000001_create_accounts_table;
mod m20251001_000002_create_usernames_table;
mod m20251001_000003_create_texts_tables;
mod m20251001_000004_create_jobs_table;
mod m20251006_000001_create_cache_table;
mod m20251014_000001_add_weight_to_texts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
	fn migrations() -> Vec<Box<dyn MigrationTrait>> {
		vec![
			Box::new(m20251001_000001_create_accounts_table::Migration),
			Box::new(m20251001_000002_create_usernames_table::Migration),
			Box::new(m20251001_000003_create_texts_tables::Migration),
			Box::new(m20251001_000004_create_jobs_table::Migration),
			Box::new(m20251006_000001_create_cache_table::Migration),
			Box::new(m20251014_000001_add_weight_to_texts::Migration),
		]
	}
}

pub use sea_orm_migration::MigratorTrait;
