use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect, SelectColumns};
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};

use crate::model;

pub async fn get(db: &impl ConnectionTrait, id: i64) -> Result<Option<model::account::Model>, DbErr> {
	model::account::Entity::find_by_id(id)
		.one(db)
		.await
}

pub async fn id_by_session(db: &impl ConnectionTrait, path_session: &str) -> Result<Option<i64>, DbErr> {
	model::account::Entity::find()
		.filter(model::account::Column::PathSession.eq(path_session))
		.select_only()
		.select_column(model::account::Column::Id)
		.into_tuple::<i64>()
		.one(db)
		.await
}

pub struct NewAccount {
	pub phone: String,
	pub api_id: i64,
	pub api_hash: String,
	pub path_session: String,
	pub batch_size: i32,
}

pub async fn create(db: &impl ConnectionTrait, account: NewAccount) -> Result<model::account::Model, DbErr> {
	model::account::ActiveModel {
		id: NotSet,
		name: Set(None),
		phone: Set(account.phone),
		api_id: Set(account.api_id),
		api_hash: Set(account.api_hash),
		path_session: Set(account.path_session),
		is_connected: Set(false),
		is_started: Set(false),
		batch_size: Set(account.batch_size),
	}
		.insert(db)
		.await
}

pub async fn set_started(db: &impl ConnectionTrait, id: i64, started: bool) -> Result<(), DbErr> {
	model::account::ActiveModel {
		id: Unchanged(id),
		is_started: Set(started),
		..Default::default()
	}
		.update(db)
		.await?;
	Ok(())
}

pub async fn set_connected(db: &impl ConnectionTrait, id: i64, connected: bool) -> Result<(), DbErr> {
	model::account::ActiveModel {
		id: Unchanged(id),
		is_connected: Set(connected),
		..Default::default()
	}
		.update(db)
		.await?;
	Ok(())
}

pub async fn set_name(db: &impl ConnectionTrait, id: i64, name: &str) -> Result<(), DbErr> {
	model::account::ActiveModel {
		id: Unchanged(id),
		name: Set(Some(name.to_string())),
		..Default::default()
	}
		.update(db)
		.await?;
	Ok(())
}
