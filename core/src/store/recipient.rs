use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::Expr;

use crate::model;

/// oldest recipients not yet reached, at most `limit`
pub async fn pending(db: &impl ConnectionTrait, account: i64, limit: u64) -> Result<Vec<model::username::Model>, DbErr> {
	model::username::Entity::find()
		.filter(model::username::Column::AccountId.eq(account))
		.filter(model::username::Column::Sent.eq(false))
		.order_by_asc(model::username::Column::Id)
		.limit(limit)
		.all(db)
		.await
}

pub async fn count_pending(db: &impl ConnectionTrait, account: i64) -> Result<u64, DbErr> {
	model::username::Entity::find()
		.filter(model::username::Column::AccountId.eq(account))
		.filter(model::username::Column::Sent.eq(false))
		.count(db)
		.await
}

pub async fn count_sent(db: &impl ConnectionTrait, account: i64) -> Result<u64, DbErr> {
	model::username::Entity::find()
		.filter(model::username::Column::AccountId.eq(account))
		.filter(model::username::Column::Sent.eq(true))
		.count(db)
		.await
}

pub async fn mark_sent(db: &impl ConnectionTrait, id: i64) -> Result<(), DbErr> {
	model::username::Entity::update_many()
		.col_expr(model::username::Column::Sent, Expr::value(true))
		.filter(model::username::Column::Id.eq(id))
		.exec(db)
		.await?;
	Ok(())
}

pub async fn delete(db: &impl ConnectionTrait, id: i64) -> Result<(), DbErr> {
	model::username::Entity::delete_by_id(id)
		.exec(db)
		.await?;
	Ok(())
}

/// enqueue `(item_name, username)` pairs as pending recipients, returns how many were added
pub async fn insert(db: &impl ConnectionTrait, account: i64, recipients: Vec<(String, String)>) -> Result<usize, DbErr> {
	let count = recipients.len();
	if count == 0 {
		return Ok(0);
	}

	model::username::Entity::insert_many(
		recipients
			.into_iter()
			.map(|(item_name, username)| model::username::ActiveModel {
				id: NotSet,
				account_id: Set(account),
				username: Set(username),
				item_name: Set(item_name),
				sent: Set(false),
			})
	)
		.exec(db)
		.await?;

	Ok(count)
}
