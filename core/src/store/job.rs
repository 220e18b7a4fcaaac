use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};

use crate::model::{self, job::JobName};

pub async fn enqueue(db: &impl ConnectionTrait, account: i64, name: JobName, mdata: Option<Vec<u8>>) -> Result<model::job::Model, DbErr> {
	model::job::ActiveModel {
		id: NotSet,
		account_id: Set(account),
		name: Set(name.to_string()),
		mdata: Set(mdata),
		answer: Set(None),
	}
		.insert(db)
		.await
}

/// unanswered jobs of given kinds, oldest first
pub async fn unanswered(db: &impl ConnectionTrait, account: i64, names: &[JobName], limit: u64) -> Result<Vec<model::job::Model>, DbErr> {
	model::job::Entity::find()
		.filter(model::job::Column::AccountId.eq(account))
		.filter(model::job::Column::Answer.is_null())
		.filter(model::job::Column::Name.is_in(names.iter().map(|x| x.as_str())))
		.order_by_asc(model::job::Column::Id)
		.limit(limit)
		.all(db)
		.await
}

pub async fn answer(db: &impl ConnectionTrait, id: i64, answer: Vec<u8>) -> Result<(), DbErr> {
	model::job::ActiveModel {
		id: Unchanged(id),
		answer: Set(Some(answer)),
		..Default::default()
	}
		.update(db)
		.await?;
	Ok(())
}

pub async fn list(db: &impl ConnectionTrait, account: i64) -> Result<Vec<model::job::Model>, DbErr> {
	model::job::Entity::find()
		.filter(model::job::Column::AccountId.eq(account))
		.order_by_asc(model::job::Column::Id)
		.all(db)
		.await
}
