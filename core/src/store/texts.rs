use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use sea_orm::ActiveValue::{NotSet, Set};

use crate::composer::{Fragment, Templates};
use crate::model::{self, text::TextKind};

/// every fragment of the account's template set, `None` if it never got one
pub async fn templates(db: &impl ConnectionTrait, account: i64) -> Result<Option<Templates>, DbErr> {
	let Some(set) = model::account_texts::Entity::find()
		.filter(model::account_texts::Column::AccountId.eq(account))
		.one(db)
		.await?
	else {
		return Ok(None);
	};

	let rows = model::text::Entity::find()
		.filter(model::text::Column::AccountTextsId.eq(set.id))
		.order_by_asc(model::text::Column::Id)
		.all(db)
		.await?;

	let mut templates = Templates::default();
	for row in rows {
		templates.push(row.kind, Fragment::new(row.text, row.weight.max(0) as u32));
	}

	Ok(Some(templates))
}

/// id of the account's template set, created empty on first use
pub async fn ensure_set(db: &impl ConnectionTrait, account: i64) -> Result<i64, DbErr> {
	if let Some(set) = model::account_texts::Entity::find()
		.filter(model::account_texts::Column::AccountId.eq(account))
		.one(db)
		.await?
	{
		return Ok(set.id);
	}

	let set = model::account_texts::ActiveModel {
		id: NotSet,
		account_id: Set(account),
	}
		.insert(db)
		.await?;

	Ok(set.id)
}

pub async fn insert(db: &impl ConnectionTrait, account: i64, kind: TextKind, texts: Vec<String>, weight: i32) -> Result<usize, DbErr> {
	let count = texts.len();
	if count == 0 {
		return Ok(0);
	}

	let set = ensure_set(db, account).await?;

	model::text::Entity::insert_many(
		texts
			.into_iter()
			.map(|text| model::text::ActiveModel {
				id: NotSet,
				account_texts_id: Set(set),
				kind: Set(kind),
				text: Set(text),
				weight: Set(weight),
			})
	)
		.exec(db)
		.await?;

	Ok(count)
}
