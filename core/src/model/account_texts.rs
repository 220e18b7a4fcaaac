use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "account_texts")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i64,
	#[sea_orm(unique)]
	pub account_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(
		belongs_to = "super::account::Entity",
		from = "Column::AccountId",
		to = "super::account::Column::Id",
		on_update = "Cascade",
		on_delete = "Cascade"
	)]
	Accounts,
	#[sea_orm(has_many = "super::text::Entity")]
	Texts,
}

impl Related<super::account::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Accounts.def()
	}
}

impl Related<super::text::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Texts.def()
	}
}

impl ActiveModelBehavior for ActiveModel {}
