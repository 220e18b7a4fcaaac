use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "usernames")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i64,
	pub account_id: i64,
	pub username: String,
	pub item_name: String,
	#[sea_orm(column_name = "sended")]
	pub sent: bool,
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
}

impl Related<super::account::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Accounts.def()
	}
}

impl ActiveModelBehavior for ActiveModel {}
