use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i64,
	pub name: Option<String>,
	pub phone: String,
	pub api_id: i64,
	pub api_hash: String,
	#[sea_orm(unique)]
	pub path_session: String,
	pub is_connected: bool,
	pub is_started: bool,
	pub batch_size: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(has_many = "super::username::Entity")]
	Usernames,
	#[sea_orm(has_many = "super::job::Entity")]
	Jobs,
	#[sea_orm(has_one = "super::account_texts::Entity")]
	AccountTexts,
}

impl Related<super::username::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Usernames.def()
	}
}

impl Related<super::job::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Jobs.def()
	}
}

impl Related<super::account_texts::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::AccountTexts.def()
	}
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
	/// mailing only runs for accounts both switched on and logged in
	pub fn is_mailing(&self) -> bool {
		self.is_started && self.is_connected
	}
}
