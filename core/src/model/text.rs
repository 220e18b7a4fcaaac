use sea_orm::entity::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum TextKind {
	GreetingMorning = 1,
	GreetingDay = 2,
	GreetingEvening = 3,
	GreetingNight = 4,
	GreetingAnytime = 5,
	Clarifying = 6,
	FollowUp = 7,
	LeadIn = 8,
	Closing = 9,
}

impl TextKind {
	pub fn is_greeting(self) -> bool {
		matches!(
			self,
			TextKind::GreetingMorning
				| TextKind::GreetingDay
				| TextKind::GreetingEvening
				| TextKind::GreetingNight
				| TextKind::GreetingAnytime
		)
	}
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "texts")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i64,
	pub account_texts_id: i64,
	pub kind: TextKind,
	pub text: String,
	pub weight: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(
		belongs_to = "super::account_texts::Entity",
		from = "Column::AccountTextsId",
		to = "super::account_texts::Column::Id",
		on_update = "Cascade",
		on_delete = "Cascade"
	)]
	AccountTexts,
}

impl Related<super::account_texts::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::AccountTexts.def()
	}
}

impl ActiveModelBehavior for ActiveModel {}
