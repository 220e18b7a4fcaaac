use sea_orm::entity::prelude::*;

/// known values for the `name` column of jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobName {
	/// notification for the control side: pending queue ran dry
	MailingFinished,
	/// request: profile of the logged in identity
	AccountInfo,
	/// request: look up a json list of usernames
	ResolveUsernames,
	/// request: pending and sent counts
	MailingStats,
}

impl JobName {
	pub const SERVED: [JobName; 3] = [JobName::AccountInfo, JobName::ResolveUsernames, JobName::MailingStats];

	pub fn as_str(self) -> &'static str {
		match self {
			JobName::MailingFinished => "mailing_finished",
			JobName::AccountInfo => "account_info",
			JobName::ResolveUsernames => "resolve_usernames",
			JobName::MailingStats => "mailing_stats",
		}
	}

	pub fn parse(name: &str) -> Option<Self> {
		match name {
			"mailing_finished" => Some(JobName::MailingFinished),
			"account_info" => Some(JobName::AccountInfo),
			"resolve_usernames" => Some(JobName::ResolveUsernames),
			"mailing_stats" => Some(JobName::MailingStats),
			_ => None,
		}
	}
}

impl std::fmt::Display for JobName {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i64,
	pub account_id: i64,
	pub name: String,
	pub mdata: Option<Vec<u8>>,
	pub answer: Option<Vec<u8>>,
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

impl Model {
	pub fn kind(&self) -> Option<JobName> {
		JobName::parse(&self.name)
	}

	pub fn is_answered(&self) -> bool {
		self.answer.is_some()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn names_display_as_stored() {
		for name in [JobName::MailingFinished, JobName::AccountInfo, JobName::ResolveUsernames, JobName::MailingStats] {
			assert_eq!(JobName::parse(&name.to_string()), Some(name));
		}
		assert_eq!(format!("job ({})", JobName::MailingStats), "job (mailing_stats)");
		assert_eq!(JobName::parse("mailing stats"), None);
	}
}
