use sea_orm::DatabaseConnection;

use catcher::model::text::TextKind;

/// marks an intentionally empty fragment, letting optional pools pick "nothing"
pub const EMPTY_FRAGMENT: &str = "<empty>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TextPool {
	GreetingMorning,
	GreetingDay,
	GreetingEvening,
	GreetingNight,
	GreetingAnytime,
	Clarifying,
	FollowUp,
	LeadIn,
	Closing,
}

impl From<TextPool> for TextKind {
	fn from(value: TextPool) -> Self {
		match value {
			TextPool::GreetingMorning => TextKind::GreetingMorning,
			TextPool::GreetingDay => TextKind::GreetingDay,
			TextPool::GreetingEvening => TextKind::GreetingEvening,
			TextPool::GreetingNight => TextKind::GreetingNight,
			TextPool::GreetingAnytime => TextKind::GreetingAnytime,
			TextPool::Clarifying => TextKind::Clarifying,
			TextPool::FollowUp => TextKind::FollowUp,
			TextPool::LeadIn => TextKind::LeadIn,
			TextPool::Closing => TextKind::Closing,
		}
	}
}

pub fn parse_fragments(text: &str) -> Vec<String> {
	text.lines()
		.map(str::trim)
		.filter(|x| !x.is_empty())
		.map(|x| if x == EMPTY_FRAGMENT { String::new() } else { x.to_string() })
		.collect()
}

pub async fn texts(db: &DatabaseConnection, account: i64, pool: TextPool, file: &std::path::Path, weight: i32) -> Result<(), crate::CliError> {
	crate::ensure_account(db, account).await?;

	let kind = TextKind::from(pool);
	let fragments = parse_fragments(&std::fs::read_to_string(file)?);
	if (kind.is_greeting() || kind == TextKind::Clarifying) && fragments.iter().any(|x| x.is_empty()) {
		tracing::warn!("empty fragments are never picked for {pool:?}");
	}

	let count = catcher::store::texts::insert(db, account, kind, fragments, weight.max(0)).await?;
	tracing::info!("added {count} fragments to {pool:?} for account #{account}");

	Ok(())
}
