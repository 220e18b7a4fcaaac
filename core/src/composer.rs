use std::collections::BTreeMap;

use chrono::Timelike;
use rand::{seq::IndexedRandom, Rng};

use crate::config::ComposerConfig;
use crate::ext::{capitalize, ends_with_punctuation};
use crate::model::text::TextKind;

pub const ITEM_PLACEHOLDER: &str = "{item}";

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
	#[error("no templates configured: {0}")]
	NoTemplates(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
	pub text: String,
	pub weight: u32,
}

impl Fragment {
	pub fn new(text: impl ToString, weight: u32) -> Self {
		Fragment { text: text.to_string(), weight }
	}
}

#[derive(Debug, Clone, Default)]
pub struct Templates {
	pools: BTreeMap<TextKind, Vec<Fragment>>,
}

impl Templates {
	pub fn push(&mut self, kind: TextKind, fragment: Fragment) {
		self.pools.entry(kind).or_default().push(fragment);
	}

	pub fn pool(&self, kind: TextKind) -> &[Fragment] {
		self.pools.get(&kind).map(|x| x.as_slice()).unwrap_or_default()
	}

	fn usable(&self, kind: TextKind, allow_blank: bool) -> bool {
		self.pool(kind)
			.iter()
			.any(|f| f.weight > 0 && (allow_blank || !f.text.trim().is_empty()))
	}

	fn pick<R: Rng + ?Sized>(&self, kind: TextKind, allow_blank: bool, rng: &mut R) -> Option<&str> {
		let candidates : Vec<&Fragment> = self.pool(kind)
			.iter()
			.filter(|f| f.weight > 0 && (allow_blank || !f.text.trim().is_empty()))
			.collect();

		candidates
			.choose_weighted(rng, |f| f.weight)
			.ok()
			.copied()
			.map(|f| f.text.trim())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPeriod {
	Morning,
	Day,
	Evening,
	Night,
}

impl DayPeriod {
	pub fn from_hour(hour: u32) -> Self {
		match hour {
			5..=11 => DayPeriod::Morning,
			12..=16 => DayPeriod::Day,
			17..=22 => DayPeriod::Evening,
			_ => DayPeriod::Night,
		}
	}

	pub fn greetings(self) -> TextKind {
		match self {
			DayPeriod::Morning => TextKind::GreetingMorning,
			DayPeriod::Day => TextKind::GreetingDay,
			DayPeriod::Evening => TextKind::GreetingEvening,
			DayPeriod::Night => TextKind::GreetingNight,
		}
	}

	/// pools to try in order: this period, anytime, then every other period
	pub fn greeting_chain(self) -> Vec<TextKind> {
		let mut chain = vec![self.greetings(), TextKind::GreetingAnytime];
		for kind in [TextKind::GreetingDay, TextKind::GreetingMorning, TextKind::GreetingEvening, TextKind::GreetingNight] {
			if !chain.contains(&kind) {
				chain.push(kind);
			}
		}
		chain
	}
}

/// one or two chat messages, never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composed {
	Single(String),
	Split(String, String),
}

impl Composed {
	pub fn parts(&self) -> Vec<&str> {
		match self {
			Composed::Single(x) => vec![x],
			Composed::Split(a, b) => vec![a, b],
		}
	}
}

/// builds greeting, question and optional extras from an account's pools, always in that order
pub struct Composer {
	templates: Templates,
	cfg: ComposerConfig,
}

fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
	p > 0.0 && (p >= 1.0 || rng.random_bool(p))
}

fn terminated(text: &str, mark: char) -> String {
	let text = capitalize(text);
	if ends_with_punctuation(&text) {
		text
	} else {
		format!("{text}{mark}")
	}
}

impl Composer {
	pub fn new(templates: Templates, cfg: ComposerConfig) -> Result<Self, ComposeError> {
		if !DayPeriod::Day.greeting_chain().into_iter().any(|k| templates.usable(k, false)) {
			return Err(ComposeError::NoTemplates("greetings"));
		}
		if !templates.usable(TextKind::Clarifying, false) {
			return Err(ComposeError::NoTemplates("clarifying texts"));
		}
		Ok(Composer { templates, cfg })
	}

	/// local hour at the configured utc offset
	pub fn local_hour(&self) -> u32 {
		let now = chrono::Utc::now();
		match self.cfg.utc_offset_hours.checked_mul(3600).and_then(chrono::FixedOffset::east_opt) {
			Some(tz) => now.with_timezone(&tz).hour(),
			None => now.hour(),
		}
	}

	pub fn compose_now<R: Rng + ?Sized>(&self, item: &str, rng: &mut R) -> Composed {
		self.compose(item, self.local_hour(), rng)
	}

	pub fn compose<R: Rng + ?Sized>(&self, item: &str, hour: u32, rng: &mut R) -> Composed {
		let item = match item.trim() {
			"" => self.cfg.default_item.as_str(),
			x => x,
		};

		let greeting = DayPeriod::from_hour(hour)
			.greeting_chain()
			.into_iter()
			.find_map(|kind| self.templates.pick(kind, false, rng))
			.map(|g| terminated(g, '!'))
			.unwrap_or_default();

		let lead_in = self.templates.pick(TextKind::LeadIn, true, rng).unwrap_or_default();
		let clarifying = self.templates.pick(TextKind::Clarifying, false, rng).unwrap_or_default();
		let mut question = capitalize(
			format!("{lead_in} {}", clarifying.replace(ITEM_PLACEHOLDER, item)).trim()
		);
		if !ends_with_punctuation(&question) && chance(rng, self.cfg.question_mark_chance) {
			question.push('?');
		}

		let closing = self.templates
			.pick(TextKind::Closing, true, rng)
			.filter(|x| !x.is_empty())
			.map(|x| terminated(x, '.'));

		let follow_up = if self.templates.usable(TextKind::FollowUp, false) && chance(rng, self.cfg.follow_up_chance) {
			self.templates
				.pick(TextKind::FollowUp, false, rng)
				.map(|f| {
					let sentence = terminated(f, '.');
					match closing {
						Some(ref closing) => format!("{sentence} {closing}"),
						None => sentence,
					}
				})
		} else {
			None
		};

		match follow_up {
			Some(follow_up) => {
				if chance(rng, self.cfg.split_greeting_chance) {
					Composed::Split(greeting, format!("{question} {follow_up}"))
				} else if chance(rng, self.cfg.split_follow_up_chance) {
					Composed::Split(format!("{greeting} {question}"), follow_up)
				} else {
					Composed::Single(format!("{greeting} {question} {follow_up}"))
				}
			},
			None => {
				let body = match closing {
					Some(closing) if chance(rng, self.cfg.closing_only_chance) => format!("{question} {closing}"),
					_ => question,
				};
				if chance(rng, self.cfg.split_greeting_chance) {
					Composed::Split(greeting, body)
				} else {
					Composed::Single(format!("{greeting} {body}"))
				}
			},
		}
	}
}
