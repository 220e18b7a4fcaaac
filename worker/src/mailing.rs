use std::time::Duration;

use rand::Rng;
use sea_orm::TransactionTrait;

use catcher::{
	composer::{ComposeError, Composed, Composer},
	config::MailingConfig,
	identity,
	model::job::JobName,
	store,
	transport::{SendError, Unreachable},
	Context,
};

use crate::WorkerResult;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailingReport {
	pub sent: usize,
	pub suppressed: usize,
	pub deleted: usize,
	pub deferred: usize,
	pub halted: bool,
	pub finished: bool,
}

impl std::fmt::Display for MailingReport {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f, "sent {}, suppressed {}, deleted {}, deferred {}{}{}",
			self.sent, self.suppressed, self.deleted, self.deferred,
			if self.halted { ", halted" } else { "" },
			if self.finished { ", finished" } else { "" },
		)
	}
}

#[derive(Debug)]
enum Outcome {
	Sent,
	Unreachable(Unreachable),
	Deferred(u64),
	Halted,
	Failed,
}

/// uniformly random pause between `min` and `max` seconds
pub fn jitter(min: f64, max: f64) -> Duration {
	let min = min.max(0.0);
	let max = max.max(min);
	if max <= 0.0 {
		return Duration::ZERO;
	}
	let secs = if max > min { rand::rng().random_range(min..=max) } else { min };
	Duration::try_from_secs_f64(secs).unwrap_or_default()
}

async fn pause(duration: Duration) {
	if !duration.is_zero() {
		tokio::time::sleep(duration).await;
	}
}

/// one batch of pending recipients for the bound account.
/// each row is updated as soon as its outcome is known, an interrupted batch resumes next run
pub async fn mailing(ctx: &Context) -> WorkerResult<MailingReport> {
	let mut report = MailingReport::default();

	let Some(account_id) = identity::account_id(ctx).await else {
		tracing::debug!("no bound account, skipping mailing");
		return Ok(report);
	};

	let Some(account) = store::account::get(ctx.db(), account_id).await? else {
		tracing::warn!("bound account #{account_id} does not exist, skipping mailing");
		return Ok(report);
	};

	if !account.is_mailing() {
		tracing::debug!("account #{account_id} is not mailing (started: {}, connected: {})", account.is_started, account.is_connected);
		return Ok(report);
	}

	let pending = store::recipient::pending(ctx.db(), account.id, account.batch_size.max(0) as u64).await?;
	if pending.is_empty() {
		if store::recipient::count_pending(ctx.db(), account.id).await? == 0 {
			report.finished = finish(ctx, account.id).await?;
		}
		tracing::info!("mailing for account #{}: {report}", account.id);
		return Ok(report);
	}

	let templates = store::texts::templates(ctx.db(), account.id)
		.await?
		.ok_or(ComposeError::NoTemplates("template set"))?;
	let composer = Composer::new(templates, ctx.cfg().composer.clone())?;

	let cfg = &ctx.cfg().mailing;
	let total = pending.len();
	for (n, recipient) in pending.into_iter().enumerate() {
		let composed = {
			let mut rng = rand::rng();
			composer.compose_now(&recipient.item_name, &mut rng)
		};

		pause(jitter(cfg.base_delay_min_seconds, cfg.base_delay_max_seconds)).await;

		match deliver(ctx, &recipient.username, &composed).await {
			Outcome::Sent => {
				store::recipient::mark_sent(ctx.db(), recipient.id).await?;
				tracing::info!("sent to @{}", recipient.username);
				report.sent += 1;
			},
			Outcome::Unreachable(why) => {
				store::recipient::mark_sent(ctx.db(), recipient.id).await?;
				tracing::info!("suppressing @{}: {why}", recipient.username);
				report.suppressed += 1;
			},
			Outcome::Deferred(secs) => {
				tracing::info!("deferred @{} after waiting {secs}s", recipient.username);
				report.deferred += 1;
			},
			Outcome::Halted => {
				tracing::error!("sending banned, halting batch at @{}", recipient.username);
				report.halted = true;
				break;
			},
			Outcome::Failed => {
				store::recipient::delete(ctx.db(), recipient.id).await?;
				tracing::warn!("dropped @{} after failed delivery", recipient.username);
				report.deleted += 1;
			},
		}

		cool_down(cfg, n + 1, total).await;
	}

	if store::recipient::count_pending(ctx.db(), account.id).await? == 0 {
		report.finished = finish(ctx, account.id).await?;
	}

	tracing::info!("mailing for account #{}: {report}", account.id);
	Ok(report)
}

/// longer pause every `cooldown_every` processed recipients, never after the last one
async fn cool_down(cfg: &MailingConfig, processed: usize, total: usize) -> bool {
	if cfg.cooldown_every == 0 || processed % cfg.cooldown_every != 0 || processed >= total {
		return false;
	}
	let cooldown = jitter(cfg.cooldown_min_seconds, cfg.cooldown_max_seconds);
	tracing::debug!("cooling down for {:.1}s", cooldown.as_secs_f64());
	pause(cooldown).await;
	true
}

/// stop the account and notify the control side, atomically
async fn finish(ctx: &Context, account: i64) -> WorkerResult<bool> {
	let tx = ctx.db().begin().await?;
	store::account::set_started(&tx, account, false).await?;
	let job = store::job::enqueue(&tx, account, JobName::MailingFinished, None).await?;
	tx.commit().await?;
	tracing::info!("no pending recipients left for account #{account}, mailing finished (job #{})", job.id);
	Ok(true)
}

/// try a composition on one recipient, retrying unknown errors with linear backoff
async fn deliver(ctx: &Context, recipient: &str, composed: &Composed) -> Outcome {
	let cfg = &ctx.cfg().mailing;
	let parts = composed.parts();
	let max_attempts = cfg.max_attempts.max(1);
	let mut next = 0;
	let mut attempt = 0;

	while attempt < max_attempts {
		match send_parts(ctx, recipient, &parts, &mut next).await {
			Ok(()) => return Outcome::Sent,
			Err(SendError::RateLimited(secs)) => {
				let jitter = rand::rng().random_range(
					cfg.flood_jitter_min_seconds.min(cfg.flood_jitter_max_seconds)..=cfg.flood_jitter_max_seconds.max(cfg.flood_jitter_min_seconds)
				);
				let wait = secs.saturating_add(jitter);
				tracing::warn!("rate limited while sending to @{recipient}, waiting {wait}s");
				pause(Duration::from_secs(wait)).await;
				return Outcome::Deferred(wait);
			},
			Err(SendError::Banned) => return Outcome::Halted,
			Err(SendError::Unreachable(why)) => return Outcome::Unreachable(why),
			Err(SendError::InvalidIdentifier) => {
				tracing::info!("@{recipient} is not a valid recipient");
				return Outcome::Failed;
			},
			Err(SendError::Other(e)) => {
				attempt += 1;
				tracing::warn!("attempt {attempt}/{max_attempts} to @{recipient} failed: {e}");
				if attempt < max_attempts {
					pause(Duration::try_from_secs_f64(cfg.retry_backoff_seconds.max(0.0) * attempt as f64).unwrap_or_default()).await;
				}
			},
		}
	}

	Outcome::Failed
}

/// send parts in order starting from `next`, which always points at the first undelivered one
async fn send_parts(ctx: &Context, recipient: &str, parts: &[&str], next: &mut usize) -> Result<(), SendError> {
	let cfg = &ctx.cfg().mailing;
	while *next < parts.len() {
		if *next > 0 {
			pause(jitter(cfg.part_delay_min_seconds, cfg.part_delay_max_seconds)).await;
		}
		ctx.transport().send(recipient, parts[*next]).await?;
		*next += 1;
	}
	Ok(())
}

#[cfg(test)]
mod test {
	use std::sync::Arc;

	use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

	use catcher::model;

	use crate::testing::{offline, setup, Scripted};
	use super::*;

	fn other() -> Result<(), SendError> {
		Err(SendError::Other("internal".into()))
	}

	async fn row(ctx: &Context, username: &str) -> Option<model::username::Model> {
		model::username::Entity::find()
			.filter(model::username::Column::Username.eq(username))
			.one(ctx.db())
			.await
			.unwrap()
	}

	async fn finished_jobs(ctx: &Context, account: i64) -> usize {
		store::job::list(ctx.db(), account)
			.await
			.unwrap()
			.into_iter()
			.filter(|j| j.kind() == Some(JobName::MailingFinished))
			.count()
	}

	#[test]
	fn jitter_stays_in_bounds() {
		for _ in 0..100 {
			let x = jitter(0.8, 1.6);
			assert!(x >= Duration::from_secs_f64(0.8) && x <= Duration::from_secs_f64(1.6));
		}
		assert_eq!(jitter(0.0, 0.0), Duration::ZERO);
		assert_eq!(jitter(-3.0, -1.0), Duration::ZERO);
		assert_eq!(jitter(5.0, 1.0), Duration::from_secs(5));
	}

	#[tokio::test]
	async fn unknown_errors_exhaust_retries_then_delete() {
		let transport = Arc::new(Scripted::default());
		transport.script("alice", vec![other(), other(), other()]);
		let (ctx, _) = setup(transport.clone(), &["alice", "bob"], 5).await;

		let report = mailing(&ctx).await.unwrap();
		assert_eq!(transport.calls_to("alice"), 3);
		assert!(row(&ctx, "alice").await.is_none());
		assert_eq!(report.deleted, 1);
		assert_eq!(report.sent, 1);
	}

	#[tokio::test]
	async fn unreachable_recipient_is_suppressed_without_retry() {
		let transport = Arc::new(Scripted::default());
		transport.script("alice", vec![Err(SendError::Unreachable(Unreachable::Privacy))]);
		let (ctx, _) = setup(transport.clone(), &["alice", "bob"], 5).await;

		let report = mailing(&ctx).await.unwrap();
		assert_eq!(transport.calls_to("alice"), 1);
		assert!(row(&ctx, "alice").await.unwrap().sent);
		assert_eq!(report.suppressed, 1);
	}

	#[tokio::test]
	async fn invalid_identifier_is_deleted_after_one_attempt() {
		let transport = Arc::new(Scripted::default());
		transport.script("ghost", vec![Err(SendError::InvalidIdentifier)]);
		let (ctx, _) = setup(transport.clone(), &["ghost"], 5).await;

		let report = mailing(&ctx).await.unwrap();
		assert_eq!(transport.calls_to("ghost"), 1);
		assert!(row(&ctx, "ghost").await.is_none());
		assert_eq!(report.deleted, 1);
	}

	#[tokio::test]
	async fn rate_limit_leaves_row_pending() {
		let transport = Arc::new(Scripted::default());
		transport.script("alice", vec![Err(SendError::RateLimited(0))]);
		let (ctx, account) = setup(transport.clone(), &["alice", "bob"], 5).await;

		let report = mailing(&ctx).await.unwrap();
		assert_eq!(transport.calls_to("alice"), 1);
		assert!(!row(&ctx, "alice").await.unwrap().sent);
		assert!(row(&ctx, "bob").await.unwrap().sent);
		assert_eq!(report.deferred, 1);
		assert!(!report.finished);
		assert_eq!(finished_jobs(&ctx, account).await, 0);
	}

	#[tokio::test]
	async fn ban_halts_the_batch() {
		let transport = Arc::new(Scripted::default());
		transport.script("bob", vec![Err(SendError::Banned)]);
		let (ctx, _) = setup(transport.clone(), &["alice", "bob", "carol"], 5).await;

		let report = mailing(&ctx).await.unwrap();
		assert!(report.halted);
		assert_eq!(report.sent, 1);
		assert_eq!(transport.calls_to("carol"), 0);
		assert!(!row(&ctx, "bob").await.unwrap().sent);
		assert!(!row(&ctx, "carol").await.unwrap().sent);
	}

	#[tokio::test]
	async fn retry_resumes_from_undelivered_part() {
		let transport = Arc::new(Scripted::default());
		transport.script("alice", vec![Ok(()), other(), Ok(())]);
		let (ctx, _) = setup(transport.clone(), &["alice"], 5).await;

		let report = mailing(&ctx).await.unwrap();
		assert_eq!(report.sent, 1);
		let calls = transport.calls();
		assert_eq!(calls.len(), 3);
		assert!(calls[0].1.starts_with("Hi"));
		assert_eq!(calls[1].1, calls[2].1);
		assert!(calls[1].1.contains("lamp"));
	}

	#[tokio::test]
	async fn batch_size_caps_recipients_per_run() {
		let transport = Arc::new(Scripted::default());
		let (ctx, account) = setup(transport.clone(), &["a", "b", "c", "d", "e"], 2).await;

		let report = mailing(&ctx).await.unwrap();
		assert_eq!(report.sent, 2);
		assert_eq!(transport.calls_to("a") + transport.calls_to("b"), transport.calls().len());
		assert_eq!(store::recipient::count_pending(ctx.db(), account).await.unwrap(), 3);
		assert!(!report.finished);
	}

	#[tokio::test]
	async fn drained_queue_finishes_exactly_once() {
		let transport = Arc::new(Scripted::default());
		let (ctx, account) = setup(transport.clone(), &["alice"], 5).await;

		let report = mailing(&ctx).await.unwrap();
		assert_eq!(report.sent, 1);
		assert!(report.finished);
		assert!(!store::account::get(ctx.db(), account).await.unwrap().unwrap().is_started);
		assert_eq!(finished_jobs(&ctx, account).await, 1);

		let again = mailing(&ctx).await.unwrap();
		assert_eq!(again, MailingReport::default());
		assert_eq!(finished_jobs(&ctx, account).await, 1);
	}

	#[tokio::test]
	async fn empty_queue_finishes_immediately() {
		let transport = Arc::new(Scripted::default());
		let (ctx, account) = setup(transport.clone(), &[], 5).await;

		let report = mailing(&ctx).await.unwrap();
		assert!(report.finished);
		assert!(transport.calls().is_empty());
		assert!(!store::account::get(ctx.db(), account).await.unwrap().unwrap().is_started);
		assert_eq!(finished_jobs(&ctx, account).await, 1);
	}

	#[tokio::test]
	async fn stopped_or_disconnected_account_is_left_alone() {
		let transport = Arc::new(Scripted::default());
		let (ctx, account) = setup(transport.clone(), &["alice"], 5).await;

		store::account::set_connected(ctx.db(), account, false).await.unwrap();
		assert_eq!(mailing(&ctx).await.unwrap(), MailingReport::default());

		store::account::set_connected(ctx.db(), account, true).await.unwrap();
		store::account::set_started(ctx.db(), account, false).await.unwrap();
		assert_eq!(mailing(&ctx).await.unwrap(), MailingReport::default());

		assert!(transport.calls().is_empty());
		assert_eq!(finished_jobs(&ctx, account).await, 0);
	}

	#[tokio::test]
	async fn missing_templates_fail_the_run() {
		let transport = Arc::new(Scripted::default());
		let (ctx, account) = setup(transport.clone(), &["alice"], 5).await;
		model::text::Entity::delete_many().exec(ctx.db()).await.unwrap();

		assert!(matches!(mailing(&ctx).await, Err(crate::WorkerError::Compose(_))));
		assert_eq!(store::recipient::count_pending(ctx.db(), account).await.unwrap(), 1);
	}

	fn assert_elapsed(start: tokio::time::Instant, secs: u64) {
		let elapsed = start.elapsed();
		assert!(
			elapsed >= Duration::from_secs(secs) && elapsed < Duration::from_secs(secs) + Duration::from_millis(50),
			"expected {secs}s, elapsed {elapsed:?}",
		);
	}

	async fn cool_down_batch(cfg: &MailingConfig, total: usize) -> Vec<bool> {
		let mut cooled = Vec::new();
		for processed in 1..=total {
			cooled.push(cool_down(cfg, processed, total).await);
		}
		cooled
	}

	#[tokio::test(start_paused = true)]
	async fn cooldown_every_second_recipient_but_not_after_last() {
		let mut cfg = crate::testing::config().mailing;
		cfg.cooldown_every = 2;
		cfg.cooldown_min_seconds = 10.0;
		cfg.cooldown_max_seconds = 10.0;

		let start = tokio::time::Instant::now();
		assert_eq!(cool_down_batch(&cfg, 4).await, vec![false, true, false, false]);
		assert_elapsed(start, 10);

		let start = tokio::time::Instant::now();
		assert_eq!(cool_down_batch(&cfg, 3).await, vec![false, true, false]);
		assert_elapsed(start, 10);

		let start = tokio::time::Instant::now();
		assert_eq!(cool_down_batch(&cfg, 5).await, vec![false, true, false, true, false]);
		assert_elapsed(start, 20);

		cfg.cooldown_every = 0;
		let start = tokio::time::Instant::now();
		assert!(cool_down_batch(&cfg, 4).await.iter().all(|x| !x));
		assert_elapsed(start, 0);
	}

	#[tokio::test(start_paused = true)]
	async fn rate_limit_waits_requested_seconds_plus_jitter() {
		let transport = Arc::new(Scripted::default());
		transport.script("alice", vec![Err(SendError::RateLimited(30))]);
		let ctx = offline(transport.clone(), crate::testing::config());

		let start = tokio::time::Instant::now();
		let outcome = deliver(&ctx, "alice", &Composed::Single("hi".into())).await;
		assert!(matches!(outcome, Outcome::Deferred(30)));
		assert_elapsed(start, 30);
		assert_eq!(transport.calls_to("alice"), 1);

		let mut cfg = crate::testing::config();
		cfg.mailing.flood_jitter_min_seconds = 3;
		cfg.mailing.flood_jitter_max_seconds = 12;
		transport.script("bob", vec![Err(SendError::RateLimited(30))]);
		let ctx = offline(transport.clone(), cfg);

		let start = tokio::time::Instant::now();
		let Outcome::Deferred(wait) = deliver(&ctx, "bob", &Composed::Single("hi".into())).await else {
			panic!("rate limit must defer");
		};
		assert!((33..=42).contains(&wait));
		assert_elapsed(start, wait);
	}

	#[tokio::test(start_paused = true)]
	async fn retry_backoff_grows_with_attempts() {
		let transport = Arc::new(Scripted::default());
		transport.script("alice", vec![other(), other(), other()]);
		let mut cfg = crate::testing::config();
		cfg.mailing.retry_backoff_seconds = 5.0;
		let ctx = offline(transport.clone(), cfg);

		let start = tokio::time::Instant::now();
		let outcome = deliver(&ctx, "alice", &Composed::Single("hi".into())).await;
		assert!(matches!(outcome, Outcome::Failed));
		// 5s after the first failure, 10s after the second, none after the last
		assert_elapsed(start, 15);
		assert_eq!(transport.calls_to("alice"), 3);
	}

	#[tokio::test(start_paused = true)]
	async fn split_retry_waits_part_gap_again() {
		let transport = Arc::new(Scripted::default());
		transport.script("alice", vec![Ok(()), other(), Ok(())]);
		let mut cfg = crate::testing::config();
		cfg.mailing.part_delay_min_seconds = 1.0;
		cfg.mailing.part_delay_max_seconds = 1.0;
		cfg.mailing.retry_backoff_seconds = 5.0;
		let ctx = offline(transport.clone(), cfg);

		let start = tokio::time::Instant::now();
		let outcome = deliver(&ctx, "alice", &Composed::Split("hi".into(), "how are you".into())).await;
		assert!(matches!(outcome, Outcome::Sent));
		assert_elapsed(start, 1 + 5 + 1);
		let texts : Vec<String> = transport.calls().into_iter().map(|(_, t)| t).collect();
		assert_eq!(texts, vec!["hi", "how are you", "how are you"]);
	}
}
