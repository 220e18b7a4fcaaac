use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use catcher::{
	cache::{MemoryCache, Storage},
	model::text::TextKind,
	store,
	transport::{Profile, SendError, Transport},
	Config, Context,
};
use catcher_migrations::MigratorTrait;

/// in-process transport answering from per-recipient scripts, successful once a script runs out
#[derive(Default)]
pub struct Scripted {
	sends: Mutex<HashMap<String, VecDeque<Result<(), SendError>>>>,
	calls: Mutex<Vec<(String, String)>>,
	me: Mutex<Option<Profile>>,
	resolved: Mutex<HashMap<String, Result<Option<Profile>, SendError>>>,
}

impl Scripted {
	pub fn script(&self, recipient: &str, outcomes: Vec<Result<(), SendError>>) {
		self.sends.lock().unwrap().insert(recipient.to_string(), outcomes.into());
	}

	pub fn calls(&self) -> Vec<(String, String)> {
		self.calls.lock().unwrap().clone()
	}

	pub fn calls_to(&self, recipient: &str) -> usize {
		self.calls().iter().filter(|(r, _)| r == recipient).count()
	}

	pub fn set_me(&self, profile: Option<Profile>) {
		*self.me.lock().unwrap() = profile;
	}

	pub fn set_resolve(&self, username: &str, result: Result<Option<Profile>, SendError>) {
		self.resolved.lock().unwrap().insert(username.to_string(), result);
	}
}

#[async_trait::async_trait]
impl Transport for Scripted {
	async fn send(&self, recipient: &str, text: &str) -> Result<(), SendError> {
		self.calls.lock().unwrap().push((recipient.to_string(), text.to_string()));
		self.sends.lock()
			.unwrap()
			.get_mut(recipient)
			.and_then(|x| x.pop_front())
			.unwrap_or(Ok(()))
	}

	async fn me(&self) -> Result<Option<Profile>, SendError> {
		Ok(self.me.lock().unwrap().clone())
	}

	async fn resolve(&self, username: &str) -> Result<Option<Profile>, SendError> {
		self.resolved.lock()
			.unwrap()
			.get(username)
			.cloned()
			.unwrap_or(Ok(None))
	}

	async fn is_authorized(&self) -> Result<bool, SendError> {
		Ok(true)
	}
}

/// no pauses, and every composition split in two: greeting | question
pub fn config() -> Config {
	let mut cfg = Config::default();
	cfg.mailing.base_delay_min_seconds = 0.0;
	cfg.mailing.base_delay_max_seconds = 0.0;
	cfg.mailing.part_delay_min_seconds = 0.0;
	cfg.mailing.part_delay_max_seconds = 0.0;
	cfg.mailing.cooldown_min_seconds = 0.0;
	cfg.mailing.cooldown_max_seconds = 0.0;
	cfg.mailing.retry_backoff_seconds = 0.0;
	cfg.mailing.flood_jitter_min_seconds = 0;
	cfg.mailing.flood_jitter_max_seconds = 0;
	cfg.composer.split_greeting_chance = 1.0;
	cfg.composer.follow_up_chance = 0.0;
	cfg
}

/// context without a database, for code paths that never query it
pub fn offline(transport: Arc<Scripted>, cfg: Config) -> Context {
	let storage = Storage::new(Arc::new(MemoryCache::default()), "catcher", "test");
	Context::new(sea_orm::DatabaseConnection::Disconnected, cfg, transport, storage)
}

/// started and connected account bound to this context, with `recipients` pending
pub async fn setup(transport: Arc<Scripted>, recipients: &[&str], batch_size: i32) -> (Context, i64) {
	let mut opts = sea_orm::ConnectOptions::new("sqlite::memory:");
	opts.max_connections(1).min_connections(1).sqlx_logging(false);
	let db = sea_orm::Database::connect(opts).await.unwrap();
	catcher_migrations::Migrator::up(&db, None).await.unwrap();

	let storage = Storage::new(Arc::new(MemoryCache::default()), "catcher", "test");
	let ctx = Context::new(db, config(), transport, storage);

	let account = store::account::create(ctx.db(), store::account::NewAccount {
		phone: "+10000000000".into(),
		api_id: 1,
		api_hash: "test".into(),
		path_session: "sessions/test".into(),
		batch_size,
	}).await.unwrap();
	store::account::set_started(ctx.db(), account.id, true).await.unwrap();
	store::account::set_connected(ctx.db(), account.id, true).await.unwrap();

	store::texts::insert(ctx.db(), account.id, TextKind::GreetingAnytime, vec!["hi".into()], 1).await.unwrap();
	store::texts::insert(ctx.db(), account.id, TextKind::Clarifying, vec!["is {item} available?".into()], 1).await.unwrap();

	store::recipient::insert(
		ctx.db(),
		account.id,
		recipients.iter().map(|x| ("lamp".to_string(), x.to_string())).collect(),
	).await.unwrap();

	catcher::identity::bind(&ctx, "sessions/test").await.unwrap();

	(ctx, account.id)
}
