use std::{path::PathBuf, sync::Arc};
use clap::{Parser, Subcommand};
use sea_orm::{ConnectOptions, Database};
use signal_hook::consts::signal::*;
use signal_hook_tokio::Signals;
use futures::stream::StreamExt;

use catcher::ext::LoggableError;
use catcher::transport::Transport;
#[cfg(feature = "cli")]
use catcher_cli as cli;

#[cfg(feature = "migrate")]
use catcher_migrations as migrations;

use catcher_worker as worker;


#[derive(Parser)]
/// reaches out to sellers one chat at a time
struct Args {
	#[clap(subcommand)]
	/// command to run
	command: Mode,

	/// path to config file, leave empty to not use any
	#[arg(short, long)]
	config: Option<PathBuf>,

	#[arg(long = "db")]
	/// database connection uri, overrides config value
	database: Option<String>,

	#[arg(long, default_value_t=false)]
	/// run with debug level tracing
	debug: bool,

	#[arg(long)]
	/// force set number of worker threads for async runtime, defaults to number of cores
	threads: Option<usize>,
}

#[derive(Clone, Subcommand)]
enum Mode {
	/// print current or default configuration
	Config,

	#[cfg(feature = "migrate")]
	/// apply database migrations
	Migrate,

	#[cfg(feature = "cli")]
	/// run maintenance CLI tasks
	Cli {
		#[clap(subcommand)]
		/// task to run
		command: cli::CliCommand,
	},

	/// run mailing, job answering and profile refresh for one session
	Run {
		/// session path, identifies the account to run as
		path_session: String,

		/// numeric api id of the session
		api_id: i64,

		/// api hash of the session, also namespaces cache keys
		api_hash: String,
	},
}

fn main() {
	let args = Args::parse();

	tracing_subscriber::fmt()
		.compact()
		.with_max_level(if args.debug { tracing::Level::DEBUG } else { tracing::Level::INFO })
		.init();

	let config = catcher::Config::load(args.config.as_ref());

	if matches!(args.command, Mode::Config) {
		println!("{}", toml::to_string_pretty(&config).expect("failed serializing config"));
		return;
	}

	let mut runtime = tokio::runtime::Builder::new_multi_thread();

	if let Some(threads) = args.threads {
		runtime.worker_threads(threads);
	}

	runtime
		.enable_io()
		.enable_time()
		.thread_name("catcher-async-worker")
		.build()
		.expect("failed creating tokio async runtime")
		.block_on(async { init(args, config).await })
}

async fn init(args: Args, config: catcher::Config) {
	let database = args.database.unwrap_or(config.datasource.connection_string.clone());

	let mut opts = ConnectOptions::new(&database);

	opts
		.sqlx_logging(true)
		.sqlx_logging_level(tracing::log::LevelFilter::Debug)
		.max_connections(config.datasource.max_connections)
		.min_connections(config.datasource.min_connections)
		.acquire_timeout(std::time::Duration::from_secs(config.datasource.acquire_timeout_seconds))
		.connect_timeout(std::time::Duration::from_secs(config.datasource.connect_timeout_seconds))
		.sqlx_slow_statements_logging_settings(
			if config.datasource.slow_query_warn_enable { tracing::log::LevelFilter::Warn } else { tracing::log::LevelFilter::Debug },
			std::time::Duration::from_secs(config.datasource.slow_query_warn_seconds)
		);

	let db = Database::connect(opts)
		.await.expect("error connecting to db");

	match args.command {
		#[cfg(feature = "migrate")]
		Mode::Migrate => {
			use migrations::MigratorTrait;

			migrations::Migrator::up(&db, None)
				.await
				.expect("error applying migrations");
		},

		#[cfg(feature = "cli")]
		Mode::Cli { command } =>
			cli::run(&db, command)
				.await.expect("failed running cli task"),

		Mode::Run { path_session, api_id, api_hash } =>
			run(db, config, path_session, api_id, api_hash).await,

		Mode::Config => unreachable!(),
	}
}

async fn run(db: sea_orm::DatabaseConnection, config: catcher::Config, path_session: String, api_id: i64, api_hash: String) {
	let session = catcher::bridge::Session { path_session: path_session.clone(), api_id, api_hash: api_hash.clone() };
	let bridge = catcher::bridge::Bridge::new(&config.bridge, session)
		.expect("failed creating gateway client");

	match bridge.is_authorized().await {
		Ok(true) => tracing::info!("session '{path_session}' is authorized"),
		Ok(false) => {
			tracing::error!("session '{path_session}' is not authorized, log it in first");
			return;
		},
		Err(e) => {
			tracing::error!("could not open session '{path_session}': {e}");
			return;
		},
	}

	let backend : Arc<dyn catcher::cache::Cache> = match config.cache.backend {
		catcher::config::CacheBackend::Database => Arc::new(catcher::cache::DbCache::new(db.clone())),
		catcher::config::CacheBackend::Memory => Arc::new(catcher::cache::MemoryCache::default()),
	};
	let storage = catcher::cache::Storage::new(backend, &config.cache.namespace, &api_hash);

	let ctx = catcher::Context::new(db, config, Arc::new(bridge), storage);

	match catcher::identity::bind(&ctx, &path_session).await.expect("failed storing account identity") {
		Some(id) => tracing::info!("running as account #{id}"),
		None => {
			tracing::error!("no account registered for session '{path_session}', register it with the cli first");
			return;
		},
	}

	worker::profile::update_account_name(&ctx)
		.await
		.warn_failed("could not refresh account name");

	let (tx, rx) = tokio::sync::watch::channel(false);
	let signals = Signals::new([SIGTERM, SIGINT]).expect("failed registering signal handler");
	let handle = signals.handle();
	let signals_task = tokio::spawn(handle_signals(signals, tx));

	for task in worker::spawn(ctx, CancellationToken(rx)) {
		task.await.warn_failed("failed joining worker task");
	}

	handle.close();
	signals_task.await.expect("failed joining signal handler task");
}

#[derive(Clone)]
struct CancellationToken(tokio::sync::watch::Receiver<bool>);

impl worker::StopToken for CancellationToken {
	fn stop(&self) -> bool {
		*self.0.borrow()
	}

	async fn wait(&mut self) {
		self.0.wait_for(|x| *x).await.warn_failed("cancellation token channel closed, stopping...");
	}
}

async fn handle_signals(
	mut signals: signal_hook_tokio::Signals,
	tx: tokio::sync::watch::Sender<bool>,
) {
	while let Some(signal) = signals.next().await {
		match signal {
			SIGTERM | SIGINT => {
				tracing::info!("received stop signal, closing tasks");
				tx.send(true).info_failed("error sending stop signal to tasks")
			},
			_ => unreachable!(),
		}
	}
}
