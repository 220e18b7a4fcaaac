mod register;
pub use register::*;

mod import;
pub use import::*;

mod texts;
pub use texts::*;

mod toggle;
pub use toggle::*;

mod status;
pub use status::*;

use sea_orm::DatabaseConnection;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
	#[error("database error: {0:?}")]
	Database(#[from] sea_orm::DbErr),

	#[error("could not read input file: {0}")]
	Io(#[from] std::io::Error),

	#[error("account #{0} does not exist")]
	UnknownAccount(i64),
}

#[derive(Debug, Clone, clap::Subcommand)]
pub enum CliCommand {
	/// register a new sending account
	Register {
		/// phone number the session was created with
		phone: String,

		/// numeric api id of the session
		api_id: i64,

		/// api hash of the session
		api_hash: String,

		/// session path, must be unique and is what `run` binds to
		path_session: String,

		#[arg(long, default_value_t = 5)]
		/// recipients reached per mailing run
		batch_size: i32,
	},

	/// enqueue recipients from a file of `item - username` lines
	Import {
		/// account id receiving the recipients
		account: i64,

		/// path of the list to import
		file: std::path::PathBuf,
	},

	/// append text fragments, one per line, to a template pool
	Texts {
		/// account id owning the templates
		account: i64,

		/// pool to append to
		kind: TextPool,

		/// path of the fragments file, `<empty>` lines add an empty fragment
		file: std::path::PathBuf,

		#[arg(long, default_value_t = 1)]
		/// relative weight of every fragment added
		weight: i32,
	},

	/// start mailing for an account
	Start {
		account: i64,
	},

	/// stop mailing for an account
	Stop {
		account: i64,
	},

	/// show pending and sent counts for an account
	Status {
		account: i64,
	},

	/// list jobs of an account and whether they got answered
	Jobs {
		account: i64,
	},
}

pub async fn run(db: &DatabaseConnection, command: CliCommand) -> Result<(), CliError> {
	tracing::info!("running cli task: {command:?}");
	match command {
		CliCommand::Register { phone, api_id, api_hash, path_session, batch_size } =>
			Ok(register(db, phone, api_id, api_hash, path_session, batch_size).await?),
		CliCommand::Import { account, file } =>
			Ok(import(db, account, &file).await?),
		CliCommand::Texts { account, kind, file, weight } =>
			Ok(texts(db, account, kind, &file, weight).await?),
		CliCommand::Start { account } =>
			Ok(toggle(db, account, true).await?),
		CliCommand::Stop { account } =>
			Ok(toggle(db, account, false).await?),
		CliCommand::Status { account } =>
			Ok(status(db, account).await?),
		CliCommand::Jobs { account } =>
			Ok(jobs(db, account).await?),
	}
}

/// fails unless the account row exists
async fn ensure_account(db: &DatabaseConnection, account: i64) -> Result<catcher::model::account::Model, CliError> {
	catcher::store::account::get(db, account)
		.await?
		.ok_or(CliError::UnknownAccount(account))
}

#[cfg(test)]
pub(crate) async fn test_db() -> DatabaseConnection {
	use catcher_migrations::MigratorTrait;
	let mut opts = sea_orm::ConnectOptions::new("sqlite::memory:");
	opts.max_connections(1).min_connections(1).sqlx_logging(false);
	let db = sea_orm::Database::connect(opts).await.unwrap();
	catcher_migrations::Migrator::up(&db, None).await.unwrap();
	db
}
