use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{cache::Storage, config::Config, transport::Transport};

#[derive(Clone)]
pub struct Context(Arc<ContextInner>);
struct ContextInner {
	db: DatabaseConnection,
	config: Config,
	transport: Arc<dyn Transport>,
	storage: Storage,
}

impl Context {
	pub fn new(db: DatabaseConnection, config: Config, transport: Arc<dyn Transport>, storage: Storage) -> Self {
		Context(Arc::new(ContextInner { db, config, transport, storage }))
	}

	pub fn db(&self) -> &DatabaseConnection {
		&self.0.db
	}

	pub fn cfg(&self) -> &Config {
		&self.0.config
	}

	pub fn transport(&self) -> &dyn Transport {
		self.0.transport.as_ref()
	}

	pub fn storage(&self) -> &Storage {
		&self.0.storage
	}
}
