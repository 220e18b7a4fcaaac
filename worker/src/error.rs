use catcher::{cache::CacheError, composer::ComposeError, transport::SendError};

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
	#[error("database error: {0:?}")]
	Database(#[from] sea_orm::DbErr),

	#[error("cache error: {0}")]
	Cache(#[from] CacheError),

	#[error("cannot compose messages: {0}")]
	Compose(#[from] ComposeError),

	#[error("invalid payload json: {0:?}")]
	Json(#[from] serde_json::Error),

	#[error("transport error: {0}")]
	Send(#[from] SendError),

	#[error("malformed job: missing payload")]
	MissingPayload,
}

pub type WorkerResult<T> = Result<T, WorkerError>;
