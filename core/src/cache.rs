use std::{collections::HashMap, sync::Arc, time::Duration};

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter};

use crate::model;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
	#[error("database error: {0:?}")]
	Database(#[from] sea_orm::DbErr),

	#[error("invalid cached json: {0:?}")]
	Json(#[from] serde_json::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// raw string storage, keys arrive already namespaced
#[async_trait::async_trait]
pub trait Cache: Send + Sync {
	async fn get(&self, key: &str) -> CacheResult<Option<String>>;
	async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> CacheResult<()>;
	async fn delete(&self, key: &str) -> CacheResult<()>;
}

/// json values under `{namespace}:{client_hash}:{key}`
#[derive(Clone)]
pub struct Storage {
	backend: Arc<dyn Cache>,
	prefix: String,
}

impl Storage {
	pub fn new(backend: Arc<dyn Cache>, namespace: &str, client_hash: &str) -> Self {
		Storage { backend, prefix: format!("{namespace}:{client_hash}") }
	}

	pub fn key(&self, key: &str) -> String {
		format!("{}:{key}", self.prefix)
	}

	pub async fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
		match self.backend.get(&self.key(key)).await? {
			None => Ok(None),
			Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
		}
	}

	pub async fn set<T: serde::Serialize + Sync>(&self, key: &str, value: &T, ttl: Option<Duration>) -> CacheResult<()> {
		let raw = serde_json::to_string(value)?;
		self.backend.set(&self.key(key), raw, ttl).await
	}

	pub async fn delete(&self, keys: &[&str]) -> CacheResult<()> {
		for key in keys {
			self.backend.delete(&self.key(key)).await?;
		}
		Ok(())
	}
}

#[derive(Default)]
pub struct MemoryCache(tokio::sync::RwLock<HashMap<String, (String, Option<std::time::Instant>)>>);

#[async_trait::async_trait]
impl Cache for MemoryCache {
	async fn get(&self, key: &str) -> CacheResult<Option<String>> {
		let map = self.0.read().await;
		Ok(
			map.get(key)
				.filter(|(_, expires)| expires.map_or(true, |x| x > std::time::Instant::now()))
				.map(|(value, _)| value.clone())
		)
	}

	async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> CacheResult<()> {
		let expires = ttl.map(|x| std::time::Instant::now() + x);
		self.0.write().await.insert(key.to_string(), (value, expires));
		Ok(())
	}

	async fn delete(&self, key: &str) -> CacheResult<()> {
		self.0.write().await.remove(key);
		Ok(())
	}
}

pub struct DbCache(DatabaseConnection);

impl DbCache {
	pub fn new(db: DatabaseConnection) -> Self {
		DbCache(db)
	}
}

#[async_trait::async_trait]
impl Cache for DbCache {
	async fn get(&self, key: &str) -> CacheResult<Option<String>> {
		let Some(entry) = model::cache_entry::Entity::find()
			.filter(model::cache_entry::Column::Key.eq(key))
			.one(&self.0)
			.await?
		else {
			return Ok(None);
		};

		if entry.expired() {
			model::cache_entry::Entity::delete_by_id(entry.id)
				.exec(&self.0)
				.await?;
			return Ok(None);
		}

		Ok(Some(entry.value))
	}

	async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> CacheResult<()> {
		let expires = ttl
			.and_then(|x| chrono::Duration::from_std(x).ok())
			.map(|x| chrono::Utc::now() + x);
		match model::cache_entry::Entity::find()
			.filter(model::cache_entry::Column::Key.eq(key))
			.one(&self.0)
			.await?
		{
			Some(entry) => {
				let mut active = entry.into_active_model();
				active.value = sea_orm::ActiveValue::Set(value);
				active.expires = sea_orm::ActiveValue::Set(expires);
				active.update(&self.0).await?;
			},
			None => {
				model::cache_entry::ActiveModel {
					id: sea_orm::ActiveValue::NotSet,
					key: sea_orm::ActiveValue::Set(key.to_string()),
					value: sea_orm::ActiveValue::Set(value),
					expires: sea_orm::ActiveValue::Set(expires),
				}
					.insert(&self.0)
					.await?;
			},
		}

		Ok(())
	}

	async fn delete(&self, key: &str) -> CacheResult<()> {
		model::cache_entry::Entity::delete_many()
			.filter(model::cache_entry::Column::Key.eq(key))
			.exec(&self.0)
			.await?;
		Ok(())
	}
}
