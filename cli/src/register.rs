use sea_orm::DatabaseConnection;

use catcher::store::account::NewAccount;

pub async fn register(
	db: &DatabaseConnection,
	phone: String,
	api_id: i64,
	api_hash: String,
	path_session: String,
	batch_size: i32,
) -> Result<(), crate::CliError> {
	let account = catcher::store::account::create(db, NewAccount {
		phone,
		api_id,
		api_hash,
		path_session,
		batch_size: batch_size.max(1),
	}).await?;

	tracing::info!("registered account #{} for session '{}'", account.id, account.path_session);

	Ok(())
}

#[cfg(test)]
mod test {
	#[tokio::test]
	async fn register_creates_stopped_account() {
		let db = crate::test_db().await;
		super::register(&db, "+1".into(), 42, "hash".into(), "sessions/a".into(), 0).await.unwrap();
		let account = catcher::store::account::get(&db, 1).await.unwrap().unwrap();
		assert_eq!(account.api_id, 42);
		assert_eq!(account.batch_size, 1);
		assert!(!account.is_started);
		assert!(!account.is_connected);

		assert!(super::register(&db, "+2".into(), 43, "hash".into(), "sessions/a".into(), 5).await.is_err());
	}
}
