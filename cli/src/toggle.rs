use sea_orm::DatabaseConnection;

pub async fn toggle(db: &DatabaseConnection, account: i64, started: bool) -> Result<(), crate::CliError> {
	let row = crate::ensure_account(db, account).await?;
	catcher::store::account::set_started(db, account, started).await?;

	if started {
		tracing::info!("started mailing for account #{account}");
		if !row.is_connected {
			tracing::warn!("account #{account} is not connected, mailing will wait for it");
		}
	} else {
		tracing::info!("stopped mailing for account #{account}");
	}

	Ok(())
}

#[cfg(test)]
mod test {
	#[tokio::test]
	async fn toggle_flips_started_flag() {
		let db = crate::test_db().await;
		crate::register(&db, "+1".into(), 1, "hash".into(), "sessions/toggle".into(), 5).await.unwrap();

		super::toggle(&db, 1, true).await.unwrap();
		assert!(catcher::store::account::get(&db, 1).await.unwrap().unwrap().is_started);
		super::toggle(&db, 1, false).await.unwrap();
		assert!(!catcher::store::account::get(&db, 1).await.unwrap().unwrap().is_started);

		assert!(super::toggle(&db, 2, true).await.is_err());
	}
}
