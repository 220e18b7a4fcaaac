use sea_orm::DatabaseConnection;

pub async fn status(db: &DatabaseConnection, account: i64) -> Result<(), crate::CliError> {
	let row = crate::ensure_account(db, account).await?;
	let pending = catcher::store::recipient::count_pending(db, account).await?;
	let sent = catcher::store::recipient::count_sent(db, account).await?;

	tracing::info!(
		"account #{} '{}' ({}): started {}, connected {}, batch {}, pending {pending}, sent {sent}",
		row.id, row.name.as_deref().unwrap_or("?"), row.path_session,
		row.is_started, row.is_connected, row.batch_size,
	);

	Ok(())
}

pub async fn jobs(db: &DatabaseConnection, account: i64) -> Result<(), crate::CliError> {
	crate::ensure_account(db, account).await?;

	for job in catcher::store::job::list(db, account).await? {
		let answer = job.answer
			.as_deref()
			.map(String::from_utf8_lossy)
			.unwrap_or_else(|| "(unanswered)".into());
		tracing::info!("job #{} {}: {answer}", job.id, job.name);
	}

	Ok(())
}
