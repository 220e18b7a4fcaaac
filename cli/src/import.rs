use sea_orm::DatabaseConnection;

/// split `item - username` lines into recipients, returning lines that could not be parsed too
pub fn parse_recipients(text: &str) -> (Vec<(String, String)>, Vec<String>) {
	let mut recipients = Vec::new();
	let mut rejected = Vec::new();

	for line in text.lines().map(str::trim).filter(|x| !x.is_empty()) {
		let Some((item, username)) = line.rsplit_once('-') else {
			rejected.push(line.to_string());
			continue;
		};
		let username = username.trim().trim_start_matches('@');
		if username.is_empty() || username.contains(char::is_whitespace) {
			rejected.push(line.to_string());
			continue;
		}
		recipients.push((item.trim().to_string(), username.to_string()));
	}

	(recipients, rejected)
}

pub async fn import(db: &DatabaseConnection, account: i64, file: &std::path::Path) -> Result<(), crate::CliError> {
	crate::ensure_account(db, account).await?;

	let text = std::fs::read_to_string(file)?;
	let (recipients, rejected) = parse_recipients(&text);

	for line in &rejected {
		tracing::warn!("skipping malformed line: {line}");
	}

	let count = catcher::store::recipient::insert(db, account, recipients).await?;
	tracing::info!("imported {count} recipients for account #{account} ({} lines skipped)", rejected.len());

	Ok(())
}
