use std::collections::BTreeMap;

use catcher::{
	identity,
	model::{self, job::JobName},
	store,
	transport::{Profile, SendError},
	Context,
};

use crate::{WorkerError, WorkerResult};

/// how many requests are answered per tick
pub const JOBS_PER_TICK: u64 = 50;

/// answer pending requests for the bound account, returns how many were answered
pub async fn process_jobs(ctx: &Context) -> WorkerResult<usize> {
	let Some(account) = identity::account_id(ctx).await else {
		return Ok(0);
	};

	let jobs = store::job::unanswered(ctx.db(), account, &JobName::SERVED, JOBS_PER_TICK).await?;
	let mut answered = 0;

	for job in jobs {
		let Some(kind) = job.kind() else { continue };
		let result = match kind {
			JobName::AccountInfo => account_info(ctx).await,
			JobName::ResolveUsernames => resolve_usernames(ctx, &job).await,
			JobName::MailingStats => mailing_stats(ctx, account).await,
			JobName::MailingFinished => continue,
		};

		let envelope = match result {
			Ok(result) => serde_json::json!({ "ok": true, "result": result }),
			Err(WorkerError::Send(SendError::RateLimited(secs))) => {
				tracing::warn!("rate limited answering job #{}, retrying next tick (wait {secs}s)", job.id);
				break;
			},
			Err(WorkerError::Database(e)) => return Err(WorkerError::Database(e)),
			Err(e) => {
				tracing::warn!("job #{} ({kind}) failed: {e}", job.id);
				serde_json::json!({ "ok": false, "error": e.to_string() })
			},
		};

		store::job::answer(ctx.db(), job.id, serde_json::to_vec(&envelope)?).await?;
		tracing::debug!("answered job #{} ({kind})", job.id);
		answered += 1;
	}

	Ok(answered)
}

async fn account_info(ctx: &Context) -> WorkerResult<serde_json::Value> {
	Ok(serde_json::to_value(ctx.transport().me().await?)?)
}

async fn resolve_usernames(ctx: &Context, job: &model::job::Model) -> WorkerResult<serde_json::Value> {
	let mdata = job.mdata.as_deref().ok_or(WorkerError::MissingPayload)?;
	let usernames : Vec<String> = serde_json::from_slice(mdata)?;

	let mut resolved : BTreeMap<String, Option<Profile>> = BTreeMap::new();
	for username in usernames {
		let handle = username.trim().trim_start_matches('@');
		let profile = match ctx.transport().resolve(handle).await {
			Ok(x) => x,
			Err(SendError::InvalidIdentifier) | Err(SendError::Unreachable(_)) => None,
			Err(e) => return Err(e.into()),
		};
		resolved.insert(username, profile);
	}

	Ok(serde_json::to_value(resolved)?)
}

async fn mailing_stats(ctx: &Context, account: i64) -> WorkerResult<serde_json::Value> {
	Ok(serde_json::json!({
		"pending": store::recipient::count_pending(ctx.db(), account).await?,
		"sent": store::recipient::count_sent(ctx.db(), account).await?,
	}))
}

#[cfg(test)]
mod test {
	use std::sync::Arc;

	use sea_orm::{ActiveModelTrait, EntityTrait};

	use crate::testing::{setup, Scripted};
	use super::*;

	async fn answer_of(ctx: &Context, id: i64) -> Option<serde_json::Value> {
		model::job::Entity::find_by_id(id)
			.one(ctx.db())
			.await
			.unwrap()
			.unwrap()
			.answer
			.map(|x| serde_json::from_slice(&x).unwrap())
	}

	#[tokio::test]
	async fn served_jobs_are_answered_in_envelopes() {
		let transport = Arc::new(Scripted::default());
		transport.set_me(Some(Profile { id: 7, username: Some("seller".into()), first_name: Some("Anna".into()), last_name: None }));
		transport.set_resolve("alice", Ok(Some(Profile { id: 1, username: Some("alice".into()), ..Default::default() })));
		let (ctx, account) = setup(transport.clone(), &["x", "y"], 5).await;
		store::recipient::mark_sent(ctx.db(), 1).await.unwrap();

		let info = store::job::enqueue(ctx.db(), account, JobName::AccountInfo, None).await.unwrap();
		let resolve = store::job::enqueue(ctx.db(), account, JobName::ResolveUsernames, Some(br#"["alice","@ghost"]"#.to_vec())).await.unwrap();
		let stats = store::job::enqueue(ctx.db(), account, JobName::MailingStats, None).await.unwrap();
		let finished = store::job::enqueue(ctx.db(), account, JobName::MailingFinished, None).await.unwrap();
		let unknown = model::job::ActiveModel {
			id: sea_orm::ActiveValue::NotSet,
			account_id: sea_orm::ActiveValue::Set(account),
			name: sea_orm::ActiveValue::Set("reticulate_splines".into()),
			mdata: sea_orm::ActiveValue::Set(None),
			answer: sea_orm::ActiveValue::Set(None),
		}
			.insert(ctx.db())
			.await
			.unwrap();

		assert_eq!(process_jobs(&ctx).await.unwrap(), 3);

		let info = answer_of(&ctx, info.id).await.unwrap();
		assert_eq!(info["ok"], true);
		assert_eq!(info["result"]["first_name"], "Anna");

		let resolve = answer_of(&ctx, resolve.id).await.unwrap();
		assert_eq!(resolve["result"]["alice"]["id"], 1);
		assert!(resolve["result"]["@ghost"].is_null());

		let stats = answer_of(&ctx, stats.id).await.unwrap();
		assert_eq!(stats["result"], serde_json::json!({ "pending": 1, "sent": 1 }));

		assert!(answer_of(&ctx, finished.id).await.is_none());
		assert!(answer_of(&ctx, unknown.id).await.is_none());

		assert_eq!(process_jobs(&ctx).await.unwrap(), 0);
	}

	#[tokio::test]
	async fn malformed_payload_is_answered_with_error() {
		let transport = Arc::new(Scripted::default());
		let (ctx, account) = setup(transport.clone(), &[], 5).await;
		let missing = store::job::enqueue(ctx.db(), account, JobName::ResolveUsernames, None).await.unwrap();
		let broken = store::job::enqueue(ctx.db(), account, JobName::ResolveUsernames, Some(b"{".to_vec())).await.unwrap();

		assert_eq!(process_jobs(&ctx).await.unwrap(), 2);
		assert_eq!(answer_of(&ctx, missing.id).await.unwrap()["ok"], false);
		assert_eq!(answer_of(&ctx, broken.id).await.unwrap()["ok"], false);
	}

	#[tokio::test]
	async fn rate_limit_stops_the_tick() {
		let transport = Arc::new(Scripted::default());
		transport.set_resolve("slow", Err(SendError::RateLimited(30)));
		let (ctx, account) = setup(transport.clone(), &[], 5).await;
		let resolve = store::job::enqueue(ctx.db(), account, JobName::ResolveUsernames, Some(br#"["slow"]"#.to_vec())).await.unwrap();
		let stats = store::job::enqueue(ctx.db(), account, JobName::MailingStats, None).await.unwrap();

		assert_eq!(process_jobs(&ctx).await.unwrap(), 0);
		assert!(answer_of(&ctx, resolve.id).await.is_none());
		assert!(answer_of(&ctx, stats.id).await.is_none());
	}
}
