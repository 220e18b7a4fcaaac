use crate::{cache::CacheResult, Context};

/// cache key holding the bound account id, readable by anyone sharing the namespace
pub const ACCOUNT_ID_KEY: &str = "account_id";

/// find the account owning `path_session` and remember its id, `None` if it is not registered
pub async fn bind(ctx: &Context, path_session: &str) -> CacheResult<Option<i64>> {
	let Some(id) = crate::store::account::id_by_session(ctx.db(), path_session).await? else {
		tracing::warn!("no account registered for session '{path_session}'");
		return Ok(None);
	};
	ctx.storage().set(ACCOUNT_ID_KEY, &id, None).await?;
	tracing::info!("bound session '{path_session}' to account #{id}");
	Ok(Some(id))
}

/// currently bound account id, accepting both numbers and numeric strings
pub async fn account_id(ctx: &Context) -> Option<i64> {
	let value = match ctx.storage().get::<serde_json::Value>(ACCOUNT_ID_KEY).await {
		Ok(Some(x)) => x,
		Ok(None) => return None,
		Err(e) => {
			tracing::warn!("could not read bound account id: {e}");
			return None;
		},
	};

	let id = match value {
		serde_json::Value::Number(ref n) => n.as_i64(),
		serde_json::Value::String(ref s) => s.trim().parse().ok(),
		_ => None,
	};

	if id.is_none() {
		tracing::warn!("ignoring malformed bound account id: {value}");
	}

	id
}
