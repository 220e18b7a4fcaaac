use catcher::{identity, store, Context};

use crate::WorkerResult;

/// store the logged in identity's display name on the account row, true if it changed
pub async fn update_account_name(ctx: &Context) -> WorkerResult<bool> {
	let Some(account_id) = identity::account_id(ctx).await else {
		return Ok(false);
	};

	let Some(account) = store::account::get(ctx.db(), account_id).await? else {
		return Ok(false);
	};

	let Some(me) = ctx.transport().me().await? else {
		tracing::debug!("session has no profile, not refreshing name");
		return Ok(false);
	};

	let name = me.display_name();
	let name = name.trim();
	if name.is_empty() || account.name.as_deref() == Some(name) {
		return Ok(false);
	}

	store::account::set_name(ctx.db(), account.id, name).await?;
	tracing::info!("account #{} is now known as '{name}'", account.id);
	Ok(true)
}
