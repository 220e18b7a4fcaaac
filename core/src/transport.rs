/// why a recipient cannot be written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unreachable {
	Privacy,
	Blocked,
	Deactivated,
	DeactivatedBan,
	WriteForbidden,
}

impl std::fmt::Display for Unreachable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			Unreachable::Privacy => "privacy restricted",
			Unreachable::Blocked => "blocked us",
			Unreachable::Deactivated => "deactivated",
			Unreachable::DeactivatedBan => "deactivated and banned",
			Unreachable::WriteForbidden => "writing forbidden",
		})
	}
}

/// failure taxonomy driving the mailing retry policy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
	#[error("rate limited, must wait {0} seconds")]
	RateLimited(u64),

	#[error("sending is banned for this account")]
	Banned,

	#[error("recipient unreachable: {0}")]
	Unreachable(Unreachable),

	#[error("recipient identifier is invalid")]
	InvalidIdentifier,

	#[error("transport error: {0}")]
	Other(String),
}

impl SendError {
	/// classify a provider rpc error name, such as `FLOOD_WAIT_35` or `USER_IS_BLOCKED`
	pub fn from_rpc(name: &str) -> Self {
		let name = name.trim().to_ascii_uppercase();

		for prefix in ["FLOOD_WAIT_", "SLOWMODE_WAIT_", "FLOOD_PREMIUM_WAIT_"] {
			if let Some(secs) = name.strip_prefix(prefix) {
				return match secs.parse::<u64>() {
					Ok(secs) => SendError::RateLimited(secs),
					Err(_) => SendError::Other(name),
				};
			}
		}

		match name.as_str() {
			"PEER_FLOOD" => SendError::Banned,
			"USER_PRIVACY_RESTRICTED" => SendError::Unreachable(Unreachable::Privacy),
			"USER_IS_BLOCKED" => SendError::Unreachable(Unreachable::Blocked),
			"USER_DEACTIVATED" => SendError::Unreachable(Unreachable::Deactivated),
			"USER_DEACTIVATED_BAN" => SendError::Unreachable(Unreachable::DeactivatedBan),
			"CHAT_WRITE_FORBIDDEN" => SendError::Unreachable(Unreachable::WriteForbidden),
			"USERNAME_INVALID" | "USERNAME_NOT_OCCUPIED" | "PEER_ID_INVALID" => SendError::InvalidIdentifier,
			_ => SendError::Other(name),
		}
	}
}

/// public identity of a platform user, as far as mailing cares
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Profile {
	pub id: i64,
	#[serde(default)]
	pub username: Option<String>,
	#[serde(default)]
	pub first_name: Option<String>,
	#[serde(default)]
	pub last_name: Option<String>,
}

impl Profile {
	/// "first last", falling back to username, empty if neither is known
	pub fn display_name(&self) -> String {
		let parts : Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
			.into_iter()
			.flatten()
			.filter(|x| !x.is_empty())
			.collect();

		if parts.is_empty() {
			self.username.clone().unwrap_or_default()
		} else {
			parts.join(" ")
		}
	}
}

/// sending capability towards the chat platform
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
	/// deliver one text message to a recipient, addressed by username
	async fn send(&self, recipient: &str, text: &str) -> Result<(), SendError>;

	/// profile of the identity we are logged in as
	async fn me(&self) -> Result<Option<Profile>, SendError>;

	/// look up a username, `None` if nobody owns it
	async fn resolve(&self, username: &str) -> Result<Option<Profile>, SendError>;

	async fn is_authorized(&self) -> Result<bool, SendError>;
}
