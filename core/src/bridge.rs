use crate::config::BridgeConfig;
use crate::transport::{Profile, SendError, Transport};

#[derive(Debug, Clone, serde::Serialize)]
pub struct Session {
	pub path_session: String,
	pub api_id: i64,
	pub api_hash: String,
}

#[derive(Debug, serde::Deserialize)]
struct Envelope<T> {
	ok: bool,
	result: Option<T>,
	error: Option<String>,
}

impl<T> Envelope<T> {
	fn into_result(self) -> Result<Option<T>, SendError> {
		if self.ok {
			return Ok(self.result);
		}
		match self.error {
			Some(name) => Err(SendError::from_rpc(&name)),
			None => Err(SendError::Other("gateway refused request without reason".into())),
		}
	}
}

#[derive(Debug, serde::Deserialize)]
struct SessionState {
	authorized: bool,
}

/// transport backed by an http session gateway, which answers `{ ok, result, error }`
pub struct Bridge {
	client: reqwest::Client,
	base: String,
	session: Session,
}

impl From<reqwest::Error> for SendError {
	fn from(value: reqwest::Error) -> Self {
		SendError::Other(format!("gateway request failed: {value}"))
	}
}

impl Bridge {
	pub fn new(cfg: &BridgeConfig, session: Session) -> Result<Self, reqwest::Error> {
		let client = reqwest::Client::builder()
			.timeout(std::time::Duration::from_secs(cfg.timeout_seconds))
			.user_agent(format!("catcher/{}", crate::VERSION))
			.build()?;

		Ok(Bridge {
			client,
			base: cfg.url.trim_end_matches('/').to_string(),
			session,
		})
	}

	fn url(&self, path: &str) -> String {
		format!("{}/{path}", self.base)
	}

	async fn decode<T: serde::de::DeserializeOwned>(res: reqwest::Response) -> Result<Option<T>, SendError> {
		let status = res.status();
		let body = res.text().await?;
		match serde_json::from_str::<Envelope<T>>(&body) {
			Ok(envelope) => envelope.into_result(),
			Err(e) => Err(SendError::Other(format!("gateway answered {status} with malformed body: {e}"))),
		}
	}
}

#[async_trait::async_trait]
impl Transport for Bridge {
	async fn send(&self, recipient: &str, text: &str) -> Result<(), SendError> {
		let res = self.client
			.post(self.url("send"))
			.json(&serde_json::json!({
				"session": self.session.path_session,
				"peer": recipient,
				"text": text,
			}))
			.send()
			.await?;

		Self::decode::<serde_json::Value>(res).await?;
		Ok(())
	}

	async fn me(&self) -> Result<Option<Profile>, SendError> {
		let res = self.client
			.get(self.url("me"))
			.query(&[("session", self.session.path_session.as_str())])
			.send()
			.await?;

		Self::decode(res).await
	}

	async fn resolve(&self, username: &str) -> Result<Option<Profile>, SendError> {
		let res = self.client
			.get(self.url("resolve"))
			.query(&[("session", self.session.path_session.as_str()), ("username", username)])
			.send()
			.await?;

		match Self::decode(res).await {
			Err(SendError::InvalidIdentifier) => Ok(None),
			x => x,
		}
	}

	async fn is_authorized(&self) -> Result<bool, SendError> {
		let res = self.client
			.post(self.url("session"))
			.json(&self.session)
			.send()
			.await?;

		Ok(
			Self::decode::<SessionState>(res)
				.await?
				.is_some_and(|x| x.authorized)
		)
	}
}
