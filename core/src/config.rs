
#[serde_inline_default::serde_inline_default]
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, serde_default::DefaultFromSerde)]
pub struct Config {
	#[serde(default)]
	pub datasource: DatasourceConfig,

	#[serde(default)]
	pub cache: CacheConfig,

	#[serde(default)]
	pub bridge: BridgeConfig,

	#[serde(default)]
	pub mailing: MailingConfig,

	#[serde(default)]
	pub composer: ComposerConfig,

	#[serde(default)]
	pub schedule: ScheduleConfig,
}

#[serde_inline_default::serde_inline_default]
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, serde_default::DefaultFromSerde)]
pub struct DatasourceConfig {
	#[serde_inline_default("sqlite://./catcher.db?mode=rwc".into())]
	pub connection_string: String,

	#[serde_inline_default(32)]
	pub max_connections: u32,

	#[serde_inline_default(1)]
	pub min_connections: u32,

	#[serde_inline_default(90u64)]
	pub connect_timeout_seconds: u64,

	#[serde_inline_default(30u64)]
	pub acquire_timeout_seconds: u64,

	#[serde_inline_default(10u64)]
	pub slow_query_warn_seconds: u64,

	#[serde_inline_default(true)]
	pub slow_query_warn_enable: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
	#[default]
	Database,
	Memory,
}

#[serde_inline_default::serde_inline_default]
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, serde_default::DefaultFromSerde)]
pub struct CacheConfig {
	#[serde(default)]
	pub backend: CacheBackend,

	/// first segment of every cache key, followed by the session api hash
	#[serde_inline_default("catcher".into())]
	pub namespace: String,
}

#[serde_inline_default::serde_inline_default]
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, serde_default::DefaultFromSerde)]
pub struct BridgeConfig {
	/// base url of the session gateway speaking the chat platform protocol
	#[serde_inline_default("http://127.0.0.1:8081".into())]
	pub url: String,

	#[serde_inline_default(60u64)]
	pub timeout_seconds: u64,
}

#[serde_inline_default::serde_inline_default]
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, serde_default::DefaultFromSerde)]
pub struct MailingConfig {
	#[serde_inline_default(200u64)]
	pub interval_min_seconds: u64,

	#[serde_inline_default(400u64)]
	pub interval_max_seconds: u64,

	#[serde_inline_default(6.0)]
	pub base_delay_min_seconds: f64,

	#[serde_inline_default(12.0)]
	pub base_delay_max_seconds: f64,

	/// gap between the two halves of a split message
	#[serde_inline_default(0.8)]
	pub part_delay_min_seconds: f64,

	#[serde_inline_default(1.6)]
	pub part_delay_max_seconds: f64,

	#[serde_inline_default(2usize)]
	pub cooldown_every: usize,

	#[serde_inline_default(45.0)]
	pub cooldown_min_seconds: f64,

	#[serde_inline_default(120.0)]
	pub cooldown_max_seconds: f64,

	#[serde_inline_default(3u32)]
	pub max_attempts: u32,

	/// multiplied by the attempt number
	#[serde_inline_default(5.0)]
	pub retry_backoff_seconds: f64,

	#[serde_inline_default(3u64)]
	pub flood_jitter_min_seconds: u64,

	#[serde_inline_default(12u64)]
	pub flood_jitter_max_seconds: u64,
}

#[serde_inline_default::serde_inline_default]
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, serde_default::DefaultFromSerde)]
pub struct ComposerConfig {
	/// used in place of a blank item name
	#[serde_inline_default("товар".into())]
	pub default_item: String,

	/// greetings are picked by local time of day at this offset
	#[serde_inline_default(3i32)]
	pub utc_offset_hours: i32,

	#[serde_inline_default(0.5)]
	pub split_greeting_chance: f64,

	#[serde_inline_default(0.75)]
	pub follow_up_chance: f64,

	#[serde_inline_default(0.5)]
	pub split_follow_up_chance: f64,

	#[serde_inline_default(0.4)]
	pub closing_only_chance: f64,

	#[serde_inline_default(0.7)]
	pub question_mark_chance: f64,
}

#[serde_inline_default::serde_inline_default]
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, serde_default::DefaultFromSerde)]
pub struct ScheduleConfig {
	#[serde_inline_default(15u64)]
	pub jobs_poll_seconds: u64,

	#[serde_inline_default(3 * 60 * 60)]
	pub profile_refresh_seconds: u64,
}

impl Config {
	pub fn load(path: Option<&std::path::PathBuf>) -> Self {
		let Some(cfg_path) = path else { return Config::default() };
		match std::fs::read_to_string(cfg_path) {
			Ok(x) => match toml::from_str(&x) {
				Ok(cfg) => return cfg,
				Err(e) => tracing::error!("failed parsing config file: {e}"),
			},
			Err(e) => tracing::error!("failed reading config file: {e}"),
		}
		Config::default()
	}
}

impl MailingConfig {
	/// bounds for the randomized pause between mailing runs, never below one minute
	pub fn interval_bounds(&self) -> (u64, u64) {
		let min = self.interval_min_seconds.max(60);
		let max = self.interval_max_seconds.max(min);
		(min, max)
	}
}
