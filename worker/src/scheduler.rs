use std::time::Duration;

use rand::Rng;

use crate::StopToken;

/// pause before each run of a periodic task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Every {
	Fixed(Duration),
	/// uniformly random amount of seconds, bounds included
	Between(u64, u64),
}

impl Every {
	pub fn next(&self) -> Duration {
		match *self {
			Every::Fixed(x) => x,
			Every::Between(a, b) => {
				let (min, max) = (a.min(b), a.max(b));
				Duration::from_secs(rand::rng().random_range(min..=max))
			},
		}
	}
}

/// run `task` forever, sleeping before every run, until `stop` fires.
/// runs never overlap: the next pause starts only after the task returned.
/// a run still in flight when `stop` fires is dropped
pub fn periodic<S, F, Fut>(name: &'static str, every: Every, mut stop: S, mut task: F) -> tokio::task::JoinHandle<()>
where
	S: StopToken,
	F: FnMut() -> Fut + Send + 'static,
	Fut: std::future::Future<Output = ()> + Send + 'static,
{
	tokio::spawn(async move {
		tracing::info!("starting {name} timer");
		loop {
			if stop.stop() { break }
			let pause = every.next();
			tracing::debug!("next {name} run in {}s", pause.as_secs());
			tokio::select! {
				_ = tokio::time::sleep(pause) => {},
				_ = stop.wait() => break,
			}
			tokio::select! {
				_ = task() => {},
				_ = stop.wait() => break,
			}
		}
		tracing::info!("{name} timer stopped");
	})
}
