pub mod error;
pub mod scheduler;
pub mod mailing;
pub mod jobs;
pub mod profile;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{WorkerError, WorkerResult};

use catcher::{ext::LoggableError, Context};
use scheduler::Every;

/// start mailing, job answering and profile refresh timers, each on its own task
pub fn spawn(ctx: Context, stop: impl StopToken) -> Vec<tokio::task::JoinHandle<()>> {
	let (min, max) = ctx.cfg().mailing.interval_bounds();
	let jobs_every = std::time::Duration::from_secs(ctx.cfg().schedule.jobs_poll_seconds);
	let profile_every = std::time::Duration::from_secs(ctx.cfg().schedule.profile_refresh_seconds);

	let _ctx = ctx.clone();
	let mailing = scheduler::periodic("mailing", Every::Between(min, max), stop.clone(), move || {
		let ctx = _ctx.clone();
		async move {
			mailing::mailing(&ctx)
				.await
				.err_failed("mailing run failed");
		}
	});

	let _ctx = ctx.clone();
	let jobs = scheduler::periodic("jobs", Every::Fixed(jobs_every), stop.clone(), move || {
		let ctx = _ctx.clone();
		async move {
			jobs::process_jobs(&ctx)
				.await
				.err_failed("failed answering jobs");
		}
	});

	let profile = scheduler::periodic("profile", Every::Fixed(profile_every), stop, move || {
		let ctx = ctx.clone();
		async move {
			profile::update_account_name(&ctx)
				.await
				.warn_failed("could not refresh account name");
		}
	});

	vec![mailing, jobs, profile]
}

pub trait StopToken: Clone + Sync + Send + 'static {
	fn stop(&self) -> bool;
	fn wait(&mut self) -> impl std::future::Future<Output = ()> + std::marker::Send;
}
