pub mod config;
pub mod context;
pub mod model;
pub mod store;
pub mod ext;

pub mod cache;
pub mod identity;
pub mod composer;

pub mod transport;
pub mod bridge;

pub use context::Context;
pub use config::Config;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
