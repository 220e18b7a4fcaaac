pub mod account;
pub mod recipient;
pub mod texts;
pub mod job;
