pub mod account;
pub mod username;

pub mod account_texts;
pub mod text;

pub mod job;
pub mod cache_entry;
