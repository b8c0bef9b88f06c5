//! Cookie persistence for sticky sessions across invocations

pub mod jar;
pub mod record;

pub use jar::CookieJar;
pub use record::{CookieRecord, MAX_DATE};
