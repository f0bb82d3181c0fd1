pub mod escape;
pub mod jar;

pub use escape::{escape, unescape};
pub use jar::{CookieEntry, CookieJar};
