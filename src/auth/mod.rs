pub mod client;
pub mod navigator;
pub mod token;

pub use client::AuthClient;
pub use navigator::{LogNavigator, Navigator};
pub use token::{current_timestamp, decode_claims, parse_token};
