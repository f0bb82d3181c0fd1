//! Library exports for eshop-session, shared between the binary and tests.

pub mod auth;
pub mod config;
pub mod cookie;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
pub mod utils;
