pub mod api;
pub mod token;
pub mod user;

pub use api::{ApiResponse, LoginRequest, SignupRequest};
pub use token::TokenClaims;
pub use user::display_name;
