pub mod logger;
pub mod value;
