pub mod claims;
pub mod cookie;
pub mod token;
