pub mod token;

pub use token::{create_token, verify_token, SessionClaims, TokenConfig};
