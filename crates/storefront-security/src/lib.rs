//! # Storefront Security
//! 
//! Session token generation and session cookie handling.

pub mod token;
pub mod cookie;

pub use cookie::{read_cookie, SessionCookie};
pub use token::{generate_session_token, is_well_formed_token, storage_key};
