//! # Storefront Shared
//! 
//! Configuration, telemetry, constants, and error types shared by the
//! storefront session crates.

pub mod constants;
pub mod telemetry;
pub mod config;
pub mod error;

pub use error::AppError;
