//! Centralized error handling for the IPTV addon
//!
//! Errors fall into two tiers. Configuration errors are fatal and surface from
//! `main`. Everything raised while serving a request or refreshing the EPG is
//! a [`SourceError`] or [`AppError`] that the service layer turns into a
//! degraded response instead of propagating it to the caller.
//!
//! # Usage
//!
//! ```rust
//! use iptv_addon::errors::{AppError, AppResult};
//!
//! fn require(value: Option<&str>) -> AppResult<&str> {
//!     value.ok_or_else(|| AppError::configuration("value missing"))
//! }
//!
//! assert!(require(None).is_err());
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;
