//! Core business logic for famfeed.
//!
//! Services sit between the HTTP handlers and the repositories: they own
//! validation, the author capability check and the media store bookkeeping.

pub mod services;

pub use services::*;
