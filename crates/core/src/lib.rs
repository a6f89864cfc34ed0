//! StayBNB Core - Shared domain types.
//!
//! This crate provides the types shared by every StayBNB component:
//! - `client` - Session/API client and view-state synchronizer
//! - `cli` - Command-line front-end that renders client state
//!
//! # Architecture
//!
//! The core crate contains only types and validation rules - no I/O, no
//! storage access, no HTTP clients. Anything here can be used from a test
//! without a runtime.
//!
//! # Modules
//!
//! - [`types`] - IDs, emails, user profiles, form validation, analysis results

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
