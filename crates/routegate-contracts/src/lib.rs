//! # routegate-contracts
//!
//! Shared types, errors, and path helpers for the routegate authorization
//! layer.
//!
//! All crates in the workspace import from here. No decision logic lives in
//! this crate, only data definitions, the error type, and path
//! normalization.

pub mod capability;
pub mod decision;
pub mod error;
pub mod path;
pub mod record;
