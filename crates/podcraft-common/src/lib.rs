//! # podcraft-common
//!
//! Shared build configuration, error definitions, constants, and domain
//! primitives used across the podcraft workspace.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate and provides the types every other crate builds upon.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
