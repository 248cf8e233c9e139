//! # podcraft-builder
//!
//! Builds, cleans, and tests pods of application container images.
//!
//! Handles:
//! - **Pod**: the orchestrator that turns a pod manifest into one build
//!   unit per app and drives build, clean, and test across them.
//! - **Unit**: the contract between the pod and a per-app image builder.
//! - **Aci**: the shipped image builder (assembly, packaging, fingerprints,
//!   test scripts).
//! - **Event**: lifecycle events and the reporter they are delivered to.
//!
//! # Example
//!
//! ```rust,no_run
//! use podcraft_builder::pod::Pod;
//! use podcraft_common::config::BuildArgs;
//!
//! let args = BuildArgs { zip: true, ..BuildArgs::new("./web") };
//! let pod = Pod::open("./web", args)?;
//! pod.build()?;
//! # Ok::<(), podcraft_builder::error::PodError>(())
//! ```

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod aci;
pub mod error;
pub mod event;
pub mod pod;
pub mod unit;
