//! Library crate for useradmin.
//!
//! This crate exposes the building blocks of the TUI:
//! - User record model and validation (`model`)
//! - REST client for the users service (`api`)
//! - Application state, request orchestration and update loop (`app`)
//! - Command-line options and config file locations (`config`)
//! - Error and result types (`error`)
//! - Client-side search (`search`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `useradmin` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod model;
pub mod search;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
