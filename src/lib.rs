//! Library crate for userlist-tui.
//!
//! This crate exposes the building blocks of the TUI:
//! - Users API trait, HTTP and in-memory backends (`api`)
//! - Application state, fetch cycles and the update loop (`app`)
//! - Command-line configuration (`config`)
//! - Error and result types (`error`)
//! - Offset/limit page arithmetic (`pagination`)
//! - Filter matching for in-memory data (`search`)
//! - UI rendering (`ui`)
//!
//! It is used by the `userlist-tui` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod pagination;
pub mod search;
pub mod ui;

/// Convenient error and result types shared across the crate.
pub use error::{ApiError, DynError, Result};
