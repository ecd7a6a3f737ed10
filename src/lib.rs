//! `agrimate` library crate.
//!
//! The binary (`agrimate`) is a thin wrapper around this library so that:
//!
//! - estimation logic is testable without spawning processes
//! - modules are reusable (e.g., future GUI/daemon, batch scoring)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod estimate;
pub mod io;
pub mod math;
pub mod model;
pub mod plot;
pub mod report;
pub mod train;
pub mod tui;
