//! HyperLab CLI Library
//!
//! This crate provides the command-line interface for hyperlab. It parses the
//! task and global options, loads the host configuration, and runs each task
//! through a [`handlers::Session`] bound to the terminal.
//!
//! # Examples
//!
//! The CLI binary (`hlab`) can be used in several ways:
//!
//! ```bash
//! # Run every check on every configured host
//! hlab check-all
//!
//! # Pick a VM from the listing and start it
//! hlab --host atlas start
//!
//! # Act on a VM by name, skipping the listing
//! hlab --host atlas checkpoint web-01 --snapshot pre-upgrade
//!
//! # Show what would run without touching the host
//! hlab --dry-run restart
//! ```

pub mod cli_args;
pub mod handlers;
pub mod prompt;
