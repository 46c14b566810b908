//! HyperLab Core Library
//!
//! This crate provides the core functionality for hyperlab, a small remote
//! control utility for a Hyper-V host reached over SSH. It runs PowerShell
//! commands on the host, turns their table-shaped output into records and lets
//! an operator pick the virtual machine to act on.
//!
//! # Key Features
//!
//! - **Table Parsing**: Convert `Format-Table` style output into indexed records
//! - **Interactive Selection**: Render records and resolve an operator's choice
//! - **Remote Execution**: Run commands through the system `ssh` client
//! - **Host Configuration**: Load and validate the YAML host list
//! - **Wake-on-LAN**: Build and broadcast magic packets
//!
//! # Examples
//!
//! Parsing a VM listing and resolving a selection:
//!
//! ```
//! use hyperlab_core::selection::Selector;
//! use hyperlab_core::table::parse;
//!
//! let table = parse("Name State Status\n---- ----- ------\nvm1 Running Operating normally")?;
//! assert_eq!(table.records()[0].get("Status"), Some("OK"));
//!
//! let name = Selector::default().resolve(&table, "1")?;
//! assert_eq!(name, "vm1");
//! # Ok::<(), hyperlab_core::error::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod file_handling;
pub mod host_definitions;
pub mod interpolation;
pub mod network;
pub mod operations;
pub mod remote;
pub mod selection;
pub mod table;
pub mod wake;
pub mod workflow;
