//! Command-line argument parsing.
//!
//! This module defines the command-line interface structure using the `clap`
//! crate. Global options select the configuration, the target host and how
//! cautious to be; the subcommand names the task to run.

use clap::{Parser, Subcommand};

/// Command-line arguments for the `hlab` binary.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use hyperlab_cli::cli_args::{Args, Task};
///
/// let args = Args::parse_from(["hlab", "--host", "atlas", "start", "web-01"]);
/// assert_eq!(args.host.as_deref(), Some("atlas"));
/// assert_eq!(args.task, Task::Start { vm: Some("web-01".to_string()) });
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(name = "hlab", term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Path to the host configuration YAML.
    ///
    /// If not provided, defaults to `~/.hyperlab/hosts.yml`.
    #[arg(long, short = 'c', global = true)]
    pub config_path: Option<String>,

    /// ID of the host to act on.
    ///
    /// Queries run against every configured host when omitted. If the config
    /// file does not exist, this is used as the SSH destination directly.
    #[arg(long, short = 'H', global = true)]
    pub host: Option<String>,

    /// Print state-changing remote commands instead of running them.
    ///
    /// Read-only queries, including the VM listing used for selection, still run.
    #[arg(long, short = 'd', action, global = true)]
    pub dry_run: bool,

    /// Skip the confirmation prompt for stop, shutdown and restart.
    #[arg(long, short = 'f', action, global = true)]
    pub force: bool,

    /// How many answers the VM selection prompt accepts before giving up.
    #[arg(long, default_value_t = 1, global = true)]
    pub attempts: usize,

    #[command(subcommand)]
    pub task: Task,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Check that each host accepts a remote session
    CheckConnectivity,
    /// Show used and free space on drive C
    CheckDiskSpace,
    /// Show time since last boot
    CheckUptime,
    /// Run all checks
    CheckAll,
    /// Show IPv4 addresses per interface
    Network {
        /// Print JSON instead of text
        #[arg(long, action)]
        json: bool,
    },
    /// List virtual machines
    ListVms,
    /// Start a virtual machine
    Start {
        /// VM name; prompts with the VM list when omitted
        vm: Option<String>,
    },
    /// Stop a virtual machine
    Stop {
        /// VM name; prompts with the VM list when omitted
        vm: Option<String>,
    },
    /// Save the state of a virtual machine
    Save {
        /// VM name; prompts with the VM list when omitted
        vm: Option<String>,
    },
    /// Create a checkpoint of a virtual machine
    Checkpoint {
        /// VM name; prompts with the VM list when omitted
        vm: Option<String>,

        /// Name for the checkpoint; Hyper-V picks one when omitted
        #[arg(long, short = 's')]
        snapshot: Option<String>,
    },
    /// Shut the host down
    Shutdown,
    /// Restart the host
    Restart,
    /// Send a Wake-on-LAN packet to the host
    Wake,
}
