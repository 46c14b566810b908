//! Configuration path utilities and defaults for hyperlab.
//!
//! This module provides functions for resolving the host configuration path
//! and the fallback values used when the configuration leaves a setting out.

/// Default path for the host configuration file
const DEFAULT_CONFIG_PATH: &str = "~/.hyperlab/hosts.yml";

/// Program used to open remote sessions
pub const DEFAULT_SSH_PROGRAM: &str = "ssh";

/// Broadcast address wake packets are sent to
pub const DEFAULT_BROADCAST: &str = "255.255.255.255";

/// UDP port wake packets are sent to (discard)
pub const DEFAULT_WAKE_PORT: u16 = 9;

/// Resolves the host configuration file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// configuration path. Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use hyperlab_core::config::get_config_path;
///
/// // Use default path
/// let default_path = get_config_path(&None);
///
/// // Use custom path
/// let custom_path = get_config_path(&Some("/path/to/hosts.yml".to_string()));
/// assert_eq!(custom_path, "/path/to/hosts.yml");
/// ```
pub fn get_config_path(config_path_arg: &Option<String>) -> String {
    let config_path = match config_path_arg {
        Some(config_path) => config_path,
        None => DEFAULT_CONFIG_PATH,
    };

    shellexpand::tilde(config_path).to_string()
}
