//! Loading and validation of the host configuration file.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use log::debug;

use crate::error::Error::{EmptyId, IdWithSpace, NonUniqueHostId};
use crate::error::{Error, Result};
use crate::host_definitions::{HostDefinition, HostsConfig};
use crate::table::validate_status_rules;
use crate::wake::MacAddress;

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    match File::open(path) {
        Ok(reader) => Ok(reader),
        Err(e) => Err(Error::io_error(
            file_description.to_string(),
            path.to_string(),
            e,
        )),
    }
}

fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(EmptyId);
    }

    if id.contains(char::is_whitespace) {
        return Err(IdWithSpace(id.to_string()));
    }

    Ok(())
}

fn validate_hosts(hosts: &[HostDefinition]) -> Result<()> {
    let mut ids = HashSet::new();

    for host in hosts {
        validate_id(&host.id)?;

        if !ids.insert(host.id.clone()) {
            // Found a duplicate ID
            return Err(NonUniqueHostId(host.id.clone()));
        }

        if let Some(mac_address) = &host.mac_address {
            mac_address.parse::<MacAddress>()?;
        }
    }

    Ok(())
}

/// Checks a parsed configuration the same way [`get_hosts_config`] does.
///
/// # Errors
///
/// Returns an error if there are no hosts, a host ID is empty, contains
/// whitespace or is repeated, a MAC address is malformed, or the status
/// rules could change a line on a second application.
pub fn validate_config(config: &HostsConfig, config_path: &str) -> Result<()> {
    if config.hosts.is_empty() {
        return Err(Error::NoHosts {
            path: config_path.to_string(),
        });
    }

    validate_hosts(&config.hosts)?;
    validate_status_rules(&config.effective_status_rules())
}

/// Loads and validates the host configuration from a YAML file.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration file cannot be read
/// - The YAML is malformed or doesn't match the expected structure
/// - Validation fails (see [`validate_config`])
///
/// # Examples
///
/// ```no_run
/// use hyperlab_core::file_handling::get_hosts_config;
///
/// let config = get_hosts_config("/home/me/.hyperlab/hosts.yml")?;
/// println!("Loaded {} hosts", config.hosts.len());
/// # Ok::<(), hyperlab_core::error::Error>(())
/// ```
pub fn get_hosts_config(config_path: &str) -> Result<HostsConfig> {
    let config_reader = get_reader("config", config_path)?;

    let config: HostsConfig = serde_yaml::from_reader(config_reader).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "config".to_string(),
            config_path.to_string(),
            e,
        )
    })?;

    validate_config(&config, config_path)?;

    debug!(
        "Loaded {} host(s) from `{}`",
        config.hosts.len(),
        config_path
    );

    Ok(config)
}

/// Loads the configuration, or builds a single-host one when the file does not
/// exist and a host was named explicitly.
///
/// # Errors
///
/// See [`get_hosts_config`].
pub fn get_hosts_config_or_single(config_path: &str, host_id: Option<&str>) -> Result<HostsConfig> {
    match host_id {
        Some(host_id) if !Path::new(config_path).exists() => {
            debug!("No config at `{config_path}`, using host `{host_id}` with defaults");
            let config = HostsConfig::single_host(host_id);
            validate_config(&config, config_path)?;
            Ok(config)
        }
        _ => get_hosts_config(config_path),
    }
}
