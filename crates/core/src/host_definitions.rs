use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_BROADCAST, DEFAULT_SSH_PROGRAM, DEFAULT_WAKE_PORT};
use crate::error::{Error, Result};
use crate::selection::{Selector, DEFAULT_IDENTIFIER_COLUMN};
use crate::table::{default_status_rules, StatusRule, TableParser};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HostDefinition {
    pub id: String,
    pub address: Option<String>,
    pub user: Option<String>,
    pub mac_address: Option<String>,
    pub broadcast: Option<String>,
    pub wake_port: Option<u16>,
}

impl HostDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: None,
            user: None,
            mac_address: None,
            broadcast: None,
            wake_port: None,
        }
    }

    /// Network address to connect to, falling back to the ID.
    #[must_use]
    pub fn address(&self) -> &str {
        self.address.as_deref().unwrap_or(&self.id)
    }

    /// SSH destination, `user@address` when a user is configured.
    #[must_use]
    pub fn destination(&self) -> String {
        match &self.user {
            Some(user) => format!("{user}@{}", self.address()),
            None => self.address().to_string(),
        }
    }

    #[must_use]
    pub fn broadcast(&self) -> &str {
        self.broadcast.as_deref().unwrap_or(DEFAULT_BROADCAST)
    }

    #[must_use]
    pub fn wake_port(&self) -> u16 {
        self.wake_port.unwrap_or(DEFAULT_WAKE_PORT)
    }
}

impl Display for HostDefinition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.id)?;

        if self.address() != self.id {
            write!(formatter, " ({})", self.address())?;
        }

        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HostsConfig {
    pub hosts: Vec<HostDefinition>,
    pub ssh_program: Option<String>,
    pub connect_timeout: Option<u32>,
    pub identifier_column: Option<String>,
    #[serde(default)]
    pub strict_separator: bool,
    #[serde(default)]
    pub status_rules: Vec<StatusRule>,
}

impl HostsConfig {
    /// Configuration for one host with every other setting left at its default.
    pub fn single_host(id: impl Into<String>) -> Self {
        Self {
            hosts: vec![HostDefinition::new(id)],
            ssh_program: None,
            connect_timeout: None,
            identifier_column: None,
            strict_separator: false,
            status_rules: Vec::new(),
        }
    }

    #[must_use]
    pub fn ssh_program(&self) -> &str {
        self.ssh_program.as_deref().unwrap_or(DEFAULT_SSH_PROGRAM)
    }

    /// The default status rules followed by any configured ones not already covered.
    #[must_use]
    pub fn effective_status_rules(&self) -> Vec<StatusRule> {
        let mut rules = default_status_rules();

        for rule in &self.status_rules {
            if !rules.iter().any(|existing| existing.phrase == rule.phrase) {
                rules.push(rule.clone());
            }
        }

        rules
    }

    #[must_use]
    pub fn table_parser(&self) -> TableParser {
        TableParser::new(self.effective_status_rules(), self.strict_separator)
    }

    #[must_use]
    pub fn selector(&self, max_attempts: usize) -> Selector {
        let column = self
            .identifier_column
            .as_deref()
            .unwrap_or(DEFAULT_IDENTIFIER_COLUMN);

        Selector::new(column).with_max_attempts(max_attempts)
    }

    /// Hosts to act on: the named one, or all of them in configured order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HostNotFound`] if `host_id` does not name a configured host.
    pub fn select_hosts(&self, host_id: Option<&str>) -> Result<Vec<&HostDefinition>> {
        match host_id {
            Some(host_id) => Ok(vec![self.find_host(host_id)?]),
            None => Ok(self.hosts.iter().collect()),
        }
    }

    /// The one host an interactive or state-changing operation should target.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HostNotFound`] for an unknown ID, or [`Error::AmbiguousHost`]
    /// if no ID is given and more than one host is configured.
    pub fn single_target(&self, host_id: Option<&str>) -> Result<&HostDefinition> {
        if let Some(host_id) = host_id {
            return self.find_host(host_id);
        }

        match self.hosts.as_slice() {
            [host] => Ok(host),
            hosts => Err(Error::AmbiguousHost(
                hosts.iter().map(|h| h.id.clone()).collect(),
            )),
        }
    }

    fn find_host(&self, host_id: &str) -> Result<&HostDefinition> {
        self.hosts
            .iter()
            .find(|host| host.id == host_id)
            .ok_or_else(|| Error::HostNotFound(host_id.to_string()))
    }
}
