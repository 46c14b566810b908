//! Reshaping of `Get-NetIPAddress | ConvertTo-Json` output into a per-interface report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
struct NetIpAddress {
    interface_alias: String,
    #[serde(rename = "IPAddress")]
    ip_address: String,
    prefix_length: u8,
}

/// `ConvertTo-Json` collapses a single-element pipeline into a bare object.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(NetIpAddress),
    Many(Vec<NetIpAddress>),
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct InterfaceReport {
    pub interface: String,
    pub addresses: Vec<String>,
}

/// Groups addresses by interface alias, sorted by alias, each as `ip/prefix`.
///
/// # Errors
///
/// Returns [`Error::Json`](crate::error::Error::Json) if the output is not the
/// expected JSON.
pub fn reshape(raw_json: &str) -> Result<Vec<InterfaceReport>> {
    if raw_json.trim().is_empty() {
        return Ok(Vec::new());
    }

    let entries = match serde_json::from_str::<OneOrMany>(raw_json)? {
        OneOrMany::One(entry) => vec![entry],
        OneOrMany::Many(entries) => entries,
    };

    let mut interfaces: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for entry in entries {
        interfaces
            .entry(entry.interface_alias)
            .or_default()
            .push(format!("{}/{}", entry.ip_address, entry.prefix_length));
    }

    Ok(interfaces
        .into_iter()
        .map(|(interface, addresses)| InterfaceReport {
            interface,
            addresses,
        })
        .collect())
}

/// Pretty-printed JSON array of the report.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(reports: &[InterfaceReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}

/// One line per interface: the alias padded to a common width, then its addresses.
#[must_use]
pub fn render_text(reports: &[InterfaceReport]) -> String {
    let width = reports
        .iter()
        .map(|report| report.interface.chars().count())
        .max()
        .unwrap_or_default();

    reports
        .iter()
        .map(|report| {
            format!(
                "{:<width$}  {}",
                report.interface,
                report.addresses.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
