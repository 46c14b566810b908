//! The PowerShell scripts issued against a Hyper-V host.
//!
//! Every script is wrapped with [`powershell`] before being handed to a
//! [`RemoteExecutor`](crate::remote::RemoteExecutor), since the remote login
//! shell is not assumed to be PowerShell.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use crate::error::Result;
use crate::interpolation::interpolate_command;

/// Read-only queries. None of them take arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostQuery {
    Connectivity,
    DiskSpace,
    Uptime,
    Network,
    VmListing,
}

impl HostQuery {
    #[must_use]
    pub fn script(&self) -> &'static str {
        match self {
            HostQuery::Connectivity => "whoami",
            HostQuery::DiskSpace => "Get-PSDrive C | Select-Object Used, Free",
            HostQuery::Uptime => "(get-date) - (gcim Win32_OperatingSystem).LastBootUpTime",
            HostQuery::Network => {
                "Get-NetIPAddress -AddressFamily IPv4 | Select-Object InterfaceAlias, IPAddress, PrefixLength | ConvertTo-Json"
            }
            HostQuery::VmListing => {
                "Get-VM | Format-Table -AutoSize Name, State, CPUUsage, Uptime, Status"
            }
        }
    }

    #[must_use]
    pub fn command(&self) -> String {
        powershell(self.script())
    }
}

impl Display for HostQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            HostQuery::Connectivity => "connectivity",
            HostQuery::DiskSpace => "disk space",
            HostQuery::Uptime => "uptime",
            HostQuery::Network => "network",
            HostQuery::VmListing => "virtual machines",
        })
    }
}

/// State-changing operations on one virtual machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmAction {
    Start,
    Stop,
    Save,
    Checkpoint,
}

impl VmAction {
    /// Script template; `{name}` is the VM, `{checkpoint}` an optional snapshot name.
    #[must_use]
    pub fn template(&self, named_checkpoint: bool) -> &'static str {
        match (self, named_checkpoint) {
            (VmAction::Start, _) => "Start-VM -Name '{name}'",
            (VmAction::Stop, _) => "Stop-VM -Name '{name}'",
            (VmAction::Save, _) => "Save-VM -Name '{name}'",
            (VmAction::Checkpoint, false) => "Checkpoint-VM -Name '{name}'",
            (VmAction::Checkpoint, true) => {
                "Checkpoint-VM -Name '{name}' -SnapshotName '{checkpoint}'"
            }
        }
    }

    /// Whether the operator should confirm before the action runs.
    #[must_use]
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, VmAction::Stop)
    }

    /// Builds the full remote command for `vm_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be rendered.
    pub fn command(&self, vm_name: &str, checkpoint: Option<&str>) -> Result<String> {
        let mut context = HashMap::from([("name".to_string(), vm_name.to_string())]);
        if let Some(checkpoint) = checkpoint {
            context.insert("checkpoint".to_string(), checkpoint.to_string());
        }

        let script = interpolate_command(&context, self.template(checkpoint.is_some()))?;
        Ok(powershell(&script))
    }
}

impl Display for VmAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            VmAction::Start => "start",
            VmAction::Stop => "stop",
            VmAction::Save => "save",
            VmAction::Checkpoint => "checkpoint",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPower {
    Shutdown,
    Restart,
}

impl HostPower {
    #[must_use]
    pub fn script(&self) -> &'static str {
        match self {
            HostPower::Shutdown => "Stop-Computer -Force",
            HostPower::Restart => "Restart-Computer -Force",
        }
    }

    #[must_use]
    pub fn command(&self) -> String {
        powershell(self.script())
    }
}

impl Display for HostPower {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            HostPower::Shutdown => "shutdown",
            HostPower::Restart => "restart",
        })
    }
}

/// Wraps a script as `powershell -Command "<script>"`.
#[must_use]
pub fn powershell(script: &str) -> String {
    format!("powershell -Command \"{}\"", script.replace('"', "\\\""))
}
