//! Running commands on a remote host.
//!
//! [`SshExecutor`] shells out to the system `ssh` client, so keys, agents and
//! `~/.ssh/config` aliases work exactly as they do on the command line.

use std::process::{Command, Output, Stdio};

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::host_definitions::{HostDefinition, HostsConfig};

/// Exit code `ssh` uses for its own failures, as opposed to the remote command's.
const SSH_FAILURE_STATUS: i32 = 255;

/// Captured output of one remote command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub stdout: String,
    pub stderr: String,
}

impl RawOutput {
    #[must_use]
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }
}

/// Runs one command string on one host and captures its output.
pub trait RemoteExecutor {
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the host cannot be reached, or
    /// [`Error::Command`] if the command ran and failed.
    fn run(&self, host: &HostDefinition, command: &str) -> Result<RawOutput>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshExecutor {
    program: String,
    connect_timeout: Option<u32>,
}

impl SshExecutor {
    pub fn new(program: impl Into<String>, connect_timeout: Option<u32>) -> Self {
        Self {
            program: program.into(),
            connect_timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &HostsConfig) -> Self {
        Self::new(config.ssh_program(), config.connect_timeout)
    }

    /// Arguments passed to the ssh program, destination and command last.
    #[must_use]
    pub fn arguments(&self, host: &HostDefinition, command: &str) -> Vec<String> {
        let mut arguments = vec!["-o".to_string(), "BatchMode=yes".to_string()];

        if let Some(timeout) = self.connect_timeout {
            arguments.push("-o".to_string());
            arguments.push(format!("ConnectTimeout={timeout}"));
        }

        arguments.push(host.destination());
        arguments.push(command.to_string());
        arguments
    }

    fn interpret(host: &HostDefinition, output: Output) -> Result<RawOutput> {
        let raw_output = RawOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        match output.status.code() {
            Some(0) => Ok(raw_output),
            Some(SSH_FAILURE_STATUS) => Err(Error::connection_error(
                host.id.clone(),
                raw_output.stderr.trim().to_string(),
            )),
            status => Err(Error::command_error(
                host.id.clone(),
                status,
                raw_output.stderr.trim().to_string(),
            )),
        }
    }
}

impl RemoteExecutor for SshExecutor {
    fn run(&self, host: &HostDefinition, command: &str) -> Result<RawOutput> {
        let user = host.user.as_deref().unwrap_or("the default user");
        info!("Connecting to {host} as {user}...");
        debug!("Running `{command}` on `{}`", host.destination());

        let output = Command::new(&self.program)
            .args(self.arguments(host, command))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                Error::connection_error(
                    host.id.clone(),
                    format!("could not start `{}`: {e}", self.program),
                )
            })?;

        let raw_output = Self::interpret(host, output)?;

        if !raw_output.stderr.trim().is_empty() {
            warn!("`{}` wrote to stderr: {}", host.id, raw_output.stderr.trim());
        }

        Ok(raw_output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    use std::os::unix::process::ExitStatusExt;

    #[cfg(unix)]
    fn output_with(code: i32, stdout: &str, stderr: &str) -> Output {
        Output {
            status: std::process::ExitStatus::from_raw(code << 8),
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_arguments() {
        let executor = SshExecutor::new("ssh", None);
        let host = HostDefinition {
            user: Some("admin".to_string()),
            ..HostDefinition::new("atlas")
        };

        assert_eq!(
            executor.arguments(&host, "powershell -Command \"whoami\""),
            vec![
                "-o",
                "BatchMode=yes",
                "admin@atlas",
                "powershell -Command \"whoami\""
            ]
        );
    }

    #[test]
    fn test_arguments_with_timeout() {
        let executor = SshExecutor::new("ssh", Some(5));
        let arguments = executor.arguments(&HostDefinition::new("atlas"), "whoami");
        assert_eq!(
            arguments,
            vec!["-o", "BatchMode=yes", "-o", "ConnectTimeout=5", "atlas", "whoami"]
        );
    }

    #[test]
    fn test_from_config() {
        let mut config = HostsConfig::single_host("atlas");
        assert_eq!(SshExecutor::from_config(&config), SshExecutor::new("ssh", None));

        config.ssh_program = Some("/opt/ssh".to_string());
        config.connect_timeout = Some(3);
        assert_eq!(
            SshExecutor::from_config(&config),
            SshExecutor::new("/opt/ssh", Some(3))
        );
    }

    #[test]
    fn test_stdout_trimmed() {
        let output = RawOutput {
            stdout: "\r\n  atlas\\admin \r\n".to_string(),
            stderr: String::new(),
        };
        assert_eq!(output.stdout_trimmed(), "atlas\\admin");
    }

    #[cfg(unix)]
    #[test]
    fn test_interpret_exit_codes() {
        let host = HostDefinition::new("atlas");

        let ok = SshExecutor::interpret(&host, output_with(0, "out", "")).unwrap();
        assert_eq!(ok.stdout, "out");

        let connection = SshExecutor::interpret(&host, output_with(255, "", "no route"));
        assert!(matches!(connection, Err(Error::Connection { reason, .. }) if reason == "no route"));

        let command = SshExecutor::interpret(&host, output_with(1, "", "Get-VM: denied\n"));
        assert!(matches!(
            command,
            Err(Error::Command { status: Some(1), stderr, .. }) if stderr == "Get-VM: denied"
        ));
    }

    #[test]
    fn test_missing_program_is_connection_error() {
        let executor = SshExecutor::new("/this/program/does/not/exist", None);
        let result = executor.run(&HostDefinition::new("atlas"), "whoami");
        assert!(matches!(result, Err(Error::Connection { .. })));
    }
}
