//! One handler per task: open a session, send the command, print the result.
//!
//! Handlers take the executor and the operator's input and output channels as
//! parameters so the whole flow can run against a scripted executor in tests.

use std::io::{BufRead, Write};

use crossterm::style::Stylize;
use hyperlab_core::error::Result;
use hyperlab_core::host_definitions::{HostDefinition, HostsConfig};
use hyperlab_core::operations::{HostPower, HostQuery, VmAction};
use hyperlab_core::remote::RemoteExecutor;
use hyperlab_core::table::render;
use hyperlab_core::{network, wake, workflow};
use itertools::Itertools;
use log::info;

use crate::cli_args::{Args, Task};
use crate::prompt::{confirm_should_run, RunChoice};

/// Everything a handler needs besides the host configuration.
pub struct Session<'a, E: ?Sized, R, W> {
    pub args: &'a Args,
    pub config: &'a HostsConfig,
    pub executor: &'a E,
    pub input: R,
    pub output: W,
}

impl<E, R, W> Session<'_, E, R, W>
where
    E: RemoteExecutor + ?Sized,
    R: BufRead,
    W: Write,
{
    /// Runs the task named on the command line.
    ///
    /// # Errors
    ///
    /// Returns the first error from configuration lookup, the remote host,
    /// parsing, selection or terminal I/O.
    pub fn run(&mut self) -> Result<()> {
        match self.args.task.clone() {
            Task::CheckConnectivity => self.for_each_host(Self::check_connectivity),
            Task::CheckDiskSpace => self.for_each_host(Self::check_disk_space),
            Task::CheckUptime => self.for_each_host(Self::check_uptime),
            Task::CheckAll => self.for_each_host(|session, host| {
                session.check_connectivity(host)?;
                session.check_disk_space(host)?;
                session.check_uptime(host)
            }),
            Task::Network { json } => self.for_each_host(|session, host| session.network(host, json)),
            Task::ListVms => self.for_each_host(Self::list_vms),
            Task::Start { vm } => self.vm_action(VmAction::Start, vm.as_deref(), None),
            Task::Stop { vm } => self.vm_action(VmAction::Stop, vm.as_deref(), None),
            Task::Save { vm } => self.vm_action(VmAction::Save, vm.as_deref(), None),
            Task::Checkpoint { vm, snapshot } => {
                self.vm_action(VmAction::Checkpoint, vm.as_deref(), snapshot.as_deref())
            }
            Task::Shutdown => self.power(HostPower::Shutdown),
            Task::Restart => self.power(HostPower::Restart),
            Task::Wake => self.for_each_host(Self::wake),
        }
    }

    fn for_each_host(
        &mut self,
        mut handler: impl FnMut(&mut Self, &HostDefinition) -> Result<()>,
    ) -> Result<()> {
        let config = self.config;
        for host in config.select_hosts(self.args.host.as_deref())? {
            handler(self, host)?;
        }
        Ok(())
    }

    fn check_connectivity(&mut self, host: &HostDefinition) -> Result<()> {
        let user = workflow::run_query(self.executor, host, HostQuery::Connectivity)?;
        writeln!(
            self.output,
            "{} Connected to {host} as {user}",
            "OK".green().bold()
        )?;
        Ok(())
    }

    fn check_disk_space(&mut self, host: &HostDefinition) -> Result<()> {
        self.print_query(host, HostQuery::DiskSpace)
    }

    fn check_uptime(&mut self, host: &HostDefinition) -> Result<()> {
        self.print_query(host, HostQuery::Uptime)
    }

    fn print_query(&mut self, host: &HostDefinition, query: HostQuery) -> Result<()> {
        let result = workflow::run_query(self.executor, host, query)?;
        self.print_section(host, &query.to_string(), &result)
    }

    fn print_section(&mut self, host: &HostDefinition, title: &str, body: &str) -> Result<()> {
        writeln!(self.output, "{}", format!("{host} {title}:").bold())?;
        writeln!(self.output, "{body}")?;
        Ok(())
    }

    fn network(&mut self, host: &HostDefinition, json: bool) -> Result<()> {
        let raw_json = workflow::run_query(self.executor, host, HostQuery::Network)?;
        let reports = network::reshape(&raw_json)?;

        let body = if json {
            network::to_json(&reports)?
        } else {
            network::render_text(&reports)
        };

        self.print_section(host, &HostQuery::Network.to_string(), &body)
    }

    fn list_vms(&mut self, host: &HostDefinition) -> Result<()> {
        let table = workflow::fetch_vm_table(self.executor, host, &self.config.table_parser())?;
        self.print_section(host, &HostQuery::VmListing.to_string(), &render(&table))
    }

    fn vm_action(
        &mut self,
        action: VmAction,
        vm_name: Option<&str>,
        snapshot: Option<&str>,
    ) -> Result<()> {
        let config = self.config;
        let host = config.single_target(self.args.host.as_deref())?;

        let vm_name = match vm_name {
            Some(vm_name) => vm_name.to_string(),
            None => workflow::choose_vm(
                self.executor,
                host,
                &config.table_parser(),
                &config.selector(self.args.attempts),
                &mut self.input,
                &mut self.output,
            )?,
        };

        let command = action.command(&vm_name, snapshot)?;
        let description = format!("{} `{vm_name}` on {host}", capitalize(&action.to_string()));

        if !self.should_run(&description, &command, action.needs_confirmation())? {
            return Ok(());
        }

        let result = workflow::run_command(self.executor, host, &command)?;
        self.print_done(&description, &result)
    }

    fn power(&mut self, power: HostPower) -> Result<()> {
        let config = self.config;
        let host = config.single_target(self.args.host.as_deref())?;
        let description = format!("{} {host}", capitalize(&power.to_string()));

        let command = power.command();

        if !self.should_run(&description, &command, true)? {
            return Ok(());
        }

        let result = workflow::run_command(self.executor, host, &command)?;
        self.print_done(&description, &result)
    }

    fn wake(&mut self, host: &HostDefinition) -> Result<()> {
        let mac_address = wake::host_mac_address(host)?;

        if self.args.dry_run {
            writeln!(
                self.output,
                "Would send a magic packet for {host} ({mac_address}) to {}:{}",
                host.broadcast(),
                host.wake_port()
            )?;
            return Ok(());
        }

        wake::send_magic_packet(&mac_address, host.broadcast(), host.wake_port())?;
        writeln!(
            self.output,
            "{} Sent magic packet for {host} ({mac_address})",
            "OK".green().bold()
        )?;
        Ok(())
    }

    /// Applies dry run and confirmation. Returns whether the command should run.
    fn should_run(&mut self, description: &str, command: &str, confirm: bool) -> Result<bool> {
        if self.args.dry_run {
            writeln!(self.output, "Dry run, would execute:\n{command}")?;
            return Ok(false);
        }

        if confirm
            && !self.args.force
            && confirm_should_run(description, &mut self.input, &mut self.output)? == RunChoice::No
        {
            info!("{description} cancelled by user");
            writeln!(self.output, "Cancelled.")?;
            return Ok(false);
        }

        Ok(true)
    }

    fn print_done(&mut self, description: &str, result: &str) -> Result<()> {
        writeln!(self.output, "{} {description}", "OK".green().bold())?;

        let lines = result.lines().map(str::trim_end).filter(|l| !l.is_empty()).join("\n");
        if !lines.is_empty() {
            writeln!(self.output, "{lines}")?;
        }

        Ok(())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
